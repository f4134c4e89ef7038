//! Brazilian phone number input masking.

/// Maximum number of digits in a mobile number (2 area + 9 local).
const MAX_DIGITS: usize = 11;

/// Mask arbitrary input into `(dd) ddddd-dddd` display form.
///
/// Strips every non-digit, truncates past 11 digits, wraps the area code in
/// parentheses once a third digit arrives and inserts the hyphen after the
/// fifth local digit. Total over any input; partial inputs stay partial.
#[must_use]
pub fn mask(raw: &str) -> String {
    let digits: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_digit)
        .take(MAX_DIGITS)
        .collect();

    // Area code parentheses only appear once a local digit follows.
    if digits.len() <= 2 {
        return digits.iter().collect();
    }

    let mut out = String::with_capacity(15);
    out.push('(');
    out.extend(digits.iter().take(2));
    out.push_str(") ");
    for (i, c) in digits.iter().skip(2).enumerate() {
        if i == 5 {
            out.push('-');
        }
        out.push(*c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_full_mobile() {
        assert_eq!(mask("11987654321"), "(11) 98765-4321");
        assert_eq!(mask("(11) 98765-4321"), "(11) 98765-4321");
    }

    #[test]
    fn test_mask_partial_while_typing() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("1"), "1");
        assert_eq!(mask("11"), "11");
        assert_eq!(mask("119"), "(11) 9");
        assert_eq!(mask("1198765"), "(11) 98765");
        assert_eq!(mask("11987654"), "(11) 98765-4");
    }

    #[test]
    fn test_mask_truncates_past_eleven_digits() {
        assert_eq!(mask("119876543219999"), "(11) 98765-4321");
    }

    #[test]
    fn test_mask_ignores_garbage() {
        assert_eq!(mask("tel: 11 98765 4321!"), "(11) 98765-4321");
        assert_eq!(mask("abc"), "");
    }

    #[test]
    fn test_mask_is_idempotent_over_own_digits() {
        let once = mask("11987654321");
        assert_eq!(mask(&once), once);
    }
}
