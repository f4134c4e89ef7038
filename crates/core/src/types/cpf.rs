//! CPF handling: input masking and the synthetic login email.
//!
//! The CPF (the Brazilian individual taxpayer number) is both the login
//! handle and the human-facing natural key of an account. The platform's
//! authentication primitive is email-shaped, so a synthetic address is
//! derived from the CPF digits to bridge the two.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of digits in a CPF.
const MAX_DIGITS: usize = 11;

/// A CPF in its masked display form (`ddd.ddd.ddd-dd`, possibly partial).
///
/// Construction via [`Cpf::mask`] is total: any input produces a masked
/// string, truncated at 11 digits. Partial inputs stay partial, which is what
/// an input field mid-typing looks like.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    /// Mask arbitrary input into CPF display form.
    ///
    /// Strips every non-digit, truncates past 11 digits and re-inserts the
    /// `.`/`-` separators at the 3-3-3-2 group boundaries as soon as the
    /// following group has at least one digit.
    #[must_use]
    pub fn mask(raw: &str) -> Self {
        let mut out = String::with_capacity(14);
        for (i, c) in raw
            .chars()
            .filter(char::is_ascii_digit)
            .take(MAX_DIGITS)
            .enumerate()
        {
            match i {
                3 | 6 => out.push('.'),
                9 => out.push('-'),
                _ => {}
            }
            out.push(c);
        }
        Self(out)
    }

    /// The digits of this CPF, separators stripped.
    #[must_use]
    pub fn digits(&self) -> String {
        self.0.chars().filter(char::is_ascii_digit).collect()
    }

    /// Derive the synthetic login email for this CPF.
    ///
    /// The address is the CPF digits followed by `@` and the given domain,
    /// used solely to satisfy the platform's email-based authentication.
    #[must_use]
    pub fn synthetic_email(&self, domain: &str) -> String {
        format!("{}@{domain}", self.digits())
    }

    /// The masked form as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether no digits were entered at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Cpf {
    fn from(raw: &str) -> Self {
        Self::mask(raw)
    }
}

impl AsRef<str> for Cpf {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
