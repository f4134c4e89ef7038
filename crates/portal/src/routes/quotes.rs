//! Quoting route handlers.
//!
//! The screen the approval flow guards: per-age-bracket life counts in,
//! every plan's computed total and breakdown out, cheapest first. Quotes are
//! recomputed on every submission and never persisted.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::IntoResponse};
use serde::Deserialize;
use tracing::instrument;

use cotador_core::{
    AgeRange, CalculatedPlan, HealthPlan, PlanSelection, QuoteCategory, quote_all,
};

use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Quote form data. Counts arrive as raw strings so empty inputs are
/// tolerated; anything non-numeric counts as zero.
#[derive(Debug, Default, Deserialize)]
pub struct QuoteForm {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub lives_0_18: Option<String>,
    #[serde(default)]
    pub lives_19_23: Option<String>,
    #[serde(default)]
    pub lives_24_28: Option<String>,
    #[serde(default)]
    pub lives_29_33: Option<String>,
    #[serde(default)]
    pub lives_34_38: Option<String>,
    #[serde(default)]
    pub lives_39_43: Option<String>,
    #[serde(default)]
    pub lives_44_48: Option<String>,
    #[serde(default)]
    pub lives_49_53: Option<String>,
    #[serde(default)]
    pub lives_54_58: Option<String>,
    #[serde(default)]
    pub lives_59_plus: Option<String>,
}

impl QuoteForm {
    fn fields(&self) -> [(AgeRange, &Option<String>); 10] {
        [
            (AgeRange::R0To18, &self.lives_0_18),
            (AgeRange::R19To23, &self.lives_19_23),
            (AgeRange::R24To28, &self.lives_24_28),
            (AgeRange::R29To33, &self.lives_29_33),
            (AgeRange::R34To38, &self.lives_34_38),
            (AgeRange::R39To43, &self.lives_39_43),
            (AgeRange::R44To48, &self.lives_44_48),
            (AgeRange::R49To53, &self.lives_49_53),
            (AgeRange::R54To58, &self.lives_54_58),
            (AgeRange::R59Plus, &self.lives_59_plus),
        ]
    }

    /// Collapse the raw fields into a selection.
    fn selection(&self) -> PlanSelection {
        let mut selection = PlanSelection::new();
        for (range, raw) in self.fields() {
            let count = raw
                .as_deref()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .unwrap_or(0);
            selection.set(range, count);
        }
        selection
    }

    fn category(&self) -> Option<QuoteCategory> {
        match self.category.as_deref() {
            Some("PF") => Some(QuoteCategory::Pf),
            Some("PME_1") => Some(QuoteCategory::Pme1),
            Some("PME_2") => Some(QuoteCategory::Pme2),
            Some("PME_30") => Some(QuoteCategory::Pme30),
            _ => None,
        }
    }
}

/// One age-bracket input on the form.
pub struct BracketField {
    pub label: &'static str,
    pub name: &'static str,
    pub count: u32,
}

const BRACKET_NAMES: [(AgeRange, &str); 10] = [
    (AgeRange::R0To18, "lives_0_18"),
    (AgeRange::R19To23, "lives_19_23"),
    (AgeRange::R24To28, "lives_24_28"),
    (AgeRange::R29To33, "lives_29_33"),
    (AgeRange::R34To38, "lives_34_38"),
    (AgeRange::R39To43, "lives_39_43"),
    (AgeRange::R44To48, "lives_44_48"),
    (AgeRange::R49To53, "lives_49_53"),
    (AgeRange::R54To58, "lives_54_58"),
    (AgeRange::R59Plus, "lives_59_plus"),
];

fn bracket_fields(selection: &PlanSelection) -> Vec<BracketField> {
    BRACKET_NAMES
        .iter()
        .map(|(range, name)| BracketField {
            label: range.label(),
            name,
            count: selection.count(*range),
        })
        .collect()
}

/// Quoting page template.
#[derive(Template, WebTemplate)]
#[template(path = "quotes/index.html")]
pub struct QuotesTemplate {
    pub user_name: String,
    pub is_admin: bool,
    pub brackets: Vec<BracketField>,
    pub total_lives: u32,
    pub results: Option<Vec<CalculatedPlan>>,
}

/// Display the quoting form.
pub async fn show(RequireAuth(user): RequireAuth) -> impl IntoResponse {
    QuotesTemplate {
        user_name: user.display_name().to_owned(),
        is_admin: user.is_admin,
        brackets: bracket_fields(&PlanSelection::new()),
        total_lives: 0,
        results: None,
    }
}

/// Compute quotes for the submitted selection.
#[instrument(skip(user, state, form))]
pub async fn calculate(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<QuoteForm>,
) -> impl IntoResponse {
    let selection = form.selection();

    let plans: Vec<HealthPlan> = form.category().map_or_else(
        || state.catalog().all().to_vec(),
        |category| {
            state
                .catalog()
                .for_category(category)
                .into_iter()
                .cloned()
                .collect()
        },
    );

    let results = if selection.is_empty() {
        None
    } else {
        Some(quote_all(&plans, &selection))
    };

    QuotesTemplate {
        user_name: user.display_name().to_owned(),
        is_admin: user.is_admin,
        total_lives: selection.total_lives(),
        brackets: bracket_fields(&selection),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_ignores_blank_and_garbage_counts() {
        let form = QuoteForm {
            lives_0_18: Some("2".to_owned()),
            lives_19_23: Some(String::new()),
            lives_24_28: Some("abc".to_owned()),
            ..QuoteForm::default()
        };

        let selection = form.selection();
        assert_eq!(selection.count(AgeRange::R0To18), 2);
        assert_eq!(selection.count(AgeRange::R19To23), 0);
        assert_eq!(selection.count(AgeRange::R24To28), 0);
        assert_eq!(selection.total_lives(), 2);
    }

    #[test]
    fn test_category_parsing() {
        let mut form = QuoteForm::default();
        assert_eq!(form.category(), None);

        form.category = Some("PME_2".to_owned());
        assert_eq!(form.category(), Some(QuoteCategory::Pme2));

        form.category = Some("".to_owned());
        assert_eq!(form.category(), None);
    }
}
