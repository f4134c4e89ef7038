//! Plan catalog loaded from the content directory at startup.
//!
//! The catalog is immutable reference data: a JSON file of [`HealthPlan`]
//! entries read once when the portal boots. Quotes are computed against it;
//! nothing mutates it.

use std::path::Path;

use cotador_core::{HealthPlan, PlanId, QuoteCategory};

/// File name of the catalog inside the content directory.
const CATALOG_FILE: &str = "plans.json";

/// Errors loading the plan catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("duplicate plan id: {0}")]
    DuplicateId(PlanId),
}

/// The loaded plan catalog.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    plans: Vec<HealthPlan>,
}

impl PlanCatalog {
    /// Load the catalog from `content_dir/plans.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or contains
    /// duplicate plan ids.
    pub fn load(content_dir: &Path) -> Result<Self, CatalogError> {
        let path = content_dir.join(CATALOG_FILE);
        let display = path.display().to_string();

        let raw = std::fs::read_to_string(&path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        let plans: Vec<HealthPlan> =
            serde_json::from_str(&raw).map_err(|source| CatalogError::Parse {
                path: display,
                source,
            })?;

        Self::from_plans(plans)
    }

    /// Build a catalog from already-parsed plans.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` if two plans share an id.
    pub fn from_plans(plans: Vec<HealthPlan>) -> Result<Self, CatalogError> {
        let mut seen = std::collections::HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.id.clone()) {
                return Err(CatalogError::DuplicateId(plan.id.clone()));
            }
        }
        Ok(Self { plans })
    }

    /// Every plan, in catalog order.
    #[must_use]
    pub fn all(&self) -> &[HealthPlan] {
        &self.plans
    }

    /// Plans quotable under the given category.
    #[must_use]
    pub fn for_category(&self, category: QuoteCategory) -> Vec<&HealthPlan> {
        self.plans
            .iter()
            .filter(|p| p.offers_category(category))
            .collect()
    }

    /// Look up a plan by id.
    #[must_use]
    pub fn get(&self, id: &PlanId) -> Option<&HealthPlan> {
        self.plans.iter().find(|p| &p.id == id)
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
