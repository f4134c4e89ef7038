//! Plan catalog validation command.

use std::path::Path;

use cotador_portal::catalog::PlanCatalog;

/// Load the catalog and report what it contains.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read or fails validation.
pub fn check(dir: &str) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = PlanCatalog::load(Path::new(dir))?;

    tracing::info!("catalog OK: {} plan(s)", catalog.len());
    for plan in catalog.all() {
        tracing::info!(
            id = %plan.id,
            operator = %plan.operator,
            brackets = plan.prices.len(),
            categories = plan.categories.len(),
            "plan {}",
            plan.name
        );
    }

    Ok(())
}
