//! Catalog maintenance commands.

use std::sync::Arc;

use rosa_studio_core::catalog::{CatalogStore, ResetConfirmation};
use rosa_studio_core::db::PgCatalogRepository;

use super::{CliError, connect};

/// Replace every item, category and the profile with the built-in defaults.
pub async fn reset(confirmed: bool) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::NotConfirmed("reset the catalog"));
    }

    let pool = connect().await?;
    let catalog = CatalogStore::new(Arc::new(PgCatalogRepository::new(pool)));

    let snapshot = catalog
        .reset_to_defaults(ResetConfirmation::acknowledged())
        .await?;

    tracing::info!(
        items = snapshot.items.len(),
        categories = snapshot.categories.len(),
        "Catalog reset to defaults"
    );
    Ok(())
}
