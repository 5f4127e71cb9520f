//! Cart and checkout errors.

use thiserror::Error;

use rosa_studio_core::ValidationError;
use rosa_studio_core::ports::StoreError;

/// Errors from cart operations. Local cart state is unchanged when one of
/// these is returned.
#[derive(Debug, Error)]
pub enum CartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The purchase could not be written; checkout did not happen.
    #[error("purchase could not be recorded: {0}")]
    Ledger(#[source] StoreError),
}
