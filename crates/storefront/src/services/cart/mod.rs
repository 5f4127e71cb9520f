//! Guest carts and checkout.
//!
//! - [`CartEngine`] - local cart state, mutations and checkout
//! - [`MirrorWorker`] - ordered background writes of cart snapshots

mod engine;
mod error;
mod mirror;

pub use engine::{CartChange, CartEngine, CheckoutReceipt, CheckoutRequest};
pub use error::CartError;
pub use mirror::{MirrorHandle, MirrorWorker, SyncOutcome, SyncTicket};
