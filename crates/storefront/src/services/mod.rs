//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `guest` - anonymous per-browser identity
//! - `local_store` - browser-local key/value storage over the session
//! - `cart` - local cart, remote mirror worker and checkout
//! - `traffic` - deduplicated page-view recording
//! - `workshop` - Gemini-backed craft concept generation

pub mod cart;
pub mod guest;
pub mod local_store;
pub mod traffic;
pub mod workshop;

pub use cart::{CartEngine, MirrorHandle, MirrorWorker, SyncOutcome, SyncTicket};
pub use guest::GuestIdentity;
pub use local_store::SessionStore;
pub use traffic::{TrafficLogger, VisitOutcome};
pub use workshop::GeminiClient;
