//! Session-related types.
//!
//! The storefront has no accounts; the session is the visitor's
//! browser-local storage.

/// Session keys for browser-local data.
pub mod keys {
    /// Key for the visitor's anonymous guest id.
    pub const GUEST_ID: &str = "rosa_guest_id";

    /// Key for the JSON-encoded cart items.
    pub const CART: &str = "rosa_cart";
}
