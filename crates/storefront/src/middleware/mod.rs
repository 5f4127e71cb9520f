//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Guest cookie (long-lived guest id)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//! 6. Rate limiting on checkout (governor)
//!
//! The [`Guest`] extractor resolves the visitor's identity from the guest
//! cookie and keeps the cart in the session.

pub mod guest;
pub mod guest_cookie;
pub mod rate_limit;
pub mod request_id;
pub mod session;

pub use guest::Guest;
pub use guest_cookie::guest_cookie_middleware;
pub use rate_limit::{checkout_rate_limiter, workshop_rate_limiter};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
