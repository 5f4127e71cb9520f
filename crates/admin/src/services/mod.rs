//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Email and password login for admins
//! - `dashboard` - Active carts, traffic and revenue figures
//! - `events` - Session change broadcast for the SSE stream

pub mod auth;
pub mod dashboard;
pub mod events;

pub use auth::{AdminAuthError, AdminAuthService};
pub use dashboard::{DashboardAggregator, DashboardStats};
pub use events::{AuthEvent, AuthEvents, SessionChange};
