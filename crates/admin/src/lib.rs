//! Rosa Studio Admin library.
//!
//! The back-office API as a library, so the router can be exercised in tests
//! against in-memory ports.
//!
//! # Security
//!
//! Every catalog mutation and the dashboard require a signed-in admin.
//! Bind to a private interface or put TLS in front; see `ADMIN_TLS_*`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;

pub use routes::app;
pub use state::{AdminPorts, AppState};
