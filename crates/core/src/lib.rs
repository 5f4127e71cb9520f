//! Rosa Studio Core - shared catalog, cart and storage types.
//!
//! This crate is used by every Rosa Studio component:
//! - `storefront` - public gallery, cart, checkout and workshop API
//! - `admin` - catalog management and dashboard API
//! - `cli` - migrations and maintenance commands
//!
//! # Architecture
//!
//! Domain logic talks to storage only through the traits in [`ports`].
//! [`memory`] implements them in-process; [`db`] (feature `postgres`)
//! implements them over `PostgreSQL`.
//!
//! # Modules
//!
//! - [`types`] - ids, emails, prices and the records stored for each entity
//! - [`catalog`] - the shared [`CatalogStore`](catalog::CatalogStore)
//! - [`defaults`] - built-in starter catalog
//! - [`env`] - environment variable and secret checks for configs
//! - [`ports`] - storage capability traits
//! - [`memory`] - in-memory adapters with failure injection
//! - `telemetry` (feature `server`) - Sentry, tracing and shutdown for binaries

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
#[cfg(feature = "postgres")]
pub mod db;
pub mod defaults;
pub mod env;
pub mod memory;
pub mod ports;
#[cfg(feature = "server")]
pub mod telemetry;
pub mod types;

pub use types::*;
