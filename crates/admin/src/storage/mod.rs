//! Public object storage for uploaded catalog images.

mod client;

pub use client::{StorageClient, StorageError};
