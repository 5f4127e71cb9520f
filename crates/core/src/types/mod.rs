//! Core types for Rosa Studio.
//!
//! This module provides type-safe wrappers and records for the catalog,
//! carts, purchases, traffic and custom requests.

pub mod cart;
pub mod custom_request;
pub mod email;
pub mod id;
pub mod image;
pub mod portfolio;
pub mod price;
pub mod profile;
pub mod purchase;
pub mod traffic;
pub mod validation;

pub use cart::{Cart, CartSnapshot};
pub use custom_request::{CustomRequest, CustomRequestForm, NewCustomRequest};
pub use email::{Email, EmailError};
pub use id::*;
pub use image::{ImageInput, ImageKind, ImageUpload};
pub use portfolio::{ALL_CATEGORIES, NewPortfolioItem, PortfolioItem, filter_by_category};
pub use price::{DisplayPrice, format_amount, parse_leading_numeric, saturating_sum};
pub use profile::ArtistProfile;
pub use purchase::{NewPurchase, Purchase, PurchaseItems, ShippingDetails};
pub use traffic::{TrafficEvent, normalize_page_path};
pub use validation::ValidationError;
