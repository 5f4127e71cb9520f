//! Workshop: AI-generated craft concepts.
//!
//! A visitor describes a project and a style. The text model answers with a
//! structured [`DesignIdea`]; the image model then renders its visual prompt.
//! Rendering is best effort and falls back to a placeholder image.

mod client;
mod error;
mod types;

pub use client::{GeminiClient, PLACEHOLDER_IMAGE_URL};
pub use error::GeminiError;
pub use types::{Concept, DesignIdea, Difficulty};
