//! Commission enquiries sent from the contact form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::CustomRequestId;
use super::validation::{ValidationError, required, required_bounded};

const MAX_NAME_LEN: usize = 200;
const MAX_DESCRIPTION_LEN: usize = 5000;

/// Raw form input.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRequestForm {
    pub name: String,
    pub email: String,
    /// Requested medium; one of the catalog's category names.
    #[serde(alias = "type")]
    pub category: String,
    pub description: String,
}

/// A validated enquiry ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomRequest {
    pub name: String,
    pub email: Email,
    pub category: String,
    pub description: String,
}

/// A stored enquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRequest {
    pub id: CustomRequestId,
    pub name: String,
    pub email: Email,
    pub category: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl CustomRequestForm {
    /// Validate against the current category list.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for blank fields, a malformed email, or
    /// a category that is not in `categories`.
    pub fn validate(&self, categories: &[String]) -> Result<NewCustomRequest, ValidationError> {
        let name = required_bounded("name", &self.name, MAX_NAME_LEN)?;
        let email = Email::parse(&self.email)?;
        let category = required("category", &self.category)?;
        if !categories.iter().any(|c| *c == category) {
            return Err(ValidationError::UnknownCategory(category));
        }
        let description = required_bounded("description", &self.description, MAX_DESCRIPTION_LEN)?;
        Ok(NewCustomRequest {
            name,
            email,
            category,
            description,
        })
    }
}

impl NewCustomRequest {
    #[must_use]
    pub fn stored(self, id: CustomRequestId, created_at: DateTime<Utc>) -> CustomRequest {
        CustomRequest {
            id,
            name: self.name,
            email: self.email,
            category: self.category,
            description: self.description,
            created_at,
        }
    }
}
