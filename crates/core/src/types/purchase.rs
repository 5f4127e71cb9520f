//! Recorded purchases.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::PurchaseId;
use super::portfolio::PortfolioItem;
use super::validation::{ValidationError, required};

/// Where a purchase ships. Only `address2` may be blank.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingDetails {
    pub name: String,
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl ShippingDetails {
    /// Trimmed copy with every required field checked.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] for the first blank field.
    pub fn validated(&self) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required("name", &self.name)?,
            address1: required("address1", &self.address1)?,
            address2: self.address2.trim().to_owned(),
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            zip: required("zip", &self.zip)?,
        })
    }
}

/// What was bought and where it goes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseItems {
    pub products: Vec<PortfolioItem>,
    pub shipping_details: ShippingDetails,
}

/// A purchase ready to be written to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    pub customer_email: Email,
    pub total_amount: Decimal,
    pub items: PurchaseItems,
}

/// A purchase as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: PurchaseId,
    pub customer_email: Email,
    pub total_amount: Decimal,
    pub items: PurchaseItems,
    pub created_at: DateTime<Utc>,
}

impl NewPurchase {
    #[must_use]
    pub fn recorded(self, id: PurchaseId, created_at: DateTime<Utc>) -> Purchase {
        Purchase {
            id,
            customer_email: self.customer_email,
            total_amount: self.total_amount,
            items: self.items,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            name: " Rosa ".to_owned(),
            address1: "1 Loom Lane".to_owned(),
            address2: String::new(),
            city: "Eugene".to_owned(),
            state: "OR".to_owned(),
            zip: "97401".to_owned(),
        }
    }

    #[test]
    fn test_address2_is_optional() {
        let validated = shipping().validated();
        assert_eq!(validated.map(|s| s.name), Ok("Rosa".to_owned()));
    }

    #[test]
    fn test_blank_required_field_is_rejected() {
        let mut details = shipping();
        details.zip = "  ".to_owned();
        assert_eq!(
            details.validated(),
            Err(ValidationError::MissingField("zip"))
        );
    }
}
