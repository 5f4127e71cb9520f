//! Local cart state and checkout.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, instrument, warn};

use rosa_studio_core::ports::{LocalStore, PurchaseLedger};
use rosa_studio_core::{
    Cart, Email, GuestId, ItemId, NewPurchase, PortfolioItem, Purchase, PurchaseItems,
    ShippingDetails, ValidationError,
};

use super::error::CartError;
use super::mirror::{MirrorHandle, SyncTicket};
use crate::models::session_keys;

/// Result of a cart mutation.
#[derive(Debug)]
pub struct CartChange {
    /// Whether the local cart changed.
    pub changed: bool,
    /// Outcome of the remote mirror write.
    pub sync: SyncTicket,
}

/// Checkout form input.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub email: String,
    pub shipping: ShippingDetails,
}

/// A completed checkout.
#[derive(Debug)]
pub struct CheckoutReceipt {
    pub purchase: Purchase,
    /// Mirror write of the now-empty cart.
    pub sync: SyncTicket,
}

/// One guest's cart for the duration of a request.
///
/// Mutations update the local copy first and then queue the full item
/// list for mirroring, so the cart works even when the remote store does
/// not.
pub struct CartEngine {
    guest: GuestId,
    local: Arc<dyn LocalStore>,
    mirror: MirrorHandle,
    cart: Cart,
}

impl CartEngine {
    /// Load the guest's cart from local storage. Missing or unreadable data
    /// yields an empty cart.
    pub async fn open(guest: GuestId, local: Arc<dyn LocalStore>, mirror: MirrorHandle) -> Self {
        let cart = match local.get(session_keys::CART).await {
            Ok(Some(json)) => serde_json::from_str::<Cart>(&json).unwrap_or_else(|e| {
                warn!(guest_id = %guest, error = %e, "Stored cart is unreadable; starting empty");
                Cart::new()
            }),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(guest_id = %guest, error = %e, "Local storage unavailable; starting empty");
                Cart::new()
            }
        };

        Self {
            guest,
            local,
            mirror,
            cart,
        }
    }

    #[must_use]
    pub const fn guest(&self) -> GuestId {
        self.guest
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Append a snapshot of `item`. Always succeeds locally.
    #[instrument(skip(self, item), fields(guest_id = %self.guest, item_id = %item.id))]
    pub async fn add(&mut self, item: PortfolioItem) -> CartChange {
        self.cart.push(item);
        self.commit().await
    }

    /// Remove the first entry with `id`; a no-op when absent.
    #[instrument(skip(self), fields(guest_id = %self.guest))]
    pub async fn remove(&mut self, id: &ItemId) -> CartChange {
        if self.cart.remove_first(id).is_none() {
            return CartChange {
                changed: false,
                sync: SyncTicket::skipped(),
            };
        }
        self.commit().await
    }

    /// Empty the cart.
    #[instrument(skip(self), fields(guest_id = %self.guest))]
    pub async fn clear(&mut self) -> CartChange {
        if self.cart.is_empty() {
            return CartChange {
                changed: false,
                sync: SyncTicket::skipped(),
            };
        }
        self.cart.clear();
        self.commit().await
    }

    /// Record a purchase for the current cart, then empty it.
    ///
    /// The ledger write is awaited before anything is cleared.
    ///
    /// # Errors
    ///
    /// [`CartError::Validation`] for an empty cart, a malformed email or
    /// missing shipping fields; [`CartError::Ledger`] when the purchase could
    /// not be written. The cart is untouched in both cases.
    #[instrument(skip(self, ledger, request), fields(guest_id = %self.guest))]
    pub async fn checkout(
        &mut self,
        ledger: &dyn PurchaseLedger,
        request: CheckoutRequest,
    ) -> Result<CheckoutReceipt, CartError> {
        if self.cart.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let customer_email = Email::parse(&request.email).map_err(ValidationError::from)?;
        let shipping_details = request.shipping.validated()?;

        let purchase = ledger
            .record(NewPurchase {
                customer_email,
                total_amount: self.cart.total(),
                items: PurchaseItems {
                    products: self.cart.items().to_vec(),
                    shipping_details,
                },
            })
            .await
            .map_err(CartError::Ledger)?;

        info!(
            purchase_id = %purchase.id,
            total = %purchase.total_amount,
            items = purchase.items.products.len(),
            "Purchase recorded"
        );

        self.cart.clear();
        let CartChange { sync, .. } = self.commit().await;
        Ok(CheckoutReceipt { purchase, sync })
    }

    /// Persist locally, then queue the mirror write.
    async fn commit(&self) -> CartChange {
        match serde_json::to_string(&self.cart) {
            Ok(json) => {
                if let Err(e) = self.local.set(session_keys::CART, json).await {
                    warn!(guest_id = %self.guest, error = %e, "Could not persist cart locally");
                }
            }
            Err(e) => warn!(guest_id = %self.guest, error = %e, "Could not encode cart"),
        }

        let sync = self
            .mirror
            .submit(self.guest, self.cart.items().to_vec())
            .await;
        CartChange {
            changed: true,
            sync,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rosa_studio_core::defaults::default_items;
    use rosa_studio_core::memory::{MemoryCarts, MemoryLedger, MemoryLocalStore};
    use rosa_studio_core::ports::CartMirror;
    use rust_decimal::Decimal;

    use super::*;
    use crate::services::cart::{MirrorWorker, SyncOutcome};

    struct Fixture {
        local: Arc<MemoryLocalStore>,
        carts: Arc<MemoryCarts>,
        ledger: MemoryLedger,
        mirror: MirrorHandle,
        guest: GuestId,
    }

    impl Fixture {
        fn new() -> Self {
            let carts = Arc::new(MemoryCarts::new());
            let (mirror, _task) = MirrorWorker::spawn(carts.clone());
            Self {
                local: Arc::new(MemoryLocalStore::new()),
                carts,
                ledger: MemoryLedger::new(),
                mirror,
                guest: GuestId::generate(),
            }
        }

        async fn engine(&self) -> CartEngine {
            CartEngine::open(self.guest, self.local.clone(), self.mirror.clone()).await
        }
    }

    fn item(id: &str) -> PortfolioItem {
        default_items()
            .into_iter()
            .find(|i| i.id.as_str() == id)
            .unwrap()
    }

    fn checkout_request() -> CheckoutRequest {
        CheckoutRequest {
            email: "buyer@example.com".to_string(),
            shipping: ShippingDetails {
                name: "Ana".to_string(),
                address1: "1 Main St".to_string(),
                address2: String::new(),
                city: "Portland".to_string(),
                state: "OR".to_string(),
                zip: "97201".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_add_and_remove_totals() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        // "$85" and "$35"
        let _ = engine.add(item("1")).await;
        let _ = engine.add(item("2")).await;
        assert_eq!(engine.cart().count(), 2);
        assert_eq!(engine.cart().total(), Decimal::from(120));

        let change = engine.remove(&ItemId::new("1")).await;
        assert!(change.changed);
        assert_eq!(change.sync.outcome().await, SyncOutcome::Mirrored);
        assert_eq!(engine.cart().count(), 1);
        assert_eq!(engine.cart().total(), Decimal::from(35));
    }

    #[tokio::test]
    async fn test_cart_survives_reopen() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        let _ = engine.add(item("3")).await;
        let reopened = fx.engine().await;
        assert_eq!(reopened.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_skipped() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        let change = engine.remove(&ItemId::new("nope")).await;
        assert!(!change.changed);
        assert_eq!(change.sync.outcome().await, SyncOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_add_succeeds_when_mirror_fails() {
        let fx = Fixture::new();
        fx.carts.failure.set(true);
        let mut engine = fx.engine().await;
        let change = engine.add(item("1")).await;
        assert!(matches!(change.sync.outcome().await, SyncOutcome::Failed { .. }));
        assert_eq!(engine.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_is_rejected() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        let err = engine.checkout(&fx.ledger, checkout_request()).await.unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::EmptyCart)));
        assert!(fx.ledger.list_purchases().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_checkout_records_purchase_and_clears_cart() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        let _ = engine.add(item("1")).await;
        let _ = engine.add(item("2")).await;

        let receipt = engine.checkout(&fx.ledger, checkout_request()).await.unwrap();
        assert_eq!(receipt.purchase.total_amount, Decimal::from(120));
        assert_eq!(receipt.sync.outcome().await, SyncOutcome::Mirrored);
        assert!(engine.cart().is_empty());
        assert_eq!(fx.ledger.list_purchases().await.unwrap().len(), 1);

        let mirrored = fx.carts.load_cart(&fx.guest).await.unwrap().unwrap();
        assert!(mirrored.items.is_empty());
    }

    #[tokio::test]
    async fn test_checkout_ledger_failure_leaves_cart() {
        let fx = Fixture::new();
        fx.ledger.failure.set(true);
        let mut engine = fx.engine().await;
        let _ = engine.add(item("4")).await;

        let err = engine.checkout(&fx.ledger, checkout_request()).await.unwrap_err();
        assert!(matches!(err, CartError::Ledger(_)));
        assert_eq!(engine.cart().count(), 1);
        assert_eq!(fx.engine().await.cart().count(), 1);
    }

    #[tokio::test]
    async fn test_checkout_rejects_bad_email() {
        let fx = Fixture::new();
        let mut engine = fx.engine().await;
        let _ = engine.add(item("4")).await;
        let mut request = checkout_request();
        request.email = "not-an-email".to_string();
        let err = engine.checkout(&fx.ledger, request).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::Validation(ValidationError::InvalidEmail(_))
        ));
    }
}
