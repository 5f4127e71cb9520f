//! In-memory adapters for every storage port.
//!
//! Used by tests and local development. Each adapter can be switched into a
//! failing mode to exercise degraded paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::defaults::CatalogSeed;
use crate::ports::{
    BlobStore, CartMirror, CatalogRepository, CustomRequestInbox, LocalStore, PurchaseLedger,
    StoreError, TrafficLog,
};
use crate::types::{
    ArtistProfile, CartSnapshot, CustomRequest, CustomRequestId, GuestId, ItemId,
    NewCustomRequest, NewPortfolioItem, NewPurchase, PortfolioItem, Purchase, PurchaseId,
    TrafficEvent,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Toggle that makes an adapter return [`StoreError::Unavailable`].
#[derive(Debug, Default)]
pub struct FailureSwitch(AtomicBool);

impl FailureSwitch {
    pub fn set(&self, failing: bool) {
        self.0.store(failing, Ordering::SeqCst);
    }

    fn check(&self, what: &str) -> Result<(), StoreError> {
        if self.0.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable(format!("{what} is switched off")))
        } else {
            Ok(())
        }
    }
}

fn short_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(12);
    id
}

#[derive(Debug, Default)]
struct CatalogData {
    items: Vec<PortfolioItem>,
    categories: Vec<String>,
    profile: Option<ArtistProfile>,
}

/// In-memory [`CatalogRepository`].
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    data: Mutex<CatalogData>,
    writes: AtomicUsize,
    pub failure: FailureSwitch,
}

impl MemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository already holding the seed content.
    #[must_use]
    pub fn seeded(seed: &CatalogSeed) -> Self {
        let repo = Self::new();
        {
            let mut data = lock(&repo.data);
            data.items.clone_from(&seed.items);
            data.categories.clone_from(&seed.categories);
            data.profile = Some(seed.profile.clone());
        }
        repo
    }

    /// Number of successful write calls so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn wrote(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_items(&self) -> Result<Vec<PortfolioItem>, StoreError> {
        self.failure.check("catalog")?;
        Ok(lock(&self.data).items.clone())
    }

    async fn insert_item(&self, item: NewPortfolioItem) -> Result<PortfolioItem, StoreError> {
        self.failure.check("catalog")?;
        let item = item.with_id(ItemId::new(short_id()));
        lock(&self.data).items.insert(0, item.clone());
        self.wrote();
        Ok(item)
    }

    async fn update_item(&self, item: &PortfolioItem) -> Result<(), StoreError> {
        self.failure.check("catalog")?;
        let mut data = lock(&self.data);
        let slot = data
            .items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or(StoreError::NotFound)?;
        *slot = item.clone();
        drop(data);
        self.wrote();
        Ok(())
    }

    async fn delete_item(&self, id: &ItemId) -> Result<bool, StoreError> {
        self.failure.check("catalog")?;
        let mut data = lock(&self.data);
        let before = data.items.len();
        data.items.retain(|item| &item.id != id);
        let removed = data.items.len() != before;
        drop(data);
        self.wrote();
        Ok(removed)
    }

    async fn list_categories(&self) -> Result<Vec<String>, StoreError> {
        self.failure.check("catalog")?;
        Ok(lock(&self.data).categories.clone())
    }

    async fn insert_category(&self, name: &str) -> Result<(), StoreError> {
        self.failure.check("catalog")?;
        let mut data = lock(&self.data);
        if !data.categories.iter().any(|c| c == name) {
            data.categories.push(name.to_owned());
        }
        drop(data);
        self.wrote();
        Ok(())
    }

    async fn delete_category(&self, name: &str) -> Result<bool, StoreError> {
        self.failure.check("catalog")?;
        let mut data = lock(&self.data);
        let before = data.categories.len();
        data.categories.retain(|c| c != name);
        let removed = data.categories.len() != before;
        drop(data);
        self.wrote();
        Ok(removed)
    }

    async fn load_profile(&self) -> Result<Option<ArtistProfile>, StoreError> {
        self.failure.check("catalog")?;
        Ok(lock(&self.data).profile.clone())
    }

    async fn save_profile(&self, profile: &ArtistProfile) -> Result<(), StoreError> {
        self.failure.check("catalog")?;
        lock(&self.data).profile = Some(profile.clone());
        self.wrote();
        Ok(())
    }

    async fn reset(&self, seed: &CatalogSeed) -> Result<(), StoreError> {
        self.failure.check("catalog")?;
        *lock(&self.data) = CatalogData {
            items: seed.items.clone(),
            categories: seed.categories.clone(),
            profile: Some(seed.profile.clone()),
        };
        self.wrote();
        Ok(())
    }
}

/// In-memory [`CartMirror`] that also keeps every upsert it received.
#[derive(Debug, Default)]
pub struct MemoryCarts {
    carts: Mutex<HashMap<GuestId, CartSnapshot>>,
    history: Mutex<Vec<(GuestId, Vec<ItemId>)>>,
    pub failure: FailureSwitch,
}

impl MemoryCarts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Item ids of each upsert for `guest`, oldest first.
    pub fn history(&self, guest: &GuestId) -> Vec<Vec<ItemId>> {
        lock(&self.history)
            .iter()
            .filter(|(g, _)| g == guest)
            .map(|(_, ids)| ids.clone())
            .collect()
    }
}

#[async_trait]
impl CartMirror for MemoryCarts {
    async fn upsert_cart(&self, guest: &GuestId, items: &[PortfolioItem]) -> Result<(), StoreError> {
        self.failure.check("cart mirror")?;
        lock(&self.carts).insert(
            *guest,
            CartSnapshot {
                guest_id: *guest,
                items: items.to_vec(),
                updated_at: Utc::now(),
            },
        );
        lock(&self.history).push((*guest, items.iter().map(|i| i.id.clone()).collect()));
        Ok(())
    }

    async fn load_cart(&self, guest: &GuestId) -> Result<Option<CartSnapshot>, StoreError> {
        self.failure.check("cart mirror")?;
        Ok(lock(&self.carts).get(guest).cloned())
    }

    async fn list_carts(&self) -> Result<Vec<CartSnapshot>, StoreError> {
        self.failure.check("cart mirror")?;
        Ok(lock(&self.carts).values().cloned().collect())
    }
}

/// In-memory [`PurchaseLedger`].
#[derive(Debug, Default)]
pub struct MemoryLedger {
    purchases: Mutex<Vec<Purchase>>,
    pub failure: FailureSwitch,
}

impl MemoryLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PurchaseLedger for MemoryLedger {
    async fn record(&self, purchase: NewPurchase) -> Result<Purchase, StoreError> {
        self.failure.check("purchase ledger")?;
        let purchase = purchase.recorded(PurchaseId::new(Uuid::new_v4().to_string()), Utc::now());
        lock(&self.purchases).insert(0, purchase.clone());
        Ok(purchase)
    }

    async fn list_purchases(&self) -> Result<Vec<Purchase>, StoreError> {
        self.failure.check("purchase ledger")?;
        Ok(lock(&self.purchases).clone())
    }
}

/// In-memory [`TrafficLog`].
#[derive(Debug, Default)]
pub struct MemoryTraffic {
    events: Mutex<Vec<TrafficEvent>>,
    pub failure: FailureSwitch,
}

impl MemoryTraffic {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrafficEvent> {
        lock(&self.events).clone()
    }
}

#[async_trait]
impl TrafficLog for MemoryTraffic {
    async fn record(&self, event: &TrafficEvent) -> Result<(), StoreError> {
        self.failure.check("traffic log")?;
        lock(&self.events).push(event.clone());
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        self.failure.check("traffic log")?;
        Ok(lock(&self.events).len() as u64)
    }
}

/// In-memory [`CustomRequestInbox`].
#[derive(Debug, Default)]
pub struct MemoryInbox {
    requests: Mutex<Vec<CustomRequest>>,
    pub failure: FailureSwitch,
}

impl MemoryInbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomRequestInbox for MemoryInbox {
    async fn submit(&self, request: NewCustomRequest) -> Result<CustomRequest, StoreError> {
        self.failure.check("request inbox")?;
        let stored = request.stored(CustomRequestId::new(short_id()), Utc::now());
        lock(&self.requests).insert(0, stored.clone());
        Ok(stored)
    }

    async fn list_requests(&self) -> Result<Vec<CustomRequest>, StoreError> {
        self.failure.check("request inbox")?;
        Ok(lock(&self.requests).clone())
    }
}

/// In-memory [`BlobStore`] serving objects from a fake public base URL.
#[derive(Debug)]
pub struct MemoryBlobStore {
    base_url: String,
    objects: Mutex<HashMap<String, (String, Vec<u8>)>>,
    pub failure: FailureSwitch,
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new("https://blobs.test/site-images")
    }
}

impl MemoryBlobStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
            failure: FailureSwitch::default(),
        }
    }

    pub fn object_names(&self) -> Vec<String> {
        lock(&self.objects).keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.failure.check("blob store")?;
        lock(&self.objects).insert(object_name.to_owned(), (content_type.to_owned(), bytes));
        Ok(format!("{}/{object_name}", self.base_url))
    }
}

/// In-memory [`LocalStore`].
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    values: Mutex<HashMap<String, String>>,
    pub failure: FailureSwitch,
}

impl MemoryLocalStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.failure.check("local storage")?;
        Ok(lock(&self.values).get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.failure.check("local storage")?;
        lock(&self.values).insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.failure.check("local storage")?;
        lock(&self.values).remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{DisplayPrice, Email, PurchaseItems, ShippingDetails};

    fn new_item(title: &str) -> NewPortfolioItem {
        NewPortfolioItem {
            title: title.to_owned(),
            category: "Macrame".to_owned(),
            image_url: "https://example.com/x.png".to_owned(),
            description: "d".to_owned(),
            price: DisplayPrice::new("$1"),
        }
    }

    #[tokio::test]
    async fn test_insert_prepends() {
        let repo = MemoryCatalog::seeded(&CatalogSeed::builtin());
        let item = repo.insert_item(new_item("Fresh")).await.unwrap();
        let items = repo.list_items().await.unwrap();
        assert_eq!(items.first().map(|i| &i.id), Some(&item.id));
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryCatalog::new();
        let ghost = new_item("Ghost").with_id(ItemId::new("ghost"));
        assert!(matches!(
            repo.update_item(&ghost).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_failure_switch() {
        let traffic = MemoryTraffic::new();
        traffic.failure.set(true);
        let event = TrafficEvent::now("/", GuestId::generate());
        assert!(matches!(
            traffic.record(&event).await,
            Err(StoreError::Unavailable(_))
        ));
        traffic.failure.set(false);
        traffic.record(&event).await.unwrap();
        assert_eq!(traffic.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_active_cart_count_ignores_empty_carts() {
        let carts = MemoryCarts::new();
        let seed = CatalogSeed::builtin();
        carts
            .upsert_cart(&GuestId::generate(), &seed.items[..1])
            .await
            .unwrap();
        carts.upsert_cart(&GuestId::generate(), &[]).await.unwrap();
        assert_eq!(carts.count_active_carts().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_revenue_caps_instead_of_overflowing() {
        let ledger = MemoryLedger::new();
        for _ in 0..2 {
            ledger
                .record(NewPurchase {
                    customer_email: Email::parse("ada@example.com").unwrap(),
                    total_amount: Decimal::MAX,
                    items: PurchaseItems {
                        products: Vec::new(),
                        shipping_details: ShippingDetails::default(),
                    },
                })
                .await
                .unwrap();
        }
        assert_eq!(ledger.total_revenue().await.unwrap(), Decimal::MAX);
    }
}
