//! Shared catalog state.
//!
//! [`CatalogStore`] holds the in-process copy of items, categories and the
//! artist profile. Reads never touch the remote store. Every mutation is
//! written remotely first and applied locally only after the write succeeds,
//! so a failed write leaves the local copy exactly as it was.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::defaults::CatalogSeed;
use crate::ports::{BlobStore, CatalogRepository, StoreError};
use crate::types::validation::required;
use crate::types::{
    ArtistProfile, DisplayPrice, ImageInput, ImageKind, ItemId, NewPortfolioItem, PortfolioItem,
    ValidationError, filter_by_category,
};

/// Errors from catalog mutations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("image upload failed: {0}")]
    Upload(#[source] StoreError),

    #[error("image uploads are not configured")]
    UploadUnavailable,

    #[error("item {0} not found")]
    NotFound(ItemId),

    #[error("catalog store error: {0}")]
    Store(#[from] StoreError),
}

/// Point-in-time copy of the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub items: Vec<PortfolioItem>,
    pub categories: Vec<String>,
    pub profile: ArtistProfile,
}

impl From<CatalogSeed> for CatalogSnapshot {
    fn from(seed: CatalogSeed) -> Self {
        Self {
            items: seed.items,
            categories: seed.categories,
            profile: seed.profile,
        }
    }
}

/// Form input for creating or editing an item.
#[derive(Debug, Clone)]
pub struct ItemDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    pub price: String,
    pub image: Option<ImageInput>,
}

/// Form input for the artist profile.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub headline: String,
    pub highlight: String,
    pub description: String,
    pub image: Option<ImageInput>,
}

/// Proof that a destructive reset was explicitly confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfirmation(());

impl ResetConfirmation {
    /// The phrase an operator must type to confirm.
    pub const PHRASE: &'static str = "RESET";

    #[must_use]
    pub fn from_phrase(phrase: &str) -> Option<Self> {
        (phrase.trim() == Self::PHRASE).then_some(Self(()))
    }

    /// Confirmation given out of band, e.g. a `--yes` flag.
    #[must_use]
    pub const fn acknowledged() -> Self {
        Self(())
    }
}

/// Outcome of deleting a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRemoval {
    pub removed: bool,
    /// Items still pointing at the deleted name.
    pub dangling_items: usize,
}

/// Whether the local copy reflects the remote store yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// Built-in defaults; no successful refresh yet.
    Defaults,
    Remote,
}

struct CatalogState {
    snapshot: CatalogSnapshot,
    source: CatalogSource,
}

/// The process-wide catalog.
pub struct CatalogStore {
    repo: Arc<dyn CatalogRepository>,
    blobs: Option<Arc<dyn BlobStore>>,
    seed: CatalogSeed,
    state: RwLock<CatalogState>,
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("uploads", &self.blobs.is_some())
            .finish_non_exhaustive()
    }
}

impl CatalogStore {
    /// A store showing the built-in defaults until the first [`refresh`].
    ///
    /// [`refresh`]: Self::refresh
    #[must_use]
    pub fn new(repo: Arc<dyn CatalogRepository>) -> Self {
        let seed = CatalogSeed::builtin();
        Self {
            repo,
            blobs: None,
            state: RwLock::new(CatalogState {
                snapshot: seed.clone().into(),
                source: CatalogSource::Defaults,
            }),
            seed,
        }
    }

    /// Enable image uploads.
    #[must_use]
    pub fn with_blob_store(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = Some(blobs);
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    // ---- reads ----

    #[must_use]
    pub fn snapshot(&self) -> CatalogSnapshot {
        self.read().snapshot.clone()
    }

    #[must_use]
    pub fn source(&self) -> CatalogSource {
        self.read().source
    }

    #[must_use]
    pub fn items(&self) -> Vec<PortfolioItem> {
        self.read().snapshot.items.clone()
    }

    /// Items matching a gallery filter (`"All"` or `None` for everything).
    #[must_use]
    pub fn items_in(&self, category: Option<&str>) -> Vec<PortfolioItem> {
        let state = self.read();
        filter_by_category(&state.snapshot.items, category)
            .into_iter()
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<PortfolioItem> {
        self.read()
            .snapshot
            .items
            .iter()
            .find(|item| &item.id == id)
            .cloned()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        self.read().snapshot.categories.clone()
    }

    #[must_use]
    pub fn profile(&self) -> ArtistProfile {
        self.read().snapshot.profile.clone()
    }

    // ---- sync ----

    /// Reload everything from the remote store.
    ///
    /// The local copy is replaced only when all three reads succeed. A
    /// missing profile row falls back to the built-in profile.
    ///
    /// # Errors
    ///
    /// Returns the first store error; local state is unchanged.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Result<(), CatalogError> {
        let items = self.repo.list_items().await?;
        let categories = self.repo.list_categories().await?;
        let profile = self
            .repo
            .load_profile()
            .await?
            .unwrap_or_else(|| self.seed.profile.clone());

        let mut state = self.write();
        state.snapshot = CatalogSnapshot {
            items,
            categories,
            profile,
        };
        state.source = CatalogSource::Remote;
        drop(state);

        Ok(())
    }

    // ---- item mutations ----

    /// Validate, upload the image if needed, insert remotely, then prepend.
    ///
    /// # Errors
    ///
    /// Validation, upload and store failures; nothing is applied locally.
    #[instrument(skip(self, draft), fields(title = %draft.title))]
    pub async fn add_item(&self, draft: ItemDraft) -> Result<PortfolioItem, CatalogError> {
        let fields = self.validate_item(&draft)?;
        let image = draft
            .image
            .ok_or(ValidationError::MissingField("image"))?;
        let image_url = self.resolve_image(image).await?;

        let item = self
            .repo
            .insert_item(NewPortfolioItem {
                title: fields.title,
                category: fields.category,
                image_url,
                description: fields.description,
                price: fields.price,
            })
            .await?;

        self.write().snapshot.items.insert(0, item.clone());
        info!(item_id = %item.id, "Portfolio item added");
        Ok(item)
    }

    /// Replace an existing item's fields. Without a new image the current
    /// URL is kept.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotFound`] when neither copy knows the id, plus the
    /// same failures as [`add_item`](Self::add_item).
    #[instrument(skip(self, draft), fields(item_id = %id))]
    pub async fn update_item(
        &self,
        id: &ItemId,
        draft: ItemDraft,
    ) -> Result<PortfolioItem, CatalogError> {
        let fields = self.validate_item(&draft)?;
        let current_url = self.item(id).map(|item| item.image_url);

        let image_url = match (draft.image, current_url) {
            (Some(image), _) => self.resolve_image(image).await?,
            (None, Some(url)) => url,
            (None, None) => return Err(CatalogError::NotFound(id.clone())),
        };

        let item = PortfolioItem {
            id: id.clone(),
            title: fields.title,
            category: fields.category,
            image_url,
            description: fields.description,
            price: fields.price,
        };

        match self.repo.update_item(&item).await {
            Ok(()) => {}
            Err(StoreError::NotFound) => return Err(CatalogError::NotFound(id.clone())),
            Err(e) => return Err(e.into()),
        }

        let mut state = self.write();
        match state.snapshot.items.iter_mut().find(|i| &i.id == id) {
            Some(slot) => *slot = item.clone(),
            None => state.snapshot.items.insert(0, item.clone()),
        }
        drop(state);

        info!("Portfolio item updated");
        Ok(item)
    }

    /// Remove an item. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Store failures; the local copy keeps the item.
    #[instrument(skip(self), fields(item_id = %id))]
    pub async fn delete_item(&self, id: &ItemId) -> Result<bool, CatalogError> {
        let removed_remote = self.repo.delete_item(id).await?;

        let mut state = self.write();
        let before = state.snapshot.items.len();
        state.snapshot.items.retain(|item| &item.id != id);
        let removed_local = state.snapshot.items.len() != before;
        drop(state);

        if removed_remote || removed_local {
            info!("Portfolio item deleted");
        }
        Ok(removed_remote || removed_local)
    }

    // ---- categories ----

    /// Add a category. Returns `false`, without a remote call, when the name
    /// already exists.
    ///
    /// # Errors
    ///
    /// Blank names and store failures.
    #[instrument(skip(self))]
    pub async fn add_category(&self, name: &str) -> Result<bool, CatalogError> {
        let name = required("name", name)?;
        if self.read().snapshot.categories.contains(&name) {
            return Ok(false);
        }

        self.repo.insert_category(&name).await?;

        let mut state = self.write();
        let added = !state.snapshot.categories.contains(&name);
        if added {
            state.snapshot.categories.push(name);
        }
        drop(state);

        Ok(added)
    }

    /// Delete a category. Items keep their category string; the result says
    /// how many now reference a missing category.
    ///
    /// # Errors
    ///
    /// Store failures; the local copy keeps the category.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, name: &str) -> Result<CategoryRemoval, CatalogError> {
        let removed_remote = self.repo.delete_category(name).await?;

        let mut state = self.write();
        let before = state.snapshot.categories.len();
        state.snapshot.categories.retain(|c| c != name);
        let removed = removed_remote || state.snapshot.categories.len() != before;
        let dangling_items = state
            .snapshot
            .items
            .iter()
            .filter(|item| item.category == name)
            .count();
        drop(state);

        if dangling_items > 0 {
            warn!(dangling_items, "Deleted category is still used by items");
        }
        Ok(CategoryRemoval {
            removed,
            dangling_items,
        })
    }

    // ---- profile ----

    /// Replace the artist profile. Without a new image the current portrait
    /// is kept.
    ///
    /// # Errors
    ///
    /// Validation, upload and store failures.
    #[instrument(skip(self, draft))]
    pub async fn set_profile(&self, draft: ProfileDraft) -> Result<ArtistProfile, CatalogError> {
        let headline = required("headline", &draft.headline)?;
        let description = required("description", &draft.description)?;
        let current_image = self.read().snapshot.profile.image_url.clone();
        let image_url = match draft.image {
            Some(image) => self.resolve_image(image).await?,
            None => current_image,
        };

        let profile = ArtistProfile {
            headline,
            highlight: draft.highlight.trim().to_owned(),
            description: description.replace("\r\n", "\n"),
            image_url,
        };

        self.repo.save_profile(&profile).await?;
        self.write().snapshot.profile = profile.clone();
        info!("Artist profile updated");
        Ok(profile)
    }

    // ---- reset ----

    /// Replace all catalog content with the built-in seed, then refresh.
    ///
    /// # Errors
    ///
    /// Store failures from the reset itself; the local copy is unchanged.
    #[instrument(skip(self, _confirmation))]
    pub async fn reset_to_defaults(
        &self,
        _confirmation: ResetConfirmation,
    ) -> Result<CatalogSnapshot, CatalogError> {
        self.repo.reset(&self.seed).await?;
        warn!("Catalog reset to built-in defaults");

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Refresh after reset failed; using seed locally");
            let mut state = self.write();
            state.snapshot = self.seed.clone().into();
            state.source = CatalogSource::Remote;
        }
        Ok(self.snapshot())
    }

    // ---- helpers ----

    fn validate_item(&self, draft: &ItemDraft) -> Result<ValidItem, ValidationError> {
        let title = required("title", &draft.title)?;
        let description = required("description", &draft.description)?;
        let category = required("category", &draft.category)?;
        if !self.read().snapshot.categories.contains(&category) {
            return Err(ValidationError::UnknownCategory(category));
        }
        Ok(ValidItem {
            title,
            category,
            description,
            price: DisplayPrice::new(draft.price.trim()),
        })
    }

    async fn resolve_image(&self, image: ImageInput) -> Result<String, CatalogError> {
        match image {
            ImageInput::Existing(url) => Ok(required("image", &url)?),
            ImageInput::Upload(upload) => {
                let kind = ImageKind::from_content_type(&upload.content_type)?;
                if upload.bytes.is_empty() {
                    return Err(ValidationError::MissingField("image").into());
                }
                let blobs = self.blobs.as_ref().ok_or(CatalogError::UploadUnavailable)?;
                let object_name = object_name(&upload.extension(kind));
                let url = blobs
                    .upload(&object_name, kind.content_type(), upload.bytes)
                    .await
                    .map_err(CatalogError::Upload)?;
                info!(object = %object_name, "Image uploaded");
                Ok(url)
            }
        }
    }
}

struct ValidItem {
    title: String,
    category: String,
    description: String,
    price: DisplayPrice,
}

/// `<random>_<epoch millis>.<ext>`
fn object_name(extension: &str) -> String {
    let mut random = Uuid::new_v4().simple().to_string();
    random.truncate(10);
    format!("{random}_{}.{extension}", Utc::now().timestamp_millis())
}
