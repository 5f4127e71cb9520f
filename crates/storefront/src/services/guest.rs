//! Anonymous guest identity.
//!
//! Every browser gets a random [`GuestId`] on its first request. The id is
//! kept in browser-local storage and reused for cart mirroring and traffic
//! attribution.

use serde::Serialize;
use tracing::warn;

use rosa_studio_core::GuestId;
use rosa_studio_core::ports::LocalStore;

use crate::models::session_keys;

/// The resolved identity for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestIdentity {
    pub id: GuestId,
    /// `false` when local storage could not hold the id; a later request
    /// will then see a different guest.
    pub persisted: bool,
}

/// Return the stored guest id, creating and storing one if absent.
///
/// Never fails. A storage failure yields a fresh, unpersisted id and a
/// warning; a corrupt stored value is replaced.
pub async fn get_or_create(store: &dyn LocalStore) -> GuestIdentity {
    match store.get(session_keys::GUEST_ID).await {
        Ok(Some(raw)) => match raw.parse::<GuestId>() {
            Ok(id) => {
                return GuestIdentity {
                    id,
                    persisted: true,
                };
            }
            Err(e) => warn!(error = %e, "Stored guest id is corrupt; issuing a new one"),
        },
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "Local storage unavailable; using a transient guest id");
            return GuestIdentity {
                id: GuestId::generate(),
                persisted: false,
            };
        }
    }

    let id = GuestId::generate();
    let persisted = match store.set(session_keys::GUEST_ID, id.to_string()).await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Could not persist guest id");
            false
        }
    };
    GuestIdentity { id, persisted }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rosa_studio_core::memory::MemoryLocalStore;

    use super::*;

    #[tokio::test]
    async fn test_same_id_within_one_session() {
        let store = MemoryLocalStore::new();
        let first = get_or_create(&store).await;
        let second = get_or_create(&store).await;
        assert!(first.persisted);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_unavailable_storage_still_yields_an_id() {
        let store = MemoryLocalStore::new();
        store.failure.set(true);
        let first = get_or_create(&store).await;
        let second = get_or_create(&store).await;
        assert!(!first.persisted);
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_replaced() {
        let store = MemoryLocalStore::new();
        store
            .set(session_keys::GUEST_ID, "garbage".to_string())
            .await
            .unwrap();
        let identity = get_or_create(&store).await;
        assert!(identity.persisted);
        assert_eq!(
            store.get(session_keys::GUEST_ID).await.unwrap(),
            Some(identity.id.to_string())
        );
    }
}
