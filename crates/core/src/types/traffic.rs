//! Page-view events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::id::GuestId;

/// Longest page path accepted for logging.
pub const MAX_PAGE_PATH_LEN: usize = 512;

/// One page view by one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficEvent {
    pub page_path: String,
    pub guest_id: GuestId,
    pub timestamp: DateTime<Utc>,
}

impl TrafficEvent {
    #[must_use]
    pub fn now(page_path: impl Into<String>, guest_id: GuestId) -> Self {
        Self {
            page_path: page_path.into(),
            guest_id,
            timestamp: Utc::now(),
        }
    }
}

/// Normalise a client-reported path; `None` when it should not be logged.
#[must_use]
pub fn normalize_page_path(raw: &str) -> Option<String> {
    let path = raw.trim();
    if path.is_empty() || path.len() > MAX_PAGE_PATH_LEN {
        return None;
    }
    if path.starts_with('/') {
        Some(path.to_owned())
    } else {
        Some(format!("/{path}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page_path() {
        assert_eq!(normalize_page_path(" /gallery "), Some("/gallery".to_owned()));
        assert_eq!(normalize_page_path("about"), Some("/about".to_owned()));
        assert_eq!(normalize_page_path("   "), None);
        assert_eq!(normalize_page_path(&"a".repeat(600)), None);
    }
}
