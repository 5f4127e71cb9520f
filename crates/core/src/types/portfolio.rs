//! Portfolio items and categories.

use serde::{Deserialize, Serialize};

use super::id::ItemId;
use super::price::DisplayPrice;

/// The category name the gallery treats as "no filter".
pub const ALL_CATEGORIES: &str = "All";

/// A piece shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioItem {
    pub id: ItemId,
    pub title: String,
    /// Category name. May reference a category that has since been deleted.
    pub category: String,
    pub image_url: String,
    pub description: String,
    #[serde(default)]
    pub price: DisplayPrice,
}

/// A validated item ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPortfolioItem {
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub description: String,
    pub price: DisplayPrice,
}

impl NewPortfolioItem {
    /// Attach a store-assigned id.
    #[must_use]
    pub fn with_id(self, id: ItemId) -> PortfolioItem {
        PortfolioItem {
            id,
            title: self.title,
            category: self.category,
            image_url: self.image_url,
            description: self.description,
            price: self.price,
        }
    }
}

/// Items in display order matching a gallery filter.
///
/// `None`, an empty string and [`ALL_CATEGORIES`] all mean "every item".
#[must_use]
pub fn filter_by_category<'a>(
    items: &'a [PortfolioItem],
    category: Option<&str>,
) -> Vec<&'a PortfolioItem> {
    match category.map(str::trim) {
        None | Some("" | ALL_CATEGORIES) => items.iter().collect(),
        Some(name) => items.iter().filter(|item| item.category == name).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn item(id: &str, category: &str) -> PortfolioItem {
        PortfolioItem {
            id: ItemId::new(id),
            title: format!("Item {id}"),
            category: category.to_owned(),
            image_url: "https://example.com/a.png".to_owned(),
            description: String::new(),
            price: DisplayPrice::new("$10"),
        }
    }

    #[test]
    fn test_filter_all() {
        let items = vec![item("1", "Macrame"), item("2", "Painting")];
        assert_eq!(filter_by_category(&items, None).len(), 2);
        assert_eq!(filter_by_category(&items, Some("All")).len(), 2);
        assert_eq!(filter_by_category(&items, Some("")).len(), 2);
    }

    #[test]
    fn test_filter_named_category_keeps_order() {
        let items = vec![
            item("1", "Macrame"),
            item("2", "Painting"),
            item("3", "Macrame"),
        ];
        let ids: Vec<_> = filter_by_category(&items, Some("Macrame"))
            .into_iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, ["1", "3"]);
    }

    #[test]
    fn test_missing_price_deserializes_as_empty() {
        let json = r#"{"id":"9","title":"T","category":"C","imageUrl":"u","description":"d"}"#;
        let parsed: PortfolioItem = serde_json::from_str(json).unwrap();
        assert!(parsed.price.is_empty());
    }
}
