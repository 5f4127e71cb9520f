//! Built-in starter catalog.
//!
//! Used to seed an empty store and as the target of an explicit reset.
//! Seed items carry fixed ids so resetting twice yields the same catalog.

use crate::types::{ArtistProfile, DisplayPrice, ItemId, PortfolioItem};

/// The full starter content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSeed {
    /// Items in display order.
    pub items: Vec<PortfolioItem>,
    /// Categories in display order.
    pub categories: Vec<String>,
    pub profile: ArtistProfile,
}

impl CatalogSeed {
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            items: default_items(),
            categories: default_categories(),
            profile: default_profile(),
        }
    }
}

impl Default for CatalogSeed {
    fn default() -> Self {
        Self::builtin()
    }
}

const CATEGORIES: [&str; 5] = [
    "Macrame",
    "Bleach Art",
    "DTF Sublimation",
    "Painting",
    "Miscellaneous",
];

// (id, title, category, image_url, description, price)
const ITEMS: [(&str, &str, &str, &str, &str, &str); 6] = [
    (
        "1",
        "Luna Dream Catcher",
        "Macrame",
        "https://picsum.photos/800/1000?random=10",
        "Large woven dream catcher with natural feathers and amethyst crystals.",
        "$85",
    ),
    (
        "2",
        "Vintage Soul DTF Tee",
        "DTF Sublimation",
        "https://picsum.photos/800/1001?random=11",
        "Custom DTF sublimation print with a distressed vintage aesthetic.",
        "$35",
    ),
    (
        "3",
        "Boho Baby Rattle",
        "Macrame",
        "https://picsum.photos/800/1002?random=12",
        "Organic cotton macrame teething ring, safe and soft for little hands.",
        "$25",
    ),
    (
        "4",
        "Eclipse Bleach Hoodie",
        "Bleach Art",
        "https://picsum.photos/800/1003?random=13",
        "Hand-painted bleach design featuring a solar eclipse on heavyweight cotton.",
        "$65",
    ),
    (
        "5",
        "Tiered Plant Hanger",
        "Macrame",
        "https://picsum.photos/800/1004?random=14",
        "Heavy-duty 3-tier plant hanger suitable for large pots.",
        "$75",
    ),
    (
        "6",
        "Abstract Coastline",
        "Painting",
        "https://picsum.photos/800/1005?random=15",
        "Acrylic on canvas capturing the moody tones of the pacific coast.",
        "$200",
    ),
];

const PROFILE_DESCRIPTION: &str = "Hi, I'm Rosa. My creative journey doesn't follow a single path. \
I love the texture of natural fibers, the chemistry of bleach on fabric, and the endless \
possibilities of digital sublimation.\n\nFrom creating safe, intricate macrame toys for babies \
to designing bold custom shirts and painting abstracts on canvas, I pour my heart into every \
medium.\n\nI believe in making things that are personal. That's why I love working directly \
with people to create custom dream catchers, specific plant hanger sizes, or one-of-a-kind \
apparel that speaks to their style.";

#[must_use]
pub fn default_categories() -> Vec<String> {
    CATEGORIES.iter().map(|&c| c.to_owned()).collect()
}

#[must_use]
pub fn default_items() -> Vec<PortfolioItem> {
    ITEMS
        .iter()
        .map(
            |&(id, title, category, image_url, description, price)| PortfolioItem {
                id: ItemId::new(id),
                title: title.to_owned(),
                category: category.to_owned(),
                image_url: image_url.to_owned(),
                description: description.to_owned(),
                price: DisplayPrice::new(price),
            },
        )
        .collect()
}

#[must_use]
pub fn default_profile() -> ArtistProfile {
    ArtistProfile {
        headline: "Crafting with".to_owned(),
        highlight: "Multifaceted Passion".to_owned(),
        description: PROFILE_DESCRIPTION.to_owned(),
        image_url: "https://picsum.photos/800/1200?random=99".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_items_use_seed_categories() {
        let seed = CatalogSeed::builtin();
        for item in &seed.items {
            assert!(seed.categories.contains(&item.category), "{}", item.title);
        }
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let items = default_items();
        let mut ids: Vec<_> = items.iter().map(|i| i.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn test_profile_has_three_paragraphs() {
        assert_eq!(default_profile().paragraphs().count(), 3);
    }
}
