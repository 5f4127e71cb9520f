//! The artist's "about" section.

use serde::{Deserialize, Serialize};

/// Headline, highlight, biography and portrait shown on the About page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistProfile {
    pub headline: String,
    /// Emphasised continuation of the headline.
    pub highlight: String,
    /// Free text; blank lines separate paragraphs.
    pub description: String,
    pub image_url: String,
}

impl ArtistProfile {
    /// Description split into display paragraphs.
    pub fn paragraphs(&self) -> impl Iterator<Item = &str> {
        self.description
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_skip_blank_runs() {
        let profile = ArtistProfile {
            headline: "Crafting with".to_owned(),
            highlight: "Passion".to_owned(),
            description: "One.\n\n\n\nTwo.\n\n".to_owned(),
            image_url: String::new(),
        };
        assert_eq!(profile.paragraphs().collect::<Vec<_>>(), ["One.", "Two."]);
    }
}
