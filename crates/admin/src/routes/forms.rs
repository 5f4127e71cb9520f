//! Multipart form parsing for catalog edits.

use std::collections::HashMap;

use axum::extract::Multipart;

use rosa_studio_core::catalog::{ItemDraft, ProfileDraft};
use rosa_studio_core::{ImageInput, ImageUpload};

use crate::error::{AppError, Result};

/// File field carrying a new image.
const IMAGE_FIELD: &str = "image";
/// Text field carrying an already-hosted image URL.
const IMAGE_URL_FIELD: &str = "imageUrl";

/// Text fields plus the optional uploaded file.
#[derive(Debug, Default)]
pub struct CatalogForm {
    fields: HashMap<String, String>,
    upload: Option<ImageUpload>,
}

impl CatalogForm {
    /// Drain a multipart body.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a malformed body.
    pub async fn read(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
            let Some(name) = field.name().map(str::to_owned) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_owned();
                let content_type = field.content_type().unwrap_or_default().to_owned();
                let bytes = field.bytes().await.map_err(bad_form)?;
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    form.upload = Some(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            } else {
                let value = field.text().await.map_err(bad_form)?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    /// A new upload wins over a URL; blank URLs count as absent.
    fn image(&mut self) -> Option<ImageInput> {
        if let Some(upload) = self.upload.take() {
            return Some(ImageInput::Upload(upload));
        }
        self.fields
            .get(IMAGE_URL_FIELD)
            .map(|url| url.trim())
            .filter(|url| !url.is_empty())
            .map(|url| ImageInput::Existing(url.to_owned()))
    }

    #[must_use]
    pub fn into_item_draft(mut self) -> ItemDraft {
        ItemDraft {
            image: self.image(),
            title: self.text("title"),
            category: self.text("category"),
            description: self.text("description"),
            price: self.text("price"),
        }
    }

    #[must_use]
    pub fn into_profile_draft(mut self) -> ProfileDraft {
        ProfileDraft {
            image: self.image(),
            headline: self.text("headline"),
            highlight: self.text("highlight"),
            description: self.text("description"),
        }
    }
}

fn bad_form(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::BadRequest(format!("invalid form data: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(fields: &[(&str, &str)], upload: Option<ImageUpload>) -> CatalogForm {
        CatalogForm {
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            upload,
        }
    }

    #[test]
    fn test_upload_wins_over_url() {
        let upload = ImageUpload {
            file_name: "a.png".to_owned(),
            content_type: "image/png".to_owned(),
            bytes: vec![1],
        };
        let draft = form(&[("imageUrl", "https://x.test/a.png")], Some(upload)).into_item_draft();
        assert!(matches!(draft.image, Some(ImageInput::Upload(_))));
    }

    #[test]
    fn test_blank_url_is_no_image() {
        let draft = form(&[("title", "Wall hanging"), ("imageUrl", "  ")], None).into_item_draft();
        assert_eq!(draft.title, "Wall hanging");
        assert!(draft.image.is_none());
    }

    #[test]
    fn test_profile_fields() {
        let draft = form(
            &[
                ("headline", "Meet the maker"),
                ("highlight", "Rosa"),
                ("imageUrl", "https://x.test/me.jpg"),
            ],
            None,
        )
        .into_profile_draft();
        assert_eq!(draft.headline, "Meet the maker");
        assert_eq!(draft.description, "");
        assert_eq!(
            draft.image,
            Some(ImageInput::Existing("https://x.test/me.jpg".to_owned()))
        );
    }
}
