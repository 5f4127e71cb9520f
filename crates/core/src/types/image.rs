//! Image references for catalog writes.

use core::fmt;

use super::validation::ValidationError;

/// Image formats the blob store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Match a declared MIME type.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::UnsupportedImage`] for anything other than
    /// `image/jpeg` or `image/png`.
    pub fn from_content_type(content_type: &str) -> Result<Self, ValidationError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/jpeg" | "image/jpg" => Ok(Self::Jpeg),
            "image/png" => Ok(Self::Png),
            _ => Err(ValidationError::UnsupportedImage(content_type.to_owned())),
        }
    }

    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// A file picked in the admin form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Extension for the stored object, taken from the original file name
    /// when it has one, otherwise from the content type.
    #[must_use]
    pub fn extension(&self, kind: ImageKind) -> String {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| kind.extension().to_owned())
    }
}

/// Where a catalog write gets its image from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// Keep or set an already-hosted URL.
    Existing(String),
    /// Upload a new file and use its public URL.
    Upload(ImageUpload),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_jpeg_and_png() {
        assert_eq!(ImageKind::from_content_type("image/jpeg"), Ok(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_content_type("IMAGE/PNG"), Ok(ImageKind::Png));
    }

    #[test]
    fn test_rejects_other_types() {
        assert!(ImageKind::from_content_type("image/gif").is_err());
        assert!(ImageKind::from_content_type("application/pdf").is_err());
    }

    #[test]
    fn test_extension_prefers_file_name() {
        let upload = ImageUpload {
            file_name: "Luna.JPEG".to_owned(),
            content_type: "image/jpeg".to_owned(),
            bytes: vec![1, 2, 3],
        };
        assert_eq!(upload.extension(ImageKind::Jpeg), "jpeg");

        let nameless = ImageUpload {
            file_name: "blob".to_owned(),
            ..upload
        };
        assert_eq!(nameless.extension(ImageKind::Png), "png");
    }
}
