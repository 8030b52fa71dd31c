//! Category-keyed illustrative images.

use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::ToSchema;

/// Errors raised by [`ImageCategory::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageCategoryError {
    /// The label is empty after trimming.
    #[error("image category must not be empty")]
    Empty,
}

/// Normalised image category: trimmed and lower-cased.
///
/// Two labels differing only in case or surrounding whitespace name the same
/// category, so re-uploading under either overwrites one row.
///
/// # Examples
/// ```
/// use inventory_backend::domain::ImageCategory;
///
/// let category = ImageCategory::new(" Elemento 1 ").expect("valid label");
/// assert_eq!(category.as_str(), "elemento 1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
pub struct ImageCategory(String);

impl ImageCategory {
    /// Normalise and validate a label.
    pub fn new(label: impl AsRef<str>) -> Result<Self, ImageCategoryError> {
        let normalised = label.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(ImageCategoryError::Empty);
        }
        Ok(Self(normalised))
    }

    /// Positional label used when the caller supplies none (1-based).
    #[must_use]
    pub fn positional(position: usize) -> Self {
        Self(format!("elemento {position}"))
    }

    /// Borrow the normalised category text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for ImageCategory {
    type Error = ImageCategoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ImageCategory> for String {
    fn from(value: ImageCategory) -> Self {
        value.0
    }
}

impl std::fmt::Display for ImageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping from a category to the absolute URL of its hosted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IllustrativeImage {
    /// Unique category key.
    pub category: ImageCategory,
    /// Absolute URL returned by the asset host.
    pub url: Url,
}

/// One image file received for publishing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Caller-supplied category label, if any.
    pub label: Option<String>,
    /// Original file name, used to derive the format.
    pub file_name: String,
    /// Declared MIME type, if any.
    pub content_type: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Filtros", "filtros")]
    #[case("  BUJÍAS  ", "bujías")]
    #[case("Elemento 3", "elemento 3")]
    fn labels_are_trimmed_and_lowercased(#[case] raw: &str, #[case] expected: &str) {
        let category = ImageCategory::new(raw).expect("valid label");
        assert_eq!(category.as_str(), expected);
    }

    #[rstest]
    fn blank_labels_are_rejected() {
        assert_eq!(ImageCategory::new("  "), Err(ImageCategoryError::Empty));
    }

    #[rstest]
    fn positional_labels_match_normalised_form() {
        let positional = ImageCategory::positional(2);
        assert_eq!(positional, ImageCategory::new("Elemento 2").expect("valid"));
    }
}
