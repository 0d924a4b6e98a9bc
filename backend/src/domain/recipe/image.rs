//! Storage paths for uploaded recipe images.

use std::fmt;

/// Directory, relative to the media root, holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "uploads/recipe";

/// Relative path of a stored image, as persisted on the recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImagePath(String);

impl ImagePath {
    /// Wrap a path read back from storage.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Path relative to the media root.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ImagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Build the storage path for an uploaded image.
///
/// The stem is the caller's fresh random identifier, so two uploads of the
/// same file land in different places. The extension is copied from the
/// original file name when it is plain ASCII alphanumeric; anything else is
/// dropped rather than trusted.
///
/// # Examples
/// ```
/// use recipe_backend::domain::recipe_image_path;
///
/// let path = recipe_image_path("0b8a5f0c", "photo.jpg");
/// assert_eq!(path.as_str(), "uploads/recipe/0b8a5f0c.jpg");
/// ```
#[must_use]
pub fn recipe_image_path(identifier: impl fmt::Display, filename: &str) -> ImagePath {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    ImagePath(extension.map_or_else(
        || format!("{RECIPE_IMAGE_DIR}/{identifier}"),
        |ext| format!("{RECIPE_IMAGE_DIR}/{identifier}.{ext}"),
    ))
}
