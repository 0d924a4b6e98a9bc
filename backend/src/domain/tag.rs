//! Tags: user-owned labels such as "Vegan" or "Dessert".

use super::label::define_label;

define_label! {
    /// Database-assigned tag identifier.
    pub struct TagId;

    /// A tag owned by exactly one user.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{LabelName, Tag, TagId, UserId};
    ///
    /// let name = LabelName::new("Vegan").expect("valid name");
    /// let tag = Tag::new(TagId::new(1), UserId::new(9), name);
    /// assert_eq!(tag.to_string(), "Vegan");
    /// ```
    pub struct Tag;
}
