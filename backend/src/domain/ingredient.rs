//! Ingredients: user-owned names such as "Salt" or "Kale".

use super::label::define_label;

define_label! {
    /// Database-assigned ingredient identifier.
    pub struct IngredientId;

    /// An ingredient owned by exactly one user.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{Ingredient, IngredientId, LabelName, UserId};
    ///
    /// let name = LabelName::new("Kale").expect("valid name");
    /// let ingredient = Ingredient::new(IngredientId::new(1), UserId::new(9), name);
    /// assert_eq!(ingredient.to_string(), "Kale");
    /// ```
    pub struct Ingredient;
}
