//! Whole-unit recipe prices.

use std::fmt;

use rust_decimal::Decimal;

use super::RecipeValidationError;

/// Maximum number of digits stored for a price (`NUMERIC(12, 0)`).
pub const PRICE_MAX_DIGITS: u32 = 12;

/// Non-negative price with zero decimal places.
///
/// Inputs such as `"12.00"` are accepted and rescaled; `"12.50"` is not.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::new(Decimal::new(1200, 2)).expect("whole amount");
/// assert_eq!(price.to_string(), "12");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    /// Validate and rescale a decimal amount.
    ///
    /// # Errors
    ///
    /// [`RecipeValidationError`] for negative, fractional or overlong values.
    pub fn new(value: Decimal) -> Result<Self, RecipeValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(RecipeValidationError::NegativePrice);
        }
        if !value.fract().is_zero() {
            return Err(RecipeValidationError::FractionalPrice);
        }
        let mut whole = value.trunc();
        whole.rescale(0);
        whole.set_sign_positive(true);
        if whole > Self::max_value() {
            return Err(RecipeValidationError::PriceTooLarge {
                max_digits: PRICE_MAX_DIGITS,
            });
        }
        Ok(Self(whole))
    }

    fn max_value() -> Decimal {
        Decimal::from(10_i64.pow(PRICE_MAX_DIGITS) - 1)
    }

    /// The whole amount with scale zero.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<Price> for Decimal {
    fn from(value: Price) -> Self {
        value.0
    }
}
