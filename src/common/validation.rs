// src/common/validation.rs

use rust_decimal::Decimal;
use validator::ValidationError;

// Regras customizadas usadas com #[validate(custom(function = ...))]

pub fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}
