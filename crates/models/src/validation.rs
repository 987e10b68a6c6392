//! Field checks shared by the relational inputs.
//!
//! Lengths are counted in characters, matching the column limits.

use rust_decimal::Decimal;

use crate::errors::ModelError;

pub fn required(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} is required")));
    }
    max_len(field, value, max)
}

pub fn optional(field: &str, value: Option<&str>, max: usize) -> Result<(), ModelError> {
    match value {
        Some(v) => max_len(field, v, max),
        None => Ok(()),
    }
}

fn max_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.chars().count() > max {
        return Err(ModelError::Validation(format!("{field} must be at most {max} characters")));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), ModelError> {
    required("email", value, 100)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(ModelError::Validation("email is not a valid address".into()));
    }
    Ok(())
}

pub fn phone(value: Option<&str>) -> Result<(), ModelError> {
    optional("phone", value, 20)?;
    if let Some(p) = value {
        let ok = p.chars().all(|c| c.is_ascii_digit() || " +-()".contains(c));
        if !ok {
            return Err(ModelError::Validation("phone contains invalid characters".into()));
        }
    }
    Ok(())
}

pub fn url(field: &str, value: Option<&str>, max: usize) -> Result<(), ModelError> {
    optional(field, value, max)?;
    match value {
        Some(v) if !v.is_empty() && !(v.starts_with("http://") || v.starts_with("https://")) => {
            Err(ModelError::Validation(format!("{field} must start with http(s)")))
        }
        _ => Ok(()),
    }
}

pub fn non_negative(field: &str, value: Decimal) -> Result<(), ModelError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ModelError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}

/// Largest value a `decimal(18,2)` column holds.
pub fn money_max() -> Decimal {
    Decimal::new(999_999_999_999_999_999, 2)
}

/// Non-negative, at most two decimal places and within `decimal(18,2)`.
pub fn money(field: &str, value: Decimal) -> Result<(), ModelError> {
    non_negative(field, value)?;
    if value.normalize().scale() > 2 {
        return Err(ModelError::Validation(format!("{field} must have at most 2 decimal places")));
    }
    if value > money_max() {
        return Err(ModelError::Validation(format!("{field} must be at most {}", money_max())));
    }
    Ok(())
}

pub fn at_least(field: &str, value: i32, min: i32) -> Result<(), ModelError> {
    if value < min {
        return Err(ModelError::Validation(format!("{field} must be >= {min}")));
    }
    Ok(())
}
