// Request field validation, applied before anything reaches the stores

use crate::core::error::ApiError;

/// Trim a required text field, rejecting blank values
pub fn required_text(value: &str, field: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

pub fn validate_price(price: f64) -> Result<f64, ApiError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ApiError::InvalidInput(
            "Price must be a non-negative number".to_string(),
        ));
    }
    Ok(price)
}

/// Purchase amount: omitted defaults to 1, explicit non-positive is rejected
pub fn purchase_amount(quantity: Option<i64>) -> Result<u32, ApiError> {
    let amount = match quantity {
        None => return Ok(1),
        Some(value) => value,
    };

    if amount <= 0 {
        return Err(ApiError::InvalidInput(
            "Purchase quantity must be positive".to_string(),
        ));
    }

    u32::try_from(amount)
        .map_err(|_| ApiError::InvalidInput("Purchase quantity is too large".to_string()))
}

pub fn restock_amount(quantity: i64) -> Result<u32, ApiError> {
    if quantity <= 0 {
        return Err(ApiError::InvalidInput(
            "Restock quantity must be positive".to_string(),
        ));
    }

    u32::try_from(quantity)
        .map_err(|_| ApiError::InvalidInput("Restock quantity is too large".to_string()))
}

pub fn validate_username(username: &str) -> Result<String, ApiError> {
    let trimmed = username.trim();
    if trimmed.chars().count() < 3 {
        return Err(ApiError::InvalidInput(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Syntactic email check: one '@' with a dotted, non-empty domain
pub fn validate_email(email: &str) -> Result<String, ApiError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !domain.contains('@')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::InvalidInput(
            "Please provide a valid email".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 6 {
        return Err(ApiError::InvalidInput(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    Ok(())
}
