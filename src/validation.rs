use rust_decimal::Decimal;
use validator::{ValidateEmail, ValidationError};

use crate::models::user::CreateUserRequest;

/// Largest absolute amount a NUMERIC(10, 2) column holds is 99_999_999.99
const MAX_INTEGER_DIGITS: u32 = 8;
const MAX_DECIMAL_PLACES: u32 = 2;

fn validation_error(code: &'static str, message: impl Into<String>) -> ValidationError {
    let message: String = message.into();
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validates that a transaction amount is positive and fits a fixed-point
/// column with two decimal places
pub fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(validation_error(
            "invalid_amount",
            "Amount must be greater than 0",
        ));
    }

    if amount.normalize().scale() > MAX_DECIMAL_PLACES {
        return Err(validation_error(
            "max_decimal_places",
            format!("Ensure that there are no more than {MAX_DECIMAL_PLACES} decimal places."),
        ));
    }

    if amount.trunc() >= Decimal::from(10_i64.pow(MAX_INTEGER_DIGITS)) {
        return Err(validation_error(
            "max_whole_digits",
            format!(
                "Ensure that there are no more than {MAX_INTEGER_DIGITS} digits before the decimal point."
            ),
        ));
    }

    Ok(())
}

/// Validates that a username only contains letters, digits and `@.+-_`
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_alphanumeric() || "@.+-_".contains(c);
    if username.chars().all(allowed) {
        Ok(())
    } else {
        Err(validation_error(
            "invalid_username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ))
    }
}

/// Accepts a blank email; anything else must be a valid address
pub fn validate_email_or_blank(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err(validation_error("invalid_email", "Enter a valid email address."))
    }
}

/// Rejects passwords made only of digits
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
        return Err(validation_error(
            "password_entirely_numeric",
            "This password is entirely numeric.",
        ));
    }
    Ok(())
}

/// Rejects passwords equal to the username, ignoring case
pub fn validate_password_differs_from_username(
    request: &CreateUserRequest,
) -> Result<(), ValidationError> {
    if request.password.to_lowercase() == request.username.to_lowercase() {
        return Err(validation_error(
            "password_too_similar",
            "The password is too similar to the username.",
        ));
    }
    Ok(())
}
