//! # Validation Module
//!
//! Input validation rules for SweetShop.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                   │
//! │                                                                         │
//! │  Layer 1: HTTP Handler (Rust)                                           │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: Business rule validation                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── UNIQUE constraints (account email)                                 │
//! │  └── CHECK constraints (quantity >= 0, price >= 0)                      │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use sweetshop_core::validation::{validate_email, validate_stock_delta};
//!
//! // Validate identity before registration
//! validate_email("alice@example.com").unwrap();
//!
//! // Validate unit count before a purchase or restock
//! validate_stock_delta(5).unwrap();
//! ```

use std::str::FromStr;

use crate::error::ValidationError;
use crate::types::Role;
use crate::{
    MAX_CATEGORY_LEN, MAX_EMAIL_LEN, MAX_NAME_LEN, MAX_PASSWORD_LEN, MIN_PASSWORD_LEN,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Identity Validators
// =============================================================================

/// Validates an account email.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly the shape `local@domain` with a non-empty local
///   part and a dotted domain
/// - Must not exceed 254 characters
///
/// ## Returns
/// The trimmed email string: the canonical identity stored and matched
/// case-sensitively.
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::validate_email;
///
/// assert!(validate_email("alice@example.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LEN,
        });
    }

    // Minimal structural check: one '@', non-empty local part, dotted domain.
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(email.to_string())
}

/// Validates a plaintext password at registration.
///
/// ## Rules
/// - At least 6 characters
/// - At most 128 characters (unbounded input invites hash-abuse requests)
///
/// The password is never trimmed: leading/trailing spaces are part of the
/// secret the user chose.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if password.len() > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Validates a requested role name and resolves it to a [`Role`].
///
/// ## Rules
/// - Must be exactly "user" or "admin" (case-sensitive)
///
/// An unrecognized role is rejected rather than silently downgraded, so a
/// typo like "Admin" surfaces at registration instead of at the first 403.
pub fn validate_role_name(role: &str) -> ValidationResult<Role> {
    Role::from_str(role).map_err(|_| ValidationError::NotAllowed {
        field: "role".to_string(),
        allowed: vec!["user".to_string(), "admin".to_string()],
    })
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a sweet's display name.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 200 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_sweet_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Validates a sweet's category.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - Must be at most 100 characters
///
/// ## Returns
/// The trimmed category.
pub fn validate_category(category: &str) -> ValidationResult<String> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(category.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit price.
///
/// ## Rules
/// - Must be finite (NaN/infinity deserialize is rejected upstream, but
///   arithmetic can still produce them)
/// - Must be non-negative; zero is allowed (free samples)
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::validate_price;
///
/// assert!(validate_price(8.5).is_ok());
/// assert!(validate_price(0.0).is_ok());
/// assert!(validate_price(-1.0).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if !price.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if price < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an absolute stock quantity (creation or full update).
///
/// ## Rules
/// - Must be zero or greater; zero means out of stock, not invalid
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock mutation amount (purchase or restock unit count).
///
/// ## Rules
/// - Must be strictly positive; a zero-unit purchase is meaningless and a
///   negative one would invert the operation
pub fn validate_stock_delta(amount: i64) -> ValidationResult<()> {
    if amount <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a price bound used in catalog search.
///
/// ## Rules
/// - Must be finite and non-negative (bounds are inclusive)
pub fn validate_price_bound(field: &str, bound: f64) -> ValidationResult<()> {
    if !bound.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }

    if bound < 0.0 {
        return Err(ValidationError::MustBeNonNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        // Valid emails
        assert_eq!(
            validate_email("alice@example.com").unwrap(),
            "alice@example.com"
        );
        assert_eq!(
            validate_email("  bob@shop.example.org  ").unwrap(),
            "bob@shop.example.org"
        );

        // Invalid emails
        assert!(validate_email("").is_err());
        assert!(validate_email("   ").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("alice@nodot").is_err());
        assert!(validate_email("alice@.com").is_err());
        assert!(validate_email(&format!("{}@example.com", "a".repeat(300))).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());

        assert!(validate_password("").is_err());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_role_name() {
        assert_eq!(validate_role_name("user").unwrap(), Role::User);
        assert_eq!(validate_role_name("admin").unwrap(), Role::Admin);

        assert!(validate_role_name("Admin").is_err());
        assert!(validate_role_name("superuser").is_err());
        assert!(validate_role_name("").is_err());
    }

    #[test]
    fn test_validate_sweet_name() {
        assert_eq!(validate_sweet_name("Kaju Katli").unwrap(), "Kaju Katli");
        assert_eq!(validate_sweet_name("  Ladoo  ").unwrap(), "Ladoo");

        assert!(validate_sweet_name("").is_err());
        assert!(validate_sweet_name("   ").is_err());
        assert!(validate_sweet_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert_eq!(validate_category("Traditional").unwrap(), "Traditional");

        assert!(validate_category("").is_err());
        assert!(validate_category(&"A".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(8.5).is_ok());
        assert!(validate_price(0.0).is_ok());

        assert!(validate_price(-0.01).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(0).is_ok());
        assert!(validate_quantity(20).is_ok());

        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock_delta() {
        assert!(validate_stock_delta(1).is_ok());
        assert!(validate_stock_delta(100).is_ok());

        assert!(validate_stock_delta(0).is_err());
        assert!(validate_stock_delta(-5).is_err());
    }

    #[test]
    fn test_validate_price_bound() {
        assert!(validate_price_bound("min_price", 0.0).is_ok());
        assert!(validate_price_bound("max_price", 9.99).is_ok());

        assert!(validate_price_bound("min_price", -1.0).is_err());
        assert!(validate_price_bound("max_price", f64::NAN).is_err());
    }
}
