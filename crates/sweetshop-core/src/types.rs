//! # Domain Types
//!
//! Core domain types used throughout SweetShop.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │      Sweet      │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  email (ident)  │   │  id (i64, auto) │   │  User           │       │
//! │  │  password_hash  │   │  name           │   │  Admin          │       │
//! │  │  role           │   │  category       │   └─────────────────┘       │
//! │  └─────────────────┘   │  price          │                             │
//! │                        │  quantity       │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │   SweetUpdate   │       │
//! │                                              │  partial fields │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! - Accounts are keyed by email: a case-sensitive, caller-chosen identity.
//! - Sweets are keyed by a server-assigned, monotonically increasing integer.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Role
// =============================================================================

/// Coarse-grained permission class gating admin-only operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account: may list, search, and purchase.
    User,
    /// Administrator: additionally manages the catalog and restocks.
    Admin,
}

impl Role {
    /// Returns the canonical string form stored in the database and
    /// embedded in tokens.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Whether this role passes an admin gate.
    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a role string outside {user, admin}.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: '{0}'")]
pub struct UnknownRole(pub String);

// =============================================================================
// Account
// =============================================================================

/// A registered account.
///
/// ## Invariants
/// - `email` is unique and case-sensitive.
/// - `password_hash` is an opaque PHC-format string; the plaintext never
///   leaves the registration/login request handlers.
/// - Accounts are never deleted; role is not exposed for mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identity (case-sensitive exact match).
    pub email: String,

    /// Opaque salted hash of the password.
    pub password_hash: String,

    /// Permission class embedded in issued tokens.
    pub role: Role,

    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sweet
// =============================================================================

/// A catalog entry with a mutable stock quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sweet {
    /// Server-assigned, monotonically increasing identifier.
    pub id: i64,

    /// Display name shown to customers.
    pub name: String,

    /// Free-form category (e.g., "Traditional", "Modern").
    pub category: String,

    /// Unit price. Non-negative; never used in arithmetic, only compared
    /// against search bounds.
    pub price: f64,

    /// Units in stock. Invariant: `quantity >= 0` at all observable states,
    /// including under concurrent purchases.
    pub quantity: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp (full update or stock mutation).
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new sweet. The id and timestamps are assigned by
/// the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Partial update for a sweet: only provided fields change, absent fields
/// are untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweetUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl SweetUpdate {
    /// True when no field is provided (the update would be a no-op).
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
    }
}

// =============================================================================
// Search Filter
// =============================================================================

/// Catalog search filter. All provided criteria are ANDed together.
#[derive(Debug, Clone, Default)]
pub struct SweetFilter {
    /// Case-insensitive substring match on name.
    pub name: Option<String>,

    /// Case-insensitive substring match on category.
    pub category: Option<String>,

    /// Inclusive lower price bound.
    pub min_price: Option<f64>,

    /// Inclusive upper price bound.
    pub max_price: Option<f64>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_canonical_string() {
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Admin.as_str(), "admin");
    }

    #[test]
    fn role_parse_is_strict() {
        assert!("Admin".parse::<Role>().is_err());
        assert!("ADMIN".parse::<Role>().is_err());
        assert!("manager".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn role_admin_gate() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn role_serde_is_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let parsed: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Role::User);
    }

    #[test]
    fn sweet_update_emptiness() {
        assert!(SweetUpdate::default().is_empty());

        let update = SweetUpdate {
            price: Some(4.5),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }
}
