//! # sweetshop-core: Pure Business Logic for SweetShop
//!
//! This crate is the heart of the sweet shop service. It contains domain
//! types, validation rules, and error taxonomy as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       SweetShop Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │    register, login, list, search, purchase, restock, ...       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sweetshop-core (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐      ┌───────────┐      ┌────────────┐        │   │
//! │  │   │   types   │      │   error   │      │ validation │        │   │
//! │  │   │  Account  │      │ CoreError │      │   rules    │        │   │
//! │  │   │   Sweet   │      │Validation │      │   checks   │        │   │
//! │  │   │   Role    │      │   Error   │      │            │        │   │
//! │  │   └───────────┘      └───────────┘      └────────────┘        │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  sweetshop-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, Sweet, Role, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Maximum accepted password length.
///
/// ## Business Reason
/// Argon2 hashes arbitrary input, but unbounded passwords invite
/// memory-abuse requests. 128 characters is far beyond any real passphrase.
pub const MAX_PASSWORD_LEN: usize = 128;

/// Maximum length for a sweet's display name.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum length for a sweet's category.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Maximum length for an account identity (email).
pub const MAX_EMAIL_LEN: usize = 254;
