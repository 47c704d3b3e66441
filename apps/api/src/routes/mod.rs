//! HTTP routes, one file per domain area.
//!
//! - [`auth`] - registration and login (public)
//! - [`sweets`] - catalog CRUD, search, and stock operations (protected)
//! - [`system`] - health probe (public)

pub mod auth;
pub mod sweets;
pub mod system;
