//! # Repository Module
//!
//! Database repository implementations for SweetShop.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  HTTP Handler                                                           │
//! │       │                                                                 │
//! │       │  db.sweets().purchase(7, 2)                                     │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  SweetRepository                                                        │
//! │  ├── list(&self)                                                        │
//! │  ├── search(&self, filter)                                              │
//! │  ├── insert(&self, new)                                                 │
//! │  └── purchase(&self, id, amount)                                        │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • Clean separation of concerns                                         │
//! │  • SQL is isolated in one place                                         │
//! │  • Repositories are cheap clones over the shared pool                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`sweet::SweetRepository`] - Catalog CRUD, search, and the stock engine
//! - [`account::AccountRepository`] - Credential storage and lookup

pub mod account;
pub mod sweet;
