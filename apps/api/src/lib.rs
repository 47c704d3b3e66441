//! # SweetShop HTTP API
//!
//! Axum HTTP server for the sweet shop: account registration/login with
//! argon2-hashed credentials and HS256 bearer tokens, role-gated catalog
//! management, and concurrency-safe stock operations.
//!
//! ## Router Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SweetShop Router                                 │
//! │                                                                         │
//! │  Public                                                                 │
//! │  ├── GET  /health                                                       │
//! │  ├── POST /api/auth/register                                            │
//! │  └── POST /api/auth/login                                               │
//! │                                                                         │
//! │  Protected (auth middleware → CurrentAccount extension)                 │
//! │  ├── GET    /api/sweets                 any authenticated               │
//! │  ├── POST   /api/sweets                 admin                           │
//! │  ├── GET    /api/sweets/search          any authenticated               │
//! │  ├── PUT    /api/sweets/{id}            admin                           │
//! │  ├── DELETE /api/sweets/{id}            admin                           │
//! │  ├── POST   /api/sweets/{id}/purchase   any authenticated               │
//! │  └── POST   /api/sweets/{id}/restock    admin                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use sweetshop_db::Database;

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod seed;

use crate::auth::JwtManager;

/// Shared application state, cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
}

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
pub fn build_app(state: AppState) -> Router {
    // Protected routes: require a valid bearer token for an existing account.
    let protected = Router::new()
        .nest("/api/sweets", routes::sweets::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .nest("/api/auth", routes::auth::router())
        .merge(protected)
        .with_state(state)
}
