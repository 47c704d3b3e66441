//! Request and response DTOs for the HTTP API.
//!
//! DTOs are the wire contract; domain types never serialize directly onto
//! the wire. `SweetDto` deliberately omits the internal timestamps.

use serde::{Deserialize, Serialize};

use sweetshop_core::{Role, Sweet};

// =============================================================================
// Auth
// =============================================================================

/// Body for POST /api/auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Defaults to "user" when omitted.
    pub role: Option<String>,
}

/// Body for POST /api/auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token response for register and login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Echoed so clients can branch on role without decoding the token.
    pub role: String,
}

impl TokenResponse {
    pub fn new(access_token: String, role: Role) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            role: role.as_str().to_string(),
        }
    }
}

// =============================================================================
// Sweets
// =============================================================================

/// A catalog entry as seen by clients.
#[derive(Debug, Serialize)]
pub struct SweetDto {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

impl From<Sweet> for SweetDto {
    fn from(sweet: Sweet) -> Self {
        SweetDto {
            id: sweet.id,
            name: sweet.name,
            category: sweet.category,
            price: sweet.price,
            quantity: sweet.quantity,
        }
    }
}

/// Body for POST /api/sweets.
#[derive(Debug, Deserialize)]
pub struct CreateSweetRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
}

/// Body for PUT /api/sweets/{id}. Absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Query parameters for GET /api/sweets/search.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

/// Body for purchase and restock.
#[derive(Debug, Deserialize)]
pub struct StockRequest {
    pub quantity: i64,
}

/// Generic message body (e.g., delete confirmation).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        MessageResponse {
            message: message.into(),
        }
    }
}
