//! Auth routes: registration and login.
//!
//! Both endpoints are public and both return a [`TokenResponse`], so a
//! fresh registration can call protected endpoints immediately.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use tracing::info;

use sweetshop_core::{validation, Account, CoreError, Role};
use sweetshop_db::DbError;

use crate::auth::{hash_password, verify_password, DUMMY_HASH};
use crate::dto::{LoginRequest, RegisterRequest, TokenResponse};
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// POST /api/auth/register
///
/// Creates an account and returns a token for it. The requested role is
/// honored as-is; an unrecognized role is a validation error, never a
/// silent downgrade.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let email = validation::validate_email(&req.email)?;
    validation::validate_password(&req.password)?;

    let role = match req.role.as_deref() {
        Some(name) => validation::validate_role_name(name)?,
        None => Role::User,
    };

    let account = Account {
        email: email.clone(),
        password_hash: hash_password(&req.password)?,
        role,
        created_at: Utc::now(),
    };

    // A UNIQUE violation here means the email is taken; everything else
    // is a real store failure.
    if let Err(err) = state.db.accounts().insert(&account).await {
        return Err(match err {
            DbError::UniqueViolation { .. } => CoreError::DuplicateAccount(email).into(),
            other => other.into(),
        });
    }

    info!(email = %email, role = %role, "Account registered");

    let token = state.jwt.issue_token(&email, role)?;
    Ok((StatusCode::CREATED, Json(TokenResponse::new(token, role))))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password return the identical 401 body. When
/// the account is missing we still verify against a dummy hash so both
/// paths do comparable work.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let email = req.email.trim();

    match state.db.accounts().get_by_email(email).await? {
        Some(account) if verify_password(&req.password, &account.password_hash) => {
            info!(email = %account.email, "Login succeeded");
            let token = state.jwt.issue_token(&account.email, account.role)?;
            Ok(Json(TokenResponse::new(token, account.role)))
        }
        Some(_) => Err(ApiError::invalid_credentials()),
        None => {
            let _ = verify_password(&req.password, DUMMY_HASH);
            Err(ApiError::invalid_credentials())
        }
    }
}
