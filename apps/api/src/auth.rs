//! Authentication: password hashing, JWT issuing/verification, and the
//! request guard middleware.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Authorization: Bearer <token>                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  extract_bearer ── missing/malformed ──► 401 AUTHENTICATION_ERROR       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  JwtManager::verify_token ── bad sig/expired ──► 401                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  account exists? ── deleted/unknown sub ──► 401                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  insert CurrentAccount extension, run handler                           │
//! │  (admin-only handlers additionally call require_admin → 403)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The role inside a verified token is authoritative for the request; a
//! role change takes effect at the next login.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, Request};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use sweetshop_core::Role;

use crate::error::ApiError;
use crate::AppState;

// =============================================================================
// Password Hashing
// =============================================================================

/// A syntactically valid argon2 hash that matches no password.
///
/// Verified against when login hits an unknown email, so the missing-account
/// path does the same hashing work as the wrong-password path.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    use argon2::{
        password_hash::{rand_core::OsRng, SaltString},
        Argon2, PasswordHasher,
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// A malformed stored hash verifies as false, never as an error.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account email)
    pub sub: String,

    /// Role at issuance ("user" or "admin")
    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: String, lifetime_secs: i64) -> Self {
        JwtManager {
            secret,
            lifetime_secs,
        }
    }

    /// Issue a signed bearer token for an account.
    pub fn issue_token(&self, email: &str, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: email.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate and decode a token.
    ///
    /// Rejects bad signatures, expired tokens, and tokens signed with a
    /// different secret.
    pub fn verify_token(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| ApiError::unauthenticated(format!("Invalid token: {}", e)))?;

        Ok(token_data.claims)
    }
}

/// Extract a bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthenticated("Missing authorization header"))?;

    let header = header
        .to_str()
        .map_err(|_| ApiError::unauthenticated("Malformed authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::unauthenticated("Expected bearer token"))?
        .trim();

    if token.is_empty() {
        return Err(ApiError::unauthenticated("Empty bearer token"));
    }

    Ok(token)
}

// =============================================================================
// Request Guard
// =============================================================================

/// The authenticated caller, inserted as a request extension by
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentAccount {
    pub email: String,
    pub role: Role,
}

impl CurrentAccount {
    /// Gate for admin-only handlers.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::forbidden())
        }
    }
}

/// Axum middleware guarding all protected routes.
///
/// Validates the bearer token and confirms the subject still has an
/// account. Failures here are always 401; role checks happen later in the
/// handler so 401 always precedes 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(req.headers())?;

    let claims = state.jwt.verify_token(token)?;

    let role = Role::from_str(&claims.role)
        .map_err(|_| ApiError::unauthenticated("Invalid token: unknown role"))?;

    let account = state.db.accounts().get_by_email(&claims.sub).await?;
    if account.is_none() {
        return Err(ApiError::unauthenticated("Account no longer exists"));
    }

    req.extensions_mut().insert(CurrentAccount {
        email: claims.sub,
        role,
    });

    Ok(next.run(req).await)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let token = manager.issue_token("alice@example.com", Role::Admin).unwrap();
        let claims = manager.verify_token(&token).unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.role, "admin");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tokens_have_unique_ids() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);

        let a = manager.issue_token("a@example.com", Role::User).unwrap();
        let b = manager.issue_token("a@example.com", Role::User).unwrap();

        let jti_a = manager.verify_token(&a).unwrap().jti;
        let jti_b = manager.verify_token(&b).unwrap().jti;
        assert_ne!(jti_a, jti_b);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = JwtManager::new("secret-one".to_string(), 3600);
        let verifier = JwtManager::new("secret-two".to_string(), 3600);

        let token = issuer.issue_token("alice@example.com", Role::User).unwrap();
        let err = verifier.verify_token(&token).unwrap_err();

        assert_eq!(err.code, ErrorCode::AuthenticationError);
    }

    #[test]
    fn test_expired_token_rejected() {
        // Negative lifetime backdates exp past the default 60s leeway.
        let manager = JwtManager::new("test-secret".to_string(), -120);

        let token = manager.issue_token("alice@example.com", Role::User).unwrap();
        let err = manager.verify_token(&token).unwrap_err();

        assert_eq!(err.code, ErrorCode::AuthenticationError);
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = JwtManager::new("test-secret".to_string(), 3600);
        assert!(manager.verify_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("hunter2secret").unwrap();

        assert!(verify_password("hunter2secret", &hash));
        assert!(!verify_password("wrong-password", &hash));
    }

    #[test]
    fn test_same_password_different_hashes() {
        // Random salt per hash
        let a = hash_password("hunter2secret").unwrap();
        let b = hash_password("hunter2secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_dummy_hash_parses_but_never_matches() {
        use argon2::PasswordHash;
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());
        assert!(!verify_password("admin123", DUMMY_HASH));
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer(&headers).unwrap(), "abc.def.ghi");

        headers.insert(header::AUTHORIZATION, "Basic dXNlcg==".parse().unwrap());
        assert!(extract_bearer(&headers).is_err());

        headers.insert(header::AUTHORIZATION, "Bearer ".parse().unwrap());
        assert!(extract_bearer(&headers).is_err());
    }
}
