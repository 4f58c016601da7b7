//! Session tokens and the role gate.
//!
//! ```text
//! login ──► JwtManager::issue_token(user) ──► Set-Cookie: auth-token=<jwt>
//!
//! request ──► auth-token cookie | Authorization: Bearer <jwt>
//!                 │
//!                 ▼
//!          verify_token ──► reload user ──► active? ──► AuthUser
//!                 │                            │
//!                 └──── 401 ◄──────────────────┘
//!
//! handler ──► auth.require_role(&[Role::Admin, ...]) ──► 403 on mismatch
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use buttery_core::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth-token";

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    pub email: String,

    /// Role at issue time; handlers use the reloaded user's role
    pub role: Role,

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
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Token and cookie lifetime in seconds.
    pub fn lifetime_secs(&self) -> i64 {
        self.lifetime_secs
    }

    /// Signs a session token for `user`.
    pub fn issue_token(&self, user: &User) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Decodes a token. `None` for bad signatures, expired or malformed tokens.
    pub fn verify_token(&self, token: &str) -> Option<Claims> {
        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                debug!(error = %e, "Rejected session token");
                None
            }
        }
    }
}

// =============================================================================
// Cookies
// =============================================================================

/// `Set-Cookie` value carrying a session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie =
        format!("{AUTH_COOKIE}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}

/// Candidate session tokens in the order they are tried: the `auth-token`
/// cookie, then the `Authorization: Bearer` header.
pub fn extract_tokens(parts: &Parts) -> Vec<String> {
    let from_cookie = parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().strip_prefix(AUTH_COOKIE)?.strip_prefix('='))
        .find(|token| !token.is_empty());

    let from_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());

    from_cookie
        .into_iter()
        .chain(from_header)
        .map(str::to_string)
        .collect()
}

// =============================================================================
// Extractor
// =============================================================================

/// The authenticated, active user behind a request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

impl AuthUser {
    /// Fails with 403 unless the user's role is in `allowed`.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), ApiError> {
        if self.user.has_any_role(allowed) {
            Ok(())
        } else {
            warn!(user_id = %self.user.id, role = %self.user.role, "Permission denied");
            Err(ApiError::Forbidden)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let tokens = extract_tokens(parts);
        if tokens.is_empty() {
            return Err(ApiError::Unauthenticated("No token provided".to_string()));
        }

        // A stale cookie must not shadow a valid Bearer header
        let claims = tokens
            .iter()
            .find_map(|token| state.jwt.verify_token(token))
            .ok_or_else(|| ApiError::Unauthenticated("Invalid token".to_string()))?;

        // Deactivation takes effect on the next request
        let user = state
            .db
            .users()
            .get_by_id(&claims.sub)
            .await?
            .filter(User::is_active)
            .ok_or_else(|| ApiError::Unauthenticated("User not found".to_string()))?;

        Ok(AuthUser { user })
    }
}
