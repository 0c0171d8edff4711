//! Authentication middleware

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::UserRole;
use crate::{AppError, AppResult, AppState};

/// Identity subject used for the admin session
pub const ADMIN_SUBJECT: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,      // User ID, or "admin"
    pub email: String,    // Identity string
    pub role: UserRole,
    pub exp: usize,       // Expiration timestamp
    pub iat: usize,       // Issued at
}

/// Caller identity extracted from the JWT
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: Option<Uuid>,
    pub email: String,
    pub role: UserRole,
}

impl UserContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Registered-user id; admins have none
    pub fn require_user_id(&self) -> Result<Uuid, AppError> {
        self.user_id.ok_or(AppError::Forbidden)
    }
}

/// RBAC: Require admin role
pub fn require_admin(user: &UserContext) -> Result<(), AppError> {
    if !user.is_admin() {
        tracing::warn!("Admin required but {} has role '{}'", user.email, user.role.as_str());
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Issue a signed JWT
pub fn generate_jwt(
    sub: &str,
    email: &str,
    role: UserRole,
    secret: &str,
    expiration_hours: u64,
) -> AppResult<String> {
    let now = Utc::now();
    let exp = now + Duration::hours(expiration_hours as i64);

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        role,
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Middleware: Require JWT authentication (users and admin)
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&req)?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::TokenInvalid)?;

    let claims = token_data.claims;

    let user_id = match claims.role {
        UserRole::Admin => None,
        UserRole::User => Some(Uuid::parse_str(&claims.sub).map_err(|_| AppError::TokenInvalid)?),
    };

    req.extensions_mut().insert(UserContext {
        user_id,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Extract bearer token from Authorization header
fn extract_bearer_token(req: &Request) -> Result<String, AppError> {
    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AppError::Unauthorized)?
        .to_str()
        .map_err(|_| AppError::Unauthorized)?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(AppError::Unauthorized)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for UserContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
