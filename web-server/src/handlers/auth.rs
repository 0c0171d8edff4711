//! Authentication handlers

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::{extract::State, http::StatusCode, Json};
use sha2::{Digest, Sha256};
use validator::Validate;

use crate::extract::JsonBody;
use crate::middleware::auth::{generate_jwt, ADMIN_SUBJECT};
use crate::models::{
    AdminLoginRequest, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
    UserInfo, UserRole,
};
use crate::{AppError, AppResult, AppState};

/// Compare fixed-length digests without early exit
fn password_matches(given: &str, expected: &str) -> bool {
    let given = Sha256::digest(given.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    given
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    JsonBody(mut req): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    req.email = req.email.trim().to_string();
    req.phone = req.phone.trim().to_string();
    req.validate()?;

    if User::find_by_email(&state.pool, &req.email).await?.is_some() {
        return Err(AppError::AlreadyExists("Email already registered".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .to_string();

    // a concurrent registration can still win between the check and the insert
    let user = User::create(&state.pool, &req.email, &password_hash, &req.phone)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                AppError::AlreadyExists("Email already registered".to_string())
            } else {
                AppError::from(e)
            }
        })?;

    tracing::info!("New user registered: {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            email: user.email,
        }),
    ))
}

/// Login endpoint
pub async fn login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = User::find_by_email(&state.pool, req.email.trim())
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::InternalError("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::InvalidCredentials)?;

    User::update_last_login(&state.pool, user.id).await?;

    let token = generate_jwt(
        &user.id.to_string(),
        &user.email,
        UserRole::User,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(LoginResponse {
        token,
        user: user.to_info(),
    }))
}

/// Admin login against the configured shared password
pub async fn admin_login(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<AdminLoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    if !password_matches(&req.password, &state.config.admin_password) {
        tracing::warn!("Failed admin login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let token = generate_jwt(
        ADMIN_SUBJECT,
        ADMIN_SUBJECT,
        UserRole::Admin,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: None,
            email: ADMIN_SUBJECT.to_string(),
            phone: None,
            role: UserRole::Admin,
        },
    }))
}
