use crate::{
    db::users as db_users,
    error::AppError,
    extract::Json,
    middleware::auth::{
        create_access_token, create_refresh_token, generate_reset_token, hash_token, verify_token,
        AuthUser, TokenKind, REFRESH_TOKEN_DAYS,
    },
    models::user::*,
    routes::AppState,
    services::validation,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode};
use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

const RESET_TOKEN_HOURS: i64 = 1;

fn expiry_string(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn is_expired(expires_at: &str) -> Result<bool, AppError> {
    let expires = chrono::NaiveDateTime::parse_from_str(expires_at, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    Ok(expires.and_utc() < Utc::now())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// 액세스/리프레시 토큰 쌍을 만들고 리프레시 토큰 해시를 저장합니다.
async fn issue_tokens(state: &AppState, user: User) -> Result<AuthResponse, AppError> {
    let access_token = create_access_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    let token_id = uuid::Uuid::now_v7().to_string();
    let expires_at = expiry_string(Utc::now() + Duration::days(REFRESH_TOKEN_DAYS));
    db_users::store_refresh_token(
        &state.pool,
        &token_id,
        &user.id,
        &hash_token(&refresh_token),
        &expires_at,
    )
    .await?;

    Ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validation::validate_registration(&req)?;

    let email = req.email.trim().to_lowercase();
    if db_users::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Conflict("Email already exists".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    let display_name = req
        .display_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let user_id = uuid::Uuid::now_v7().to_string();
    let user = db_users::create_user(&state.pool, &user_id, &email, display_name, &password_hash)
        .await
        .map_err(|e| e.unique_as_conflict("Email already exists"))?;
    tracing::info!(user_id = %user.id, "User registered");

    let response = issue_tokens(&state, user).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let user = db_users::find_by_email(&state.pool, &req.email)
        .await?
        .ok_or(AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    verify_token(&req.refresh_token, &state.jwt_secret, TokenKind::Refresh)
        .map_err(|_| AppError::Unauthorized("Invalid refresh token".to_string()))?;

    // 토큰은 만료 여부와 상관없이 여기서 소비됩니다 (회전)
    let token_hash = hash_token(&req.refresh_token);
    let (user_id, expires_at) = db_users::take_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized("Refresh token not found or revoked".to_string()))?;

    if is_expired(&expires_at)? {
        return Err(AppError::Unauthorized("Refresh token expired".to_string()));
    }

    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(issue_tokens(&state, user).await?))
}

pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    db_users::delete_user_refresh_tokens(&state.pool, &auth_user.user_id).await?;

    Ok(Json(json!({ "message": "Logged out successfully" })))
}

pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user.into()))
}

/// 계정 존재 여부가 드러나지 않도록 항상 같은 200 응답을 돌려줍니다.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if let Some(user) = db_users::find_by_email(&state.pool, &req.email).await? {
        let token = generate_reset_token();
        let token_id = uuid::Uuid::now_v7().to_string();
        let expires_at = expiry_string(Utc::now() + Duration::hours(RESET_TOKEN_HOURS));

        db_users::store_reset_token(
            &state.pool,
            &token_id,
            &user.id,
            &hash_token(&token),
            &expires_at,
        )
        .await?;

        tracing::debug!(user_id = %user.id, "Password reset token issued");

        // 전달 실패도 응답에는 드러내지 않습니다
        if let Err(e) = state.notifier.send_reset_token(&user.email, &token).await {
            tracing::warn!(user_id = %user.id, "Reset token delivery failed: {}", e);
        }
    }

    Ok(Json(json!({
        "message": "If that email is registered, a reset link has been sent"
    })))
}

pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    validation::validate_password(&req.password)?;

    let token_hash = hash_token(req.token.trim());
    let (user_id, expires_at) = db_users::take_reset_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    if is_expired(&expires_at)? {
        return Err(AppError::BadRequest("Invalid or expired reset token".to_string()));
    }

    let password_hash = hash_password(&req.password)?;
    db_users::update_password(&state.pool, &user_id, &password_hash).await?;
    // 이전 비밀번호로 열린 세션은 모두 폐기
    db_users::delete_user_refresh_tokens(&state.pool, &user_id).await?;
    tracing::info!(user_id = %user_id, "Password reset");

    Ok(Json(json!({ "message": "Password has been reset" })))
}
