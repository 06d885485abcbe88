use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{Claims, LoginRequest, LoginResponse},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::User,
    response::{ApiResponse, Empty, Meta},
    state::AppState,
};

/// Accepts any non-empty email and password and opens a new session.
pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let name = display_name(&email);
    let session_id = Uuid::new_v4();

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(state.config.session_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: email.clone(),
        sid: session_id.to_string(),
        name: name.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    state.open_session(session_id, expiration).await;
    tracing::debug!(session_id = %session_id, "session opened");
    log_audit(Some(&email), "user_login", Some("sessions"), None);

    let resp = LoginResponse {
        token: format!("Bearer {}", token),
        user: User { email, name },
    };
    Ok(ApiResponse::success("Logged in", resp, Some(Meta::empty())))
}

pub async fn logout_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Empty>> {
    state.close_session(user.session_id).await;
    log_audit(Some(&user.email), "user_logout", Some("sessions"), None);
    Ok(ApiResponse::success("Logged out", Empty {}, Some(Meta::empty())))
}

pub fn current_user(user: &AuthUser) -> ApiResponse<User> {
    ApiResponse::success("OK", user.user(), None)
}

fn display_name(email: &str) -> String {
    match email.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => email.to_string(),
    }
}
