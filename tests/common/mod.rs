#![allow(dead_code)]

use std::sync::Arc;

use storefront_api::{
    catalog::Catalog,
    config::AppConfig,
    dto::auth::LoginRequest,
    middleware::auth::{AuthUser, decode_token},
    services::auth_service,
    state::AppState,
    storage::MemoryStore,
};
use uuid::Uuid;

pub fn test_state() -> AppState {
    state_with(AppConfig::for_tests())
}

pub fn state_with(config: AppConfig) -> AppState {
    AppState::new(config, Catalog::demo(), Arc::new(MemoryStore::new()))
}

/// Logs in through the service and returns the bearer header value with the
/// matching extractor output.
pub async fn login(state: &AppState, email: &str) -> anyhow::Result<(String, AuthUser)> {
    let resp = auth_service::login_user(
        state,
        LoginRequest {
            email: email.to_string(),
            password: "secret".to_string(),
        },
    )
    .await?;
    let token = resp.data.expect("login data").token;

    let raw = token.trim_start_matches("Bearer ");
    let claims = decode_token(raw, &state.config.jwt_secret)?;
    let user = AuthUser {
        session_id: Uuid::parse_str(&claims.sid)?,
        email: claims.sub,
        name: claims.name,
    };
    Ok((token, user))
}
