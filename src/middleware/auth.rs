use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use uuid::Uuid;

use crate::{dto::auth::Claims, error::AppError, models::User, state::AppState};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub session_id: Uuid,
    pub email: String,
    pub name: String,
}

impl AuthUser {
    pub fn user(&self) -> User {
        User {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::BadRequest("Invalid Authorization scheme".into()))?
            .trim();

        let claims = decode_token(token, &state.config.jwt_secret)?;
        let session_id = Uuid::parse_str(&claims.sid).map_err(|_| AppError::Unauthorized)?;

        if !state.is_session_active(session_id).await {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser {
            session_id,
            email: claims.sub,
            name: claims.name,
        })
    }
}
