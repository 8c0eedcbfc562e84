use crate::backend::BackendClient;
use crate::config::Config;
use crate::error::AppError;
use crate::utils::geocoding::GeocodeProvider;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub backend: Arc<BackendClient>,
    pub geocoder: Arc<dyn GeocodeProvider>,
}

/// Bearer token that may or may not be present. Forwarded to the backend as-is.
#[derive(Clone, Debug, Default)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// A caller that presented a token. Validation of the token is the backend's job.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub token: String,
}

#[derive(Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(auth_header) = parts.headers.get(AUTHORIZATION) {
        if let Ok(auth_value) = auth_header.to_str() {
            if let Some(bearer_token) = auth_value.strip_prefix("Bearer ") {
                let bearer_token = bearer_token.trim();
                if !bearer_token.is_empty() {
                    return Some(bearer_token.to_string());
                }
            }
        }
    }

    // Fall back to query parameter
    parts
        .uri
        .query()
        .and_then(|query| serde_urlencoded::from_str::<TokenQuery>(query).ok())
        .and_then(|params| params.token)
        .filter(|token| !token.trim().is_empty())
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(token_from_parts(parts)))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = token_from_parts(parts)
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        Ok(CurrentUser { token })
    }
}
