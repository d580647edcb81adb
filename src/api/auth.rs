// File Path: src/api/auth.rs
//! Auth API Handlers
//!
//! Registration, token obtain/refresh, and the bearer-protected profile.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use tracing::info;

use crate::{
    api::state::AppState,
    models::{
        AccessToken, ApiError, ApiResult, ProfileResponse, RefreshRequest, RegisterRequest,
        RegisterResponse, TokenPair, TokenRequest,
    },
    services::{
        token_service::{Claims, TokenKind},
        user_store::NewUser,
    },
};

/// Claims of a verified access token taken from `Authorization: Bearer <token>`.
pub struct AuthenticatedUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::Unauthorized("Authentication credentials were not provided".to_string())
            })?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Unauthorized("Expected a Bearer token".to_string()))?;

        let claims = state.tokens.verify(token, TokenKind::Access)?;
        Ok(AuthenticatedUser(claims))
    }
}

/// Creates an account and logs it in.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(request) = body?;
    let user = state
        .users
        .register(NewUser {
            username: request.username,
            password: request.password,
            email: request.email,
            city: request.city,
        })
        .await?;

    let pair = state.tokens.issue_pair(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            email: user.email,
            city: user.city,
            access: pair.access,
            refresh: pair.refresh,
        }),
    ))
}

/// Exchanges username/password for an access/refresh pair.
pub async fn obtain_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<TokenPair>> {
    let Json(request) = body?;
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Both username and password are required".to_string(),
        ));
    }

    let user = state
        .users
        .authenticate(&request.username, &request.password)
        .await?;

    info!(user_id = %user.id, "Issued token pair");
    Ok(Json(state.tokens.issue_pair(&user)?))
}

/// Exchanges a refresh token for a new access token.
pub async fn refresh_token(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<AccessToken>> {
    let Json(request) = body?;
    if request.refresh.trim().is_empty() {
        return Err(ApiError::BadRequest("Refresh token is required".to_string()));
    }

    let access = state.tokens.refresh(request.refresh.trim())?;
    Ok(Json(AccessToken { access }))
}

/// Returns the caller's profile.
pub async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state
        .users
        .get(claims.sub)
        .await
        .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        message: format!("Welcome, {}!", user.username),
        id: user.id,
        username: user.username,
        email: user.email,
        city: user.city,
        date_joined: user.date_joined,
    }))
}
