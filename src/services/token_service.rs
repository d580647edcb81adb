// src/services/token_service.rs

//! # Token Service
//!
//! Issues and verifies HS256 JWTs. Every login yields an access/refresh pair;
//! the refresh token can only be exchanged for new access tokens and the
//! access token is the only one accepted on protected routes.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{config::AuthConfig, models::TokenPair, services::user_store::UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Encoding(jsonwebtoken::errors::Error),

    #[error("Token is invalid or expired")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    #[error("Token has wrong type, expected {expected:?}")]
    WrongKind { expected: TokenKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub username: String,
    pub token_type: TokenKind,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            access_ttl_secs: config.access_ttl_secs,
            refresh_ttl_secs: config.refresh_ttl_secs,
        }
    }

    pub fn issue_pair(&self, user: &UserRecord) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue(user.id, &user.username, TokenKind::Access)?,
            refresh: self.issue(user.id, &user.username, TokenKind::Refresh)?,
        })
    }

    /// Exchanges a valid refresh token for a fresh access token.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, TokenError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue(claims.sub, &claims.username, TokenKind::Access)
    }

    /// Checks signature, expiry, issuer, and token type.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(TokenError::Invalid)?
            .claims;

        if claims.token_type != expected {
            return Err(TokenError::WrongKind { expected });
        }
        Ok(claims)
    }

    fn issue(&self, user_id: Uuid, username: &str, kind: TokenKind) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        self.encode_claims(Claims {
            sub: user_id,
            username: username.to_string(),
            token_type: kind,
            jti: Uuid::new_v4(),
            iat: Utc::now().timestamp(),
            exp: Utc::now().timestamp() + ttl,
            iss: self.issuer.clone(),
        })
    }

    fn encode_claims(&self, claims: Claims) -> Result<String, TokenError> {
        debug!(user_id = %claims.sub, kind = ?claims.token_type, "Issuing token");
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(TokenError::Encoding)
    }
}
