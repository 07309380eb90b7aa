use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    extract::CookieJar,
    headers::{Authorization, authorization::Bearer},
};
use cookshelf_recipe::User;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, error::AppError, routes::AppState};

pub const AUTH_COOKIE_NAME: &str = "auth_token";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    pub sub: String,
}

pub fn generate_token(config: &JwtConfig, sub: impl Into<String>) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now + config.expiration_days * 24 * 60 * 60,
        iat: now,
        iss: config.issuer.to_owned(),
        sub: sub.into(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_token(config: &JwtConfig, token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .ok()
}

/// Token from `Authorization: Bearer`, falling back to the auth cookie.
async fn bearer_token(parts: &mut Parts, state: &AppState) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        <TypedHeader<Authorization<Bearer>> as FromRequestParts<AppState>>::from_request_parts(parts, state).await
    {
        return Some(bearer.token().to_owned());
    }

    let jar = CookieJar::from_request_parts(parts, state).await.ok()?;
    jar.get(AUTH_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Caller authenticated by a valid token of an existing user.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let unauthorized = || {
            AppError::Unauthorized(
                "Authentication credentials were not provided or are invalid".to_owned(),
            )
        };

        let token = bearer_token(parts, state).await.ok_or_else(unauthorized)?;
        let claims = verify_token(&state.config.jwt, &token).ok_or_else(unauthorized)?;

        let Some(user) = state.query.find_user(&claims.sub).await? else {
            return Err(unauthorized());
        };

        Ok(AuthUser(user))
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if bearer_token(parts, state).await.is_none() {
            return Ok(None);
        }

        <AuthUser as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await
            .map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            issuer: "cookshelf".to_owned(),
            audience: "cookshelf".to_owned(),
            expiration_days: 7,
        }
    }

    #[test]
    fn test_token_round_trip() -> anyhow::Result<()> {
        let token = generate_token(&jwt(), "01JAX")?;
        let claims = verify_token(&jwt(), &token).unwrap();

        assert_eq!(claims.sub, "01JAX");

        Ok(())
    }

    #[test]
    fn test_token_rejects_other_audience_or_secret() -> anyhow::Result<()> {
        let token = generate_token(&jwt(), "01JAX")?;

        let other_audience = JwtConfig {
            audience: "someone-else".to_owned(),
            ..jwt()
        };
        assert!(verify_token(&other_audience, &token).is_none());

        let other_secret = JwtConfig {
            secret: "another_secret_key_minimum_32_characters".to_owned(),
            ..jwt()
        };
        assert!(verify_token(&other_secret, &token).is_none());
        assert!(verify_token(&jwt(), "not-a-token").is_none());

        Ok(())
    }
}
