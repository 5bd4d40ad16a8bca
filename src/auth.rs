use std::{
    ops::Deref,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    RequestPartsExt,
    extract::FromRequestParts,
    http::{HeaderValue, request::Parts},
};
use axum_extra::{
    TypedHeader,
    headers::{
        Authorization,
        authorization::{Bearer, Credentials},
    },
};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::JwtConfig, error::AppError, routes::AppState};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    aud: String,
    exp: u64,
    iat: u64,
    iss: String,
    sub: String, // user id
}

pub fn generate_token(config: &JwtConfig, user_id: i64) -> anyhow::Result<String> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let lifetime = u64::try_from(config.expiration_days)
        .unwrap_or(0)
        .saturating_mul(24 * 60 * 60);
    let claims = Claims {
        aud: config.audience.to_owned(),
        exp: now.saturating_add(lifetime),
        iat: now,
        iss: config.issuer.to_owned(),
        sub: user_id.to_string(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Returns the user id carried by a valid token.
pub fn verify_token(config: &JwtConfig, token: &str) -> Option<i64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[config.issuer.to_owned()]);
    validation.set_audience(&[config.audience.to_owned()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .ok()?;

    token_data.claims.sub.parse().ok()
}

/// `Authorization: Token <jwt>`, accepted next to `Bearer`.
pub struct TokenScheme(String);

impl Credentials for TokenScheme {
    const SCHEME: &'static str = "Token";

    fn decode(value: &HeaderValue) -> Option<Self> {
        let token = value.to_str().ok()?.get(Self::SCHEME.len() + 1..)?.trim();

        (!token.is_empty()).then(|| Self(token.to_owned()))
    }

    fn encode(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("{} {}", Self::SCHEME, self.0))
            .unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

async fn credentials(parts: &mut Parts) -> Option<String> {
    if let Ok(TypedHeader(Authorization(bearer))) =
        parts.extract::<TypedHeader<Authorization<Bearer>>>().await
    {
        return Some(bearer.token().to_owned());
    }

    if let Ok(TypedHeader(Authorization(token))) =
        parts.extract::<TypedHeader<Authorization<TokenScheme>>>().await
    {
        return Some(token.0);
    }

    None
}

/// Active user resolved from the request token.
pub struct AuthUser(pub larder_user::User);

impl Deref for AuthUser {
    type Target = larder_user::User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credentials(parts).await.ok_or(AppError::Unauthorized)?;
        let user_id = verify_token(&state.config.jwt, &token).ok_or(AppError::Unauthorized)?;

        let Some(user) = state.user_command.find_by_id(user_id).await? else {
            return Err(AppError::Unauthorized);
        };

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(AuthUser(user))
    }
}
