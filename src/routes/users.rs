use axum::{extract::State, http::StatusCode, response::IntoResponse};
use larder_user::{CreateUserInput, LoginInput, User};
use serde::{Deserialize, Serialize};

use super::{AppState, extract::Json};
use crate::{auth::AuthUser, error::AppError};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMeRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[tracing::instrument(skip_all)]
pub async fn register(
    State(app): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = app
        .user_command
        .create_user(CreateUserInput::new(body.email, body.password).name(body.name))
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[tracing::instrument(skip_all)]
pub async fn token(
    State(app): State<AppState>,
    Json(body): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = app
        .user_command
        .login(LoginInput {
            email: body.email,
            password: body.password,
        })
        .await?;

    let token = crate::auth::generate_token(&app.config.jwt, user.id)?;
    tracing::info!(user = user.id, "token issued");

    Ok(Json(TokenResponse { token }))
}

#[tracing::instrument(skip_all, fields(user = user.id))]
pub async fn me(user: AuthUser) -> Json<UserResponse> {
    Json(user.0.into())
}

#[tracing::instrument(skip_all, fields(user = user.id))]
pub async fn update_me(
    user: AuthUser,
    State(app): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = app
        .user_command
        .update(
            user.id,
            larder_user::UpdateInput {
                name: body.name,
                password: body.password,
            },
        )
        .await?;

    Ok(Json(user.into()))
}
