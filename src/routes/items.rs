use axum::{
    Extension, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use larder_recipe::{Item, ItemKind, item::UpdateInput};
use serde::Deserialize;

use super::{
    AppState,
    extract::{Json, Path, Query},
};
use crate::{auth::AuthUser, error::AppError};

/// Routes for one item kind, mounted under `/tags` or `/ingredients`.
pub fn router(kind: ItemKind) -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", get(retrieve).put(update).patch(update).delete(delete))
        .layer(Extension(kind))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub assigned_only: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: String,
}

fn parse_flag(value: Option<&str>) -> Result<bool, AppError> {
    match value.map(str::trim) {
        None | Some("") | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("true") => Ok(true),
        Some(v) if v.eq_ignore_ascii_case("false") => Ok(false),
        Some(_) => Err(larder_shared::Error::field(
            "assigned_only",
            "invalid",
            "Expected 0 or 1.",
        )
        .into()),
    }
}

#[tracing::instrument(skip_all, fields(user = user.id, kind = %kind))]
pub async fn list(
    user: AuthUser,
    State(app): State<AppState>,
    Extension(kind): Extension<ItemKind>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let assigned_only = parse_flag(query.assigned_only.as_deref())?;
    let items = app.items(kind).list(user.id, assigned_only).await?;

    Ok(Json(items))
}

#[tracing::instrument(skip_all, fields(user = user.id, kind = %kind, id = id))]
pub async fn retrieve(
    user: AuthUser,
    State(app): State<AppState>,
    Extension(kind): Extension<ItemKind>,
    Path(id): Path<i64>,
) -> Result<Json<Item>, AppError> {
    Ok(Json(app.items(kind).find(user.id, id).await?))
}

#[tracing::instrument(skip_all, fields(user = user.id, kind = %kind, id = id))]
pub async fn update(
    user: AuthUser,
    State(app): State<AppState>,
    Extension(kind): Extension<ItemKind>,
    Path(id): Path<i64>,
    Json(body): Json<UpdateItemRequest>,
) -> Result<Json<Item>, AppError> {
    let item = app
        .items(kind)
        .update(user.id, id, UpdateInput { name: body.name })
        .await?;

    Ok(Json(item))
}

#[tracing::instrument(skip_all, fields(user = user.id, kind = %kind, id = id))]
pub async fn delete(
    user: AuthUser,
    State(app): State<AppState>,
    Extension(kind): Extension<ItemKind>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app.items(kind).delete(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
