use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::StatusCode,
    response::IntoResponse,
};
use larder_recipe::{CreateInput, Item, ItemInput, Price, Recipe, RecipeFilter, UpdateInput};
use serde::{Deserialize, Serialize};

use super::{
    AppState,
    extract::{Json, Path, Query},
};
use crate::{auth::AuthUser, error::AppError};

#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    pub name: String,
}

fn items(payload: Vec<ItemPayload>) -> Vec<ItemInput> {
    payload.into_iter().map(|i| ItemInput::new(i.name)).collect()
}

#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub tags: Vec<ItemPayload>,
    #[serde(default)]
    pub ingredients: Vec<ItemPayload>,
}

/// PUT body, every scalar field is required.
#[derive(Debug, Deserialize)]
pub struct ReplaceRecipeRequest {
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub link: String,
    pub tags: Option<Vec<ItemPayload>>,
    pub ingredients: Option<Vec<ItemPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct PatchRecipeRequest {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<ItemPayload>>,
    pub ingredients: Option<Vec<ItemPayload>>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub tags: Option<String>,
    pub ingredients: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    pub link: String,
    pub tags: Vec<Item>,
    pub ingredients: Vec<Item>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            time_minutes: recipe.time_minutes,
            price: recipe.price,
            link: recipe.link,
            tags: recipe.tags,
            ingredients: recipe.ingredients,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeDetailResponse {
    #[serde(flatten)]
    pub recipe: RecipeResponse,
    pub description: String,
    pub image: Option<String>,
}

impl From<Recipe> for RecipeDetailResponse {
    fn from(mut recipe: Recipe) -> Self {
        let description = std::mem::take(&mut recipe.description);
        let image = recipe.image.take().map(|path| media_url(&path));

        Self {
            recipe: recipe.into(),
            description,
            image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeImageResponse {
    pub id: i64,
    pub image: String,
}

pub(crate) fn media_url(path: &str) -> String {
    format!("/media/{path}")
}

/// Parses `1,2,3`. Blank values disable the filter.
fn parse_ids(field: &'static str, value: Option<&str>) -> Result<Option<Vec<i64>>, AppError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    value
        .split(',')
        .map(|id| id.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
        .map_err(|_| {
            AppError::from(larder_shared::Error::field(
                field,
                "invalid",
                "Expected a comma separated list of ids.",
            ))
        })
}

#[tracing::instrument(skip_all, fields(user = user.id))]
pub async fn list(
    user: AuthUser,
    State(app): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<RecipeResponse>>, AppError> {
    let filter = RecipeFilter {
        tags: parse_ids("tags", query.tags.as_deref())?,
        ingredients: parse_ids("ingredients", query.ingredients.as_deref())?,
    };

    let recipes = app.recipe_command.list(user.id, &filter).await?;

    Ok(Json(recipes.into_iter().map(Into::into).collect()))
}

#[tracing::instrument(skip_all, fields(user = user.id))]
pub async fn create(
    user: AuthUser,
    State(app): State<AppState>,
    Json(body): Json<CreateRecipeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let recipe = app
        .recipe_command
        .create(
            user.id,
            CreateInput {
                title: body.title,
                time_minutes: body.time_minutes,
                price: body.price,
                description: body.description,
                link: body.link,
                tags: items(body.tags),
                ingredients: items(body.ingredients),
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeDetailResponse::from(recipe))))
}

#[tracing::instrument(skip_all, fields(user = user.id, recipe = id))]
pub async fn retrieve(
    user: AuthUser,
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let recipe = app.recipe_command.find(user.id, id).await?;

    Ok(Json(recipe.into()))
}

#[tracing::instrument(skip_all, fields(user = user.id, recipe = id))]
pub async fn replace(
    user: AuthUser,
    State(app): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<ReplaceRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let recipe = app
        .recipe_command
        .update(
            user.id,
            id,
            UpdateInput {
                title: Some(body.title),
                time_minutes: Some(body.time_minutes),
                price: Some(body.price),
                description: Some(body.description),
                link: Some(body.link),
                tags: body.tags.map(items),
                ingredients: body.ingredients.map(items),
            },
        )
        .await?;

    Ok(Json(recipe.into()))
}

#[tracing::instrument(skip_all, fields(user = user.id, recipe = id))]
pub async fn patch(
    user: AuthUser,
    State(app): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<PatchRecipeRequest>,
) -> Result<Json<RecipeDetailResponse>, AppError> {
    let recipe = app
        .recipe_command
        .update(
            user.id,
            id,
            UpdateInput {
                title: body.title,
                time_minutes: body.time_minutes,
                price: body.price,
                description: body.description,
                link: body.link,
                tags: body.tags.map(items),
                ingredients: body.ingredients.map(items),
            },
        )
        .await?;

    Ok(Json(recipe.into()))
}

#[tracing::instrument(skip_all, fields(user = user.id, recipe = id))]
pub async fn delete(
    user: AuthUser,
    State(app): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    app.recipe_command.delete(user.id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(skip_all, fields(user = user.id, recipe = id))]
pub async fn upload_image(
    user: AuthUser,
    State(app): State<AppState>,
    Path(id): Path<i64>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<RecipeImageResponse>, AppError> {
    let mut multipart = multipart?;
    let mut data = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("image") {
            data = Some(field.bytes().await?);
            break;
        }
    }

    let Some(data) = data else {
        return Err(larder_shared::Error::field("image", "required", "No file was submitted.").into());
    };

    let path = app.recipe_command.upload_image(user.id, id, &data).await?;

    Ok(Json(RecipeImageResponse {
        id,
        image: media_url(&path),
    }))
}
