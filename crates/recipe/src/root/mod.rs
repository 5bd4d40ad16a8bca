use validator::{Validate, ValidateUrl, ValidationError};

use crate::{
    MediaStore, Recipe, RecipeFilter,
    repository::{RecipeRepository, SqliteRecipeRepository},
};

mod create;
mod delete;
mod update;
mod upload_image;

pub use create::CreateInput;
pub use update::UpdateInput;

/// `{name}` reference to a tag or ingredient, upserted for the recipe owner.
#[derive(Validate, Clone, Debug)]
pub struct ItemInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl ItemInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Strips surrounding whitespace in place, so blank values fail `length(min = 1)`.
pub(crate) fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_owned();
    }
}

pub(crate) fn trim_items(items: &mut [ItemInput]) {
    for item in items {
        trim(&mut item.name);
    }
}

/// Empty or an absolute URL.
pub(crate) fn validate_link(link: &str) -> Result<(), ValidationError> {
    if link.is_empty() || link.validate_url() {
        return Ok(());
    }

    Err(ValidationError::new("url").with_message("Enter a valid URL.".into()))
}

pub(crate) fn item_names(items: Vec<ItemInput>) -> Vec<String> {
    items.into_iter().map(|i| i.name).collect()
}

#[derive(Clone)]
pub struct Command<R = SqliteRecipeRepository> {
    repository: R,
    media: MediaStore,
}

impl Command {
    pub fn new(state: larder_shared::State, media: MediaStore) -> Self {
        Self::with_repository(SqliteRecipeRepository::new(state), media)
    }
}

impl<R: RecipeRepository> Command<R> {
    pub fn with_repository(repository: R, media: MediaStore) -> Self {
        Self { repository, media }
    }

    pub fn media(&self) -> &MediaStore {
        &self.media
    }

    pub async fn list(
        &self,
        owner_id: i64,
        filter: &RecipeFilter,
    ) -> larder_shared::Result<Vec<Recipe>> {
        self.repository.list(owner_id, filter).await
    }

    pub async fn load(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Recipe>> {
        self.repository.find(owner_id, id).await
    }

    /// Like [`Command::load`], other users' recipes are reported as missing.
    pub async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Recipe> {
        let Some(recipe) = self.load(owner_id, id).await? else {
            larder_shared::not_found!("recipe");
        };

        Ok(recipe)
    }
}
