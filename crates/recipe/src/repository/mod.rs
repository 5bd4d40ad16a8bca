mod item;
mod recipe;

pub use item::SqliteItemRepository;
pub use recipe::SqliteRecipeRepository;

use crate::{Item, Price, Recipe, RecipeFilter};

pub struct NewRecipe {
    pub title: String,
    pub time_minutes: i64,
    pub price: Price,
    pub description: String,
    pub link: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
}

/// Column changes, `None` leaves a value untouched. Nested name lists replace
/// the current links when present.
#[derive(Default)]
pub struct RecipeChanges {
    pub title: Option<String>,
    pub time_minutes: Option<i64>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

/// Owner-scoped recipe storage. Every method takes the caller id, rows owned
/// by someone else behave as missing.
#[async_trait::async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn list(&self, owner_id: i64, filter: &RecipeFilter) -> larder_shared::Result<Vec<Recipe>>;

    async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Recipe>>;

    async fn create(&self, owner_id: i64, input: NewRecipe) -> larder_shared::Result<i64>;

    /// Returns `false` when no recipe matched.
    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: RecipeChanges,
    ) -> larder_shared::Result<bool>;

    /// Stores `image` and returns the path it replaced, read in the same
    /// transaction. `None` when no recipe matched.
    async fn replace_image(
        &self,
        owner_id: i64,
        id: i64,
        image: Option<String>,
    ) -> larder_shared::Result<Option<Option<String>>>;

    async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<bool>;
}

/// Owner-scoped tag or ingredient storage.
#[async_trait::async_trait]
pub trait ItemRepository: Send + Sync {
    /// Idempotent upsert on `(owner_id, name)`.
    async fn get_or_create(&self, owner_id: i64, name: &str) -> larder_shared::Result<Item>;

    async fn list(&self, owner_id: i64, assigned_only: bool) -> larder_shared::Result<Vec<Item>>;

    async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Item>>;

    async fn rename(&self, owner_id: i64, id: i64, name: &str) -> larder_shared::Result<bool>;

    async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<bool>;
}
