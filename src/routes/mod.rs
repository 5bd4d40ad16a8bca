use axum::{
    Router,
    routing::{get, post},
};
use larder_recipe::ItemKind;
use sqlx::SqlitePool;
use tower_http::services::ServeDir;

mod extract;
mod health;
mod items;
mod recipes;
mod users;

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub user_command: larder_user::Command,
    pub recipe_command: larder_recipe::Command,
    pub tag_command: larder_recipe::item::Command,
    pub ingredient_command: larder_recipe::item::Command,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: crate::config::Config, state: larder_shared::State) -> Self {
        let media = larder_recipe::MediaStore::new(&config.media.root);

        Self {
            user_command: larder_user::Command::new(state.clone()),
            recipe_command: larder_recipe::Command::new(state.clone(), media),
            tag_command: larder_recipe::item::Command::new(state.clone(), ItemKind::Tag),
            ingredient_command: larder_recipe::item::Command::new(
                state.clone(),
                ItemKind::Ingredient,
            ),
            pool: state.read_db,
            config,
        }
    }

    pub fn items(&self, kind: ItemKind) -> &larder_recipe::item::Command {
        match kind {
            ItemKind::Tag => &self.tag_command,
            ItemKind::Ingredient => &self.ingredient_command,
        }
    }
}

pub fn router(app_state: AppState) -> Router {
    let media = ServeDir::new(app_state.recipe_command.media().root());

    Router::new()
        // Health check endpoints (no auth required)
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .with_state(app_state.pool.clone())
        .route("/users", post(users::register))
        .route("/users/token", post(users::token))
        .route("/users/me", get(users::me).patch(users::update_me))
        .route("/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/recipes/{id}",
            get(recipes::retrieve)
                .put(recipes::replace)
                .patch(recipes::patch)
                .delete(recipes::delete),
        )
        .route("/recipes/{id}/upload-image", post(recipes::upload_image))
        .nest("/tags", items::router(ItemKind::Tag))
        .nest("/ingredients", items::router(ItemKind::Ingredient))
        .nest_service("/media", media)
        .with_state(app_state)
}
