#![allow(dead_code)]

use std::{io::Cursor, path::PathBuf, str::FromStr};

use image::{ImageFormat, RgbImage};
use larder_recipe::{ItemKind, MediaStore};
use larder_shared::State;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<State> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    larder_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(State::new(pool))
}

pub struct Setup {
    pub state: State,
    pub cmd: larder_recipe::Command,
    pub tags: larder_recipe::item::Command,
    pub ingredients: larder_recipe::item::Command,
    pub media: MediaStore,
}

pub async fn setup(dir: &TempDir) -> anyhow::Result<Setup> {
    let state = setup_test_state(dir.child("db.sqlite3")).await?;
    let media = MediaStore::new(dir.child("media"));

    Ok(Setup {
        cmd: larder_recipe::Command::new(state.clone(), media.clone()),
        tags: larder_recipe::item::Command::new(state.clone(), ItemKind::Tag),
        ingredients: larder_recipe::item::Command::new(state.clone(), ItemKind::Ingredient),
        media,
        state,
    })
}

pub async fn create_user(state: &State, email: &str) -> anyhow::Result<i64> {
    let user = larder_user::Command::new(state.clone())
        .create_user(larder_user::CreateUserInput::new(email, "testpass123"))
        .await?;

    Ok(user.id)
}

pub fn image_bytes(format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(10, 10, image::Rgb([200, 120, 40]))
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

pub async fn count(state: &State, table: &str) -> anyhow::Result<i64> {
    let (count,) = sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM \"{table}\""))
        .fetch_one(&state.read_db)
        .await?;

    Ok(count)
}
