use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;
use temp_dir::TempDir;

async fn migrated_pool(dir: &TempDir) -> anyhow::Result<SqlitePool> {
    let path = dir.child("db.sqlite3");
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    larder_db::migrator::<sqlx::Sqlite>()?
        .run(&mut conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

#[tokio::test]
async fn test_migration_creates_tables() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = migrated_pool(&dir).await?;

    let tables: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('user', 'recipe', 'tag', 'ingredient', 'recipe_tag', 'recipe_ingredient') ORDER BY name",
    )
    .fetch_all(&pool)
    .await?;

    let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
    assert_eq!(
        names,
        vec!["ingredient", "recipe", "recipe_ingredient", "recipe_tag", "tag", "user"]
    );

    Ok(())
}

#[tokio::test]
async fn test_tag_name_is_unique_per_owner() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = migrated_pool(&dir).await?;

    sqlx::query("INSERT INTO user (email, password, created_at) VALUES ('a@example.com', 'x', 0), ('b@example.com', 'x', 0)")
        .execute(&pool)
        .await?;
    sqlx::query("INSERT INTO tag (owner_id, name) VALUES (1, 'Vegan'), (2, 'Vegan')")
        .execute(&pool)
        .await?;

    let err = sqlx::query("INSERT INTO tag (owner_id, name) VALUES (1, 'Vegan')")
        .execute(&pool)
        .await
        .unwrap_err();

    let is_unique = err
        .as_database_error()
        .map(|e| e.is_unique_violation())
        .unwrap_or(false);
    assert!(is_unique);

    Ok(())
}

#[tokio::test]
async fn test_user_email_is_unique_ignoring_case() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let pool = migrated_pool(&dir).await?;

    sqlx::query("INSERT INTO user (email, password, created_at) VALUES ('Chef@example.com', 'x', 0)")
        .execute(&pool)
        .await?;

    let result = sqlx::query(
        "INSERT INTO user (email, password, created_at) VALUES ('chef@example.com', 'x', 0)",
    )
    .execute(&pool)
    .await;
    assert!(result.is_err());

    Ok(())
}
