pub async fn create_superuser(
    config: larder::config::Config,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let pool = larder::create_pool(&config.database.url, 1).await?;
    larder::db::run_migrations(&pool).await?;

    let command = larder_user::Command::new(larder_shared::State::new(pool.clone()));
    let user = command
        .create_superuser(larder_user::CreateUserInput::new(email, password))
        .await?;

    tracing::info!("{} is now a superuser", user.email);

    pool.close().await;

    Ok(())
}
