#![allow(dead_code)]

use std::io::Cursor;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use image::{ImageFormat, RgbImage};
use larder::{
    AppState,
    config::{Config, DatabaseConfig, JwtConfig, LoggingConfig, MediaConfig, ServerConfig},
};
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;

pub const PASSWORD: &str = "testpass123";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dir: TempDir,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("larder.db").to_str().unwrap()),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_string(),
            expiration_days: 7,
            issuer: "larder".to_string(),
            audience: "larder-api".to_string(),
        },
        media: MediaConfig {
            root: dir.child("media").to_str().unwrap().to_string(),
        },
        logging: LoggingConfig::default(),
    }
}

pub async fn setup() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let config = test_config(&dir);

    larder::db::migrate(&config.database.url).await?;
    let pool = larder::create_pool(&config.database.url, 1).await?;

    let state = AppState::new(config, larder_shared::State::new(pool));
    let router = larder::routes::router(state.clone());

    Ok(TestApp { router, state, dir })
}

impl TestApp {
    /// Creates an active user and returns its id and a valid token.
    pub async fn user(&self, email: &str) -> anyhow::Result<(i64, String)> {
        let user = self
            .state
            .user_command
            .create_user(larder_user::CreateUserInput::new(email, PASSWORD))
            .await?;
        let token = larder::auth::generate_token(&self.state.config.jwt, user.id)?;

        Ok((user.id, token))
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        // Non JSON bodies (served media files) read as null
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        (status, body)
    }

    pub async fn get(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, Some(token), None)).await
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, Some(token), Some(body)))
            .await
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PUT, uri, Some(token), Some(body)))
            .await
    }

    pub async fn patch(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::PATCH, uri, Some(token), Some(body)))
            .await
    }

    pub async fn delete(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(request(Method::DELETE, uri, Some(token), None))
            .await
    }

    pub async fn count(&self, table: &str) -> i64 {
        let (count,) = sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM \"{table}\""))
            .fetch_one(&self.state.pool)
            .await
            .unwrap();

        count
    }

    pub async fn create_recipe(&self, token: &str, body: Value) -> Value {
        let (status, body) = self.post("/recipes", token, body).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");

        body
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub const BOUNDARY: &str = "larder-test-boundary";

pub fn multipart(uri: &str, token: &str, field: &str, filename: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn image_bytes(format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::from_pixel(10, 10, image::Rgb([200, 120, 40]))
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}
