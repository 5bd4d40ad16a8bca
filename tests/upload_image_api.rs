use axum::http::StatusCode;
use image::ImageFormat;
use serde_json::json;

mod helpers;

#[tokio::test]
async fn test_upload_image() -> anyhow::Result<()> {
    let app = helpers::setup().await?;
    let (_, token) = app.user("cook@example.com").await?;

    let recipe = app
        .create_recipe(&token, json!({"title": "Soup", "time_minutes": 5, "price": "1.00"}))
        .await;
    let uri = format!("/recipes/{}/upload-image", recipe["id"]);

    let (status, body) = app
        .send(helpers::multipart(
            &uri,
            &token,
            "image",
            "soup.jpg",
            &helpers::image_bytes(ImageFormat::Jpeg),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["id"], recipe["id"]);

    let url = body["image"].as_str().unwrap().to_string();
    assert!(url.starts_with("/media/uploads/recipe/"));
    assert!(url.ends_with(".jpg"));

    let path = app.dir.child("media").join(url.trim_start_matches("/media/"));
    assert!(path.exists());

    let (_, body) = app.get(&format!("/recipes/{}", recipe["id"]), &token).await;
    assert_eq!(body["image"], url.as_str());

    let (status, _) = app.get(&url, &token).await;
    assert_eq!(status, StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_upload_invalid_image() -> anyhow::Result<()> {
    let app = helpers::setup().await?;
    let (_, token) = app.user("cook@example.com").await?;

    let recipe = app
        .create_recipe(&token, json!({"title": "Soup", "time_minutes": 5, "price": "1.00"}))
        .await;
    let uri = format!("/recipes/{}/upload-image", recipe["id"]);

    let (status, body) = app
        .send(helpers::multipart(&uri, &token, "image", "soup.jpg", b"notimage"))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["image"].is_array());

    let (status, body) = app
        .send(helpers::multipart(
            &uri,
            &token,
            "file",
            "soup.png",
            &helpers::image_bytes(ImageFormat::Png),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["image"][0], "No file was submitted.");

    let (status, _) = app.post(&uri, &token, json!({"image": "x"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = app.get(&format!("/recipes/{}", recipe["id"]), &token).await;
    assert_eq!(body["image"], serde_json::Value::Null);
    assert!(!app.dir.child("media").join("uploads").join("recipe").exists());

    Ok(())
}

#[tokio::test]
async fn test_upload_to_other_users_recipe_is_not_found() -> anyhow::Result<()> {
    let app = helpers::setup().await?;
    let (_, token) = app.user("cook@example.com").await?;
    let (_, other_token) = app.user("other@example.com").await?;

    let recipe = app
        .create_recipe(&token, json!({"title": "Soup", "time_minutes": 5, "price": "1.00"}))
        .await;
    let uri = format!("/recipes/{}/upload-image", recipe["id"]);

    let (status, _) = app
        .send(helpers::multipart(
            &uri,
            &other_token,
            "image",
            "soup.png",
            &helpers::image_bytes(ImageFormat::Png),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&format!("/recipes/{}", recipe["id"]), &token).await;
    assert_eq!(body["image"], serde_json::Value::Null);

    Ok(())
}
