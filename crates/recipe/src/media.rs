use std::path::{Path, PathBuf};

use image::ImageFormat;

pub const RECIPE_UPLOAD_DIR: &str = "uploads/recipe";

/// Files written below a media root, addressed by paths relative to it.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Decodes `data` as an image and stores it as
    /// `uploads/recipe/<uuid>.<ext>`, returning that relative path.
    pub async fn save_recipe_image(&self, data: &[u8]) -> larder_shared::Result<String> {
        let format = decode_image(data)?;
        let ext = format.extensions_str().first().copied().unwrap_or("img");
        let relative = format!("{RECIPE_UPLOAD_DIR}/{}.{ext}", uuid::Uuid::new_v4());
        let path = self.path(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, data).await?;

        Ok(relative)
    }

    /// Missing files are not an error.
    pub async fn remove(&self, relative: &str) {
        match tokio::fs::remove_file(self.path(relative)).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = relative, err = %e, "failed to remove media file"),
        }
    }
}

fn decode_image(data: &[u8]) -> larder_shared::Result<ImageFormat> {
    let invalid = || {
        larder_shared::Error::field(
            "image",
            "invalid_image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        )
    };

    let format = image::guess_format(data).map_err(|_| invalid())?;
    image::load_from_memory_with_format(data, format).map_err(|_| invalid())?;

    Ok(format)
}
