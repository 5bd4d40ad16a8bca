impl<R: crate::repository::RecipeRepository> super::Command<R> {
    /// Stores `data` as the recipe image and returns its relative path. Invalid
    /// images fail validation before anything is written.
    #[tracing::instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_image(
        &self,
        owner_id: i64,
        id: i64,
        data: &[u8],
    ) -> larder_shared::Result<String> {
        self.find(owner_id, id).await?;
        let path = self.media.save_recipe_image(data).await?;

        let previous = match self
            .repository
            .replace_image(owner_id, id, Some(path.to_owned()))
            .await
        {
            Ok(Some(previous)) => previous,
            Ok(None) => {
                self.media.remove(&path).await;
                larder_shared::not_found!("recipe");
            }
            Err(e) => {
                self.media.remove(&path).await;
                return Err(e);
            }
        };

        // Read with the update, so a concurrent upload never leaks a file.
        if let Some(previous) = previous {
            self.media.remove(&previous).await;
        }

        tracing::info!(recipe = id, image = %path, "recipe image uploaded");

        Ok(path)
    }
}
