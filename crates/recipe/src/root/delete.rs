impl<R: crate::repository::RecipeRepository> super::Command<R> {
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<()> {
        let recipe = self.find(owner_id, id).await?;

        if !self.repository.delete(owner_id, id).await? {
            larder_shared::not_found!("recipe");
        }

        if let Some(image) = recipe.image {
            self.media.remove(&image).await;
        }

        tracing::info!(recipe = id, "recipe deleted");

        Ok(())
    }
}
