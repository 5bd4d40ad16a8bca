use validator::Validate;

use crate::{Price, Recipe, repository::RecipeChanges};

use super::ItemInput;

/// Partial recipe update, `None` keeps the stored value. A present `tags` or
/// `ingredients` list replaces the current links, an empty one clears them.
#[derive(Validate, Clone, Debug, Default)]
pub struct UpdateInput {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub time_minutes: Option<i64>,
    pub price: Option<Price>,
    pub description: Option<String>,
    #[validate(length(max = 255), custom(function = "super::validate_link"))]
    pub link: Option<String>,
    #[validate(nested)]
    pub tags: Option<Vec<ItemInput>>,
    #[validate(nested)]
    pub ingredients: Option<Vec<ItemInput>>,
}

impl UpdateInput {
    fn trim(&mut self) {
        for value in [&mut self.title, &mut self.description, &mut self.link]
            .into_iter()
            .flatten()
        {
            super::trim(value);
        }

        for items in [&mut self.tags, &mut self.ingredients].into_iter().flatten() {
            super::trim_items(items);
        }
    }
}

impl<R: crate::repository::RecipeRepository> super::Command<R> {
    #[tracing::instrument(skip(self, input))]
    pub async fn update(
        &self,
        owner_id: i64,
        id: i64,
        mut input: UpdateInput,
    ) -> larder_shared::Result<Recipe> {
        input.trim();
        input.validate()?;

        let updated = self
            .repository
            .update(
                owner_id,
                id,
                RecipeChanges {
                    title: input.title,
                    time_minutes: input.time_minutes,
                    price: input.price,
                    description: input.description,
                    link: input.link,
                    tags: input.tags.map(super::item_names),
                    ingredients: input.ingredients.map(super::item_names),
                },
            )
            .await?;

        if !updated {
            larder_shared::not_found!("recipe");
        }

        tracing::info!(recipe = id, "recipe updated");

        self.find(owner_id, id).await
    }
}
