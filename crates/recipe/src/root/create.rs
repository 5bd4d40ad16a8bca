use validator::Validate;

use crate::{Price, Recipe, repository::NewRecipe};

use super::ItemInput;

#[derive(Validate, Clone, Debug)]
pub struct CreateInput {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(range(min = 0))]
    pub time_minutes: i64,
    pub price: Price,
    pub description: String,
    #[validate(length(max = 255), custom(function = "super::validate_link"))]
    pub link: String,
    #[validate(nested)]
    pub tags: Vec<ItemInput>,
    #[validate(nested)]
    pub ingredients: Vec<ItemInput>,
}

impl CreateInput {
    pub fn new(title: impl Into<String>, time_minutes: i64, price: Price) -> Self {
        Self {
            title: title.into(),
            time_minutes,
            price,
            description: String::new(),
            link: String::new(),
            tags: vec![],
            ingredients: vec![],
        }
    }

    fn trim(&mut self) {
        super::trim(&mut self.title);
        super::trim(&mut self.description);
        super::trim(&mut self.link);
        super::trim_items(&mut self.tags);
        super::trim_items(&mut self.ingredients);
    }
}

impl<R: crate::repository::RecipeRepository> super::Command<R> {
    #[tracing::instrument(skip(self, input))]
    pub async fn create(
        &self,
        owner_id: i64,
        mut input: CreateInput,
    ) -> larder_shared::Result<Recipe> {
        input.trim();
        input.validate()?;

        let id = self
            .repository
            .create(
                owner_id,
                NewRecipe {
                    title: input.title,
                    time_minutes: input.time_minutes,
                    price: input.price,
                    description: input.description,
                    link: input.link,
                    tags: super::item_names(input.tags),
                    ingredients: super::item_names(input.ingredients),
                },
            )
            .await?;

        tracing::info!(recipe = id, "recipe created");

        let Some(recipe) = self.load(owner_id, id).await? else {
            larder_shared::server!("recipe {id} missing after insert");
        };

        Ok(recipe)
    }
}
