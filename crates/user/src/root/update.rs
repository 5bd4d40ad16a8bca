use validator::Validate;

use crate::{password, repository};

#[derive(Validate, Default)]
pub struct UpdateInput {
    #[validate(length(max = 255))]
    pub name: Option<String>,
    #[validate(length(min = 5, max = 128))]
    pub password: Option<String>,
}

impl super::Command {
    #[tracing::instrument(skip(self, input))]
    pub async fn update(&self, id: i64, input: UpdateInput) -> larder_shared::Result<super::User> {
        input.validate()?;

        let password = match input.password {
            Some(password) => Some(password::hash_password(&password)?),
            None => None,
        };

        repository::update(
            &self.write_db,
            repository::UpdateInput {
                id,
                name: input.name,
                password,
            },
        )
        .await?;

        let Some(user) = self.find_by_id(id).await? else {
            larder_shared::not_found!("user");
        };

        Ok(user)
    }
}
