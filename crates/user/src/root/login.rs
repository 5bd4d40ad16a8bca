use validator::Validate;

use crate::{password, repository};

#[derive(Validate)]
pub struct LoginInput {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl super::Command {
    /// Checks credentials and returns the matching user.
    #[tracing::instrument(skip_all)]
    pub async fn login(&self, input: LoginInput) -> larder_shared::Result<super::User> {
        input.validate()?;

        let Some(row) = repository::find(
            &self.read_db,
            repository::FindType::Email(crate::normalize_email(&input.email)),
        )
        .await?
        else {
            larder_shared::user!("Unable to authenticate with provided credentials");
        };

        if !password::verify_password(&input.password, &row.password)? || !row.is_active {
            larder_shared::user!("Unable to authenticate with provided credentials");
        }

        Ok(row.into())
    }
}
