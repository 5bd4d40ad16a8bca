use validator::Validate;

use crate::{password, repository};

#[derive(Validate)]
pub struct CreateUserInput {
    #[validate(
        length(min = 1, message = "email is required"),
        email(message = "enter a valid email address")
    )]
    pub email: String,
    #[validate(length(min = 5, max = 128))]
    pub password: String,
    #[validate(length(max = 255))]
    pub name: String,
}

impl CreateUserInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: String::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl super::Command {
    #[tracing::instrument(skip_all)]
    pub async fn create_user(&self, input: CreateUserInput) -> larder_shared::Result<super::User> {
        self.create(input, false).await
    }

    #[tracing::instrument(skip_all)]
    pub async fn create_superuser(
        &self,
        input: CreateUserInput,
    ) -> larder_shared::Result<super::User> {
        self.create(input, true).await
    }

    async fn create(
        &self,
        mut input: CreateUserInput,
        superuser: bool,
    ) -> larder_shared::Result<super::User> {
        input.email = crate::normalize_email(&input.email);
        input.validate()?;

        if repository::find(
            &self.read_db,
            repository::FindType::Email(input.email.to_owned()),
        )
        .await?
        .is_some()
        {
            larder_shared::user!("Email already exists");
        }

        let password_hash = password::hash_password(&input.password)?;

        let id = repository::create(
            &self.write_db,
            repository::CreateInput {
                email: input.email,
                name: input.name,
                password: password_hash,
                is_staff: superuser,
                is_superuser: superuser,
            },
        )
        .await?;

        tracing::info!(user = id, superuser, "user created");

        let Some(user) = self.find_by_id(id).await? else {
            larder_shared::server!("user {id} missing after insert");
        };

        Ok(user)
    }
}
