use std::ops::Deref;

use serde::Serialize;

use crate::repository::{self, FindType, UserRow};

mod create;
mod login;
mod update;

pub use create::CreateUserInput;
pub use login::LoginInput;
pub use update::UpdateInput;

#[derive(Clone)]
pub struct Command {
    state: larder_shared::State,
}

impl Deref for Command {
    type Target = larder_shared::State;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

impl Command {
    pub fn new(state: larder_shared::State) -> Self {
        Self { state }
    }

    pub async fn find_by_id(&self, id: i64) -> larder_shared::Result<Option<User>> {
        let row = repository::find(&self.read_db, FindType::Id(id)).await?;

        Ok(row.map(User::from))
    }

    pub async fn find_by_email(&self, email: &str) -> larder_shared::Result<Option<User>> {
        let row = repository::find(
            &self.read_db,
            FindType::Email(crate::normalize_email(email)),
        )
        .await?;

        Ok(row.map(User::from))
    }
}

/// Account without its password hash.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
        }
    }
}
