use validator::Validate;

use crate::{
    Item, ItemKind,
    repository::{ItemRepository, SqliteItemRepository},
};

#[derive(Validate, Clone, Debug)]
pub struct UpdateInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

/// Tag or ingredient commands, one instance per [`ItemKind`].
#[derive(Clone)]
pub struct Command<R = SqliteItemRepository> {
    kind: ItemKind,
    repository: R,
}

impl Command {
    pub fn new(state: larder_shared::State, kind: ItemKind) -> Self {
        Self::with_repository(kind, SqliteItemRepository::new(state, kind))
    }
}

impl<R: ItemRepository> Command<R> {
    pub fn with_repository(kind: ItemKind, repository: R) -> Self {
        Self { kind, repository }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    pub async fn list(&self, owner_id: i64, assigned_only: bool) -> larder_shared::Result<Vec<Item>> {
        self.repository.list(owner_id, assigned_only).await
    }

    pub async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Item> {
        let Some(item) = self.repository.find(owner_id, id).await? else {
            larder_shared::not_found!("{}", self.kind);
        };

        Ok(item)
    }

    pub async fn get_or_create(&self, owner_id: i64, name: &str) -> larder_shared::Result<Item> {
        let name = name.trim();
        UpdateInput {
            name: name.to_owned(),
        }
        .validate()?;

        self.repository.get_or_create(owner_id, name).await
    }

    #[tracing::instrument(skip(self, input), fields(kind = %self.kind))]
    pub async fn update(
        &self,
        owner_id: i64,
        id: i64,
        mut input: UpdateInput,
    ) -> larder_shared::Result<Item> {
        crate::root::trim(&mut input.name);
        input.validate()?;

        if !self.repository.rename(owner_id, id, &input.name).await? {
            larder_shared::not_found!("{}", self.kind);
        }

        tracing::info!(id, "item renamed");

        Ok(Item {
            id,
            name: input.name,
        })
    }

    #[tracing::instrument(skip(self), fields(kind = %self.kind))]
    pub async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<()> {
        if !self.repository.delete(owner_id, id).await? {
            larder_shared::not_found!("{}", self.kind);
        }

        tracing::info!(id, "item deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct MemoryItems {
        items: Mutex<Vec<(i64, Item)>>,
    }

    #[async_trait::async_trait]
    impl ItemRepository for MemoryItems {
        async fn get_or_create(&self, owner_id: i64, name: &str) -> larder_shared::Result<Item> {
            let mut items = self.items.lock().unwrap();
            if let Some((_, item)) = items.iter().find(|(o, i)| *o == owner_id && i.name == name) {
                return Ok(item.clone());
            }

            let item = Item {
                id: items.len() as i64 + 1,
                name: name.to_owned(),
            };
            items.push((owner_id, item.clone()));
            Ok(item)
        }

        async fn list(&self, owner_id: i64, _: bool) -> larder_shared::Result<Vec<Item>> {
            let items = self.items.lock().unwrap();
            Ok(items
                .iter()
                .filter(|(o, _)| *o == owner_id)
                .map(|(_, i)| i.clone())
                .collect())
        }

        async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Item>> {
            let items = self.items.lock().unwrap();
            Ok(items
                .iter()
                .find(|(o, i)| *o == owner_id && i.id == id)
                .map(|(_, i)| i.clone()))
        }

        async fn rename(&self, owner_id: i64, id: i64, name: &str) -> larder_shared::Result<bool> {
            let mut items = self.items.lock().unwrap();
            let Some((_, item)) = items.iter_mut().find(|(o, i)| *o == owner_id && i.id == id)
            else {
                return Ok(false);
            };
            item.name = name.to_owned();
            Ok(true)
        }

        async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<bool> {
            let mut items = self.items.lock().unwrap();
            let len = items.len();
            items.retain(|(o, i)| !(*o == owner_id && i.id == id));
            Ok(items.len() != len)
        }
    }

    #[tokio::test]
    async fn test_not_found_names_the_kind() {
        let command = Command::with_repository(ItemKind::Ingredient, MemoryItems::default());

        let err = command.delete(1, 42).await.unwrap_err();
        assert_eq!(err.to_string(), "ingredient not found");
    }

    #[tokio::test]
    async fn test_update_rejects_empty_name() {
        let command = Command::with_repository(ItemKind::Tag, MemoryItems::default());
        let tag = command.get_or_create(1, "Vegan").await.unwrap();

        let err = command
            .update(1, tag.id, UpdateInput { name: "".to_owned() })
            .await
            .unwrap_err();
        assert!(matches!(err, larder_shared::Error::Validate(_)));
        assert_eq!(command.find(1, tag.id).await.unwrap().name, "Vegan");
    }

    #[tokio::test]
    async fn test_other_owner_is_not_found() {
        let command = Command::with_repository(ItemKind::Tag, MemoryItems::default());
        let tag = command.get_or_create(1, "Vegan").await.unwrap();

        let err = command
            .update(2, tag.id, UpdateInput { name: "Keto".to_owned() })
            .await
            .unwrap_err();
        assert!(matches!(err, larder_shared::Error::NotFound(_)));
        assert!(command.delete(2, tag.id).await.is_err());
        assert_eq!(command.list(1, false).await.unwrap().len(), 1);
    }
}
