use larder_db::table::{Recipe as RecipeTable, RecipeIngredient, RecipeTag};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::prelude::FromRow;
use time::OffsetDateTime;

use super::{NewRecipe, RecipeChanges, item};
use crate::{ItemKind, Price, Recipe, RecipeFilter};

#[derive(FromRow)]
struct RecipeRow {
    id: i64,
    owner_id: i64,
    title: String,
    time_minutes: i64,
    price_cents: i64,
    description: String,
    link: String,
    image: Option<String>,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            time_minutes: row.time_minutes,
            price: Price::from_cents(row.price_cents),
            description: row.description,
            link: row.link,
            image: row.image,
            tags: vec![],
            ingredients: vec![],
        }
    }
}

#[derive(Clone)]
pub struct SqliteRecipeRepository {
    state: larder_shared::State,
}

impl SqliteRecipeRepository {
    pub fn new(state: larder_shared::State) -> Self {
        Self { state }
    }

    fn select() -> sea_query::SelectStatement {
        Query::select()
            .columns([
                RecipeTable::Id,
                RecipeTable::OwnerId,
                RecipeTable::Title,
                RecipeTable::TimeMinutes,
                RecipeTable::PriceCents,
                RecipeTable::Description,
                RecipeTable::Link,
                RecipeTable::Image,
            ])
            .from(RecipeTable::Table)
            .to_owned()
    }

    async fn with_links(&self, rows: Vec<RecipeRow>) -> larder_shared::Result<Vec<Recipe>> {
        let ids = rows.iter().map(|r| r.id).collect::<Vec<_>>();
        let mut tags = item::load_links(&self.state.read_db, ItemKind::Tag, &ids).await?;
        let mut ingredients =
            item::load_links(&self.state.read_db, ItemKind::Ingredient, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let mut recipe = Recipe::from(row);
                recipe.tags = tags.remove(&recipe.id).unwrap_or_default();
                recipe.ingredients = ingredients.remove(&recipe.id).unwrap_or_default();
                recipe
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl super::RecipeRepository for SqliteRecipeRepository {
    async fn list(
        &self,
        owner_id: i64,
        filter: &RecipeFilter,
    ) -> larder_shared::Result<Vec<Recipe>> {
        let mut statement = Self::select()
            .and_where(Expr::col(RecipeTable::OwnerId).eq(owner_id))
            .order_by(RecipeTable::Id, Order::Desc)
            .to_owned();

        // Subqueries instead of joins so a recipe matching several ids is
        // returned once.
        if let Some(tags) = &filter.tags {
            statement.and_where(
                Expr::col(RecipeTable::Id).in_subquery(
                    Query::select()
                        .column(RecipeTag::RecipeId)
                        .from(RecipeTag::Table)
                        .and_where(Expr::col(RecipeTag::TagId).is_in(tags.to_vec()))
                        .to_owned(),
                ),
            );
        }

        if let Some(ingredients) = &filter.ingredients {
            statement.and_where(
                Expr::col(RecipeTable::Id).in_subquery(
                    Query::select()
                        .column(RecipeIngredient::RecipeId)
                        .from(RecipeIngredient::Table)
                        .and_where(
                            Expr::col(RecipeIngredient::IngredientId).is_in(ingredients.to_vec()),
                        )
                        .to_owned(),
                ),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let rows = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_all(&self.state.read_db)
            .await?;

        self.with_links(rows).await
    }

    async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Recipe>> {
        let statement = Self::select()
            .and_where(Expr::col(RecipeTable::Id).eq(id))
            .and_where(Expr::col(RecipeTable::OwnerId).eq(owner_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let Some(row) = sqlx::query_as_with::<_, RecipeRow, _>(&sql, values)
            .fetch_optional(&self.state.read_db)
            .await?
        else {
            return Ok(None);
        };

        Ok(self.with_links(vec![row]).await?.pop())
    }

    async fn create(&self, owner_id: i64, input: NewRecipe) -> larder_shared::Result<i64> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let statement = Query::insert()
            .into_table(RecipeTable::Table)
            .columns([
                RecipeTable::OwnerId,
                RecipeTable::Title,
                RecipeTable::TimeMinutes,
                RecipeTable::PriceCents,
                RecipeTable::Description,
                RecipeTable::Link,
                RecipeTable::CreatedAt,
            ])
            .values_panic([
                owner_id.into(),
                input.title.into(),
                input.time_minutes.into(),
                input.price.cents().into(),
                input.description.into(),
                input.link.into(),
                now.into(),
            ])
            .returning_col(RecipeTable::Id)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let mut tx = self.state.write_db.begin().await?;
        let (id,) = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
            .fetch_one(&mut *tx)
            .await?;

        item::replace_links(&mut tx, ItemKind::Tag, owner_id, id, &input.tags).await?;
        item::replace_links(&mut tx, ItemKind::Ingredient, owner_id, id, &input.ingredients)
            .await?;
        tx.commit().await?;

        Ok(id)
    }

    async fn update(
        &self,
        owner_id: i64,
        id: i64,
        changes: RecipeChanges,
    ) -> larder_shared::Result<bool> {
        let mut statement = Query::update()
            .table(RecipeTable::Table)
            .value(
                RecipeTable::UpdatedAt,
                OffsetDateTime::now_utc().unix_timestamp(),
            )
            .and_where(Expr::col(RecipeTable::Id).eq(id))
            .and_where(Expr::col(RecipeTable::OwnerId).eq(owner_id))
            .to_owned();

        if let Some(title) = changes.title {
            statement.value(RecipeTable::Title, title);
        }

        if let Some(time_minutes) = changes.time_minutes {
            statement.value(RecipeTable::TimeMinutes, time_minutes);
        }

        if let Some(price) = changes.price {
            statement.value(RecipeTable::PriceCents, price.cents());
        }

        if let Some(description) = changes.description {
            statement.value(RecipeTable::Description, description);
        }

        if let Some(link) = changes.link {
            statement.value(RecipeTable::Link, link);
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        let mut tx = self.state.write_db.begin().await?;
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        if let Some(tags) = changes.tags {
            item::replace_links(&mut tx, ItemKind::Tag, owner_id, id, &tags).await?;
        }

        if let Some(ingredients) = changes.ingredients {
            item::replace_links(&mut tx, ItemKind::Ingredient, owner_id, id, &ingredients)
                .await?;
        }

        tx.commit().await?;

        Ok(true)
    }

    async fn replace_image(
        &self,
        owner_id: i64,
        id: i64,
        image: Option<String>,
    ) -> larder_shared::Result<Option<Option<String>>> {
        let scope = Expr::col(RecipeTable::Id)
            .eq(id)
            .and(Expr::col(RecipeTable::OwnerId).eq(owner_id));

        // Writing first takes the write lock before the current image is read.
        let touch = Query::update()
            .table(RecipeTable::Table)
            .value(
                RecipeTable::UpdatedAt,
                OffsetDateTime::now_utc().unix_timestamp(),
            )
            .and_where(scope.clone())
            .to_owned();

        let select = Query::select()
            .column(RecipeTable::Image)
            .from(RecipeTable::Table)
            .and_where(scope.clone())
            .to_owned();

        let update = Query::update()
            .table(RecipeTable::Table)
            .value(RecipeTable::Image, image)
            .and_where(scope)
            .to_owned();

        let mut tx = self.state.write_db.begin().await?;

        let (sql, values) = touch.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        let (sql, values) = select.build_sqlx(SqliteQueryBuilder);
        let (previous,) = sqlx::query_as_with::<_, (Option<String>,), _>(&sql, values)
            .fetch_one(&mut *tx)
            .await?;

        let (sql, values) = update.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(Some(previous))
    }

    async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<bool> {
        let statement = Query::delete()
            .from_table(RecipeTable::Table)
            .and_where(Expr::col(RecipeTable::Id).eq(id))
            .and_where(Expr::col(RecipeTable::OwnerId).eq(owner_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.state.write_db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
