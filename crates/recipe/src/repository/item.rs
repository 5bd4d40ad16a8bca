use std::collections::HashMap;

use sea_query::{Expr, ExprTrait, JoinType, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqliteConnection, SqlitePool};

use crate::{Item, ItemKind};

#[derive(Clone)]
pub struct SqliteItemRepository {
    state: larder_shared::State,
    kind: ItemKind,
}

impl SqliteItemRepository {
    pub fn new(state: larder_shared::State, kind: ItemKind) -> Self {
        Self { state, kind }
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }
}

#[async_trait::async_trait]
impl super::ItemRepository for SqliteItemRepository {
    async fn get_or_create(&self, owner_id: i64, name: &str) -> larder_shared::Result<Item> {
        let mut conn = self.state.write_db.acquire().await?;

        get_or_create(&mut conn, self.kind, owner_id, name).await
    }

    async fn list(&self, owner_id: i64, assigned_only: bool) -> larder_shared::Result<Vec<Item>> {
        let kind = self.kind;
        let mut statement = Query::select()
            .columns([kind.id(), kind.name()])
            .from(kind.table())
            .and_where(Expr::col(kind.owner_id()).eq(owner_id))
            .order_by(kind.name(), Order::Desc)
            .order_by(kind.id(), Order::Desc)
            .to_owned();

        if assigned_only {
            // IN keeps each item once however many recipes link it.
            statement.and_where(
                Expr::col(kind.id()).in_subquery(
                    Query::select()
                        .column(kind.link_item_id())
                        .from(kind.link_table())
                        .to_owned(),
                ),
            );
        }

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Item, _>(&sql, values)
            .fetch_all(&self.state.read_db)
            .await?)
    }

    async fn find(&self, owner_id: i64, id: i64) -> larder_shared::Result<Option<Item>> {
        let kind = self.kind;
        let statement = Query::select()
            .columns([kind.id(), kind.name()])
            .from(kind.table())
            .and_where(Expr::col(kind.id()).eq(id))
            .and_where(Expr::col(kind.owner_id()).eq(owner_id))
            .limit(1)
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, Item, _>(&sql, values)
            .fetch_optional(&self.state.read_db)
            .await?)
    }

    async fn rename(&self, owner_id: i64, id: i64, name: &str) -> larder_shared::Result<bool> {
        let kind = self.kind;
        let statement = Query::update()
            .table(kind.table())
            .value(kind.name(), name.to_owned())
            .and_where(Expr::col(kind.id()).eq(id))
            .and_where(Expr::col(kind.owner_id()).eq(owner_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

        match sqlx::query_with(&sql, values)
            .execute(&self.state.write_db)
            .await
        {
            Ok(result) => Ok(result.rows_affected() > 0),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                larder_shared::user!("{} with this name already exists", kind)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, owner_id: i64, id: i64) -> larder_shared::Result<bool> {
        let kind = self.kind;
        let statement = Query::delete()
            .from_table(kind.table())
            .and_where(Expr::col(kind.id()).eq(id))
            .and_where(Expr::col(kind.owner_id()).eq(owner_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values)
            .execute(&self.state.write_db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

async fn find_by_name(
    conn: &mut SqliteConnection,
    kind: ItemKind,
    owner_id: i64,
    name: &str,
) -> larder_shared::Result<Option<Item>> {
    let statement = Query::select()
        .columns([kind.id(), kind.name()])
        .from(kind.table())
        .and_where(Expr::col(kind.owner_id()).eq(owner_id))
        .and_where(Expr::col(kind.name()).eq(name))
        .limit(1)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, Item, _>(&sql, values)
        .fetch_optional(conn)
        .await?)
}

/// Fetches `(owner_id, name)` or inserts it. A concurrent insert of the same
/// name surfaces as a unique violation and falls back to the stored row.
pub(crate) async fn get_or_create(
    conn: &mut SqliteConnection,
    kind: ItemKind,
    owner_id: i64,
    name: &str,
) -> larder_shared::Result<Item> {
    if let Some(item) = find_by_name(&mut *conn, kind, owner_id, name).await? {
        return Ok(item);
    }

    let statement = Query::insert()
        .into_table(kind.table())
        .columns([kind.owner_id(), kind.name()])
        .values_panic([owner_id.into(), name.to_owned().into()])
        .returning_col(kind.id())
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(&mut *conn)
        .await;

    match result {
        Ok((id,)) => {
            tracing::debug!(%kind, id, owner_id, "item created");

            Ok(Item {
                id,
                name: name.to_owned(),
            })
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            let Some(item) = find_by_name(conn, kind, owner_id, name).await? else {
                larder_shared::server!("{} '{}' missing after unique violation", kind, name);
            };

            Ok(item)
        }
        Err(e) => Err(e.into()),
    }
}

/// Replaces every link of `recipe_id` for `kind` with the upserted `names`.
pub(crate) async fn replace_links(
    conn: &mut SqliteConnection,
    kind: ItemKind,
    owner_id: i64,
    recipe_id: i64,
    names: &[String],
) -> larder_shared::Result<()> {
    let statement = Query::delete()
        .from_table(kind.link_table())
        .and_where(Expr::col(kind.link_recipe_id()).eq(recipe_id))
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    let mut ids = Vec::with_capacity(names.len());
    for name in names {
        let item = get_or_create(&mut *conn, kind, owner_id, name).await?;
        if !ids.contains(&item.id) {
            ids.push(item.id);
        }
    }

    if ids.is_empty() {
        return Ok(());
    }

    let mut statement = Query::insert()
        .into_table(kind.link_table())
        .columns([kind.link_recipe_id(), kind.link_item_id()])
        .to_owned();

    for id in ids {
        statement.values_panic([recipe_id.into(), id.into()]);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(&mut *conn).await?;

    Ok(())
}

/// Linked items per recipe, sorted by name.
pub(crate) async fn load_links(
    pool: &SqlitePool,
    kind: ItemKind,
    recipe_ids: &[i64],
) -> larder_shared::Result<HashMap<i64, Vec<Item>>> {
    let mut links: HashMap<i64, Vec<Item>> = HashMap::new();
    if recipe_ids.is_empty() {
        return Ok(links);
    }

    let statement = Query::select()
        .column((kind.link_table(), kind.link_recipe_id()))
        .column((kind.table(), kind.id()))
        .column((kind.table(), kind.name()))
        .from(kind.link_table())
        .join(
            JoinType::InnerJoin,
            kind.table(),
            Expr::col((kind.table(), kind.id())).equals((kind.link_table(), kind.link_item_id())),
        )
        .and_where(Expr::col((kind.link_table(), kind.link_recipe_id())).is_in(recipe_ids.to_vec()))
        .order_by((kind.table(), kind.name()), Order::Asc)
        .order_by((kind.table(), kind.id()), Order::Asc)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    let rows = sqlx::query_as_with::<_, (i64, i64, String), _>(&sql, values)
        .fetch_all(pool)
        .await?;

    for (recipe_id, id, name) in rows {
        links.entry(recipe_id).or_default().push(Item { id, name });
    }

    Ok(links)
}
