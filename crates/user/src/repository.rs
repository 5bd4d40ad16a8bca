use larder_db::table::User;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use sqlx::{SqlitePool, prelude::FromRow};
use time::OffsetDateTime;

#[derive(FromRow)]
pub struct UserRow {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub password: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

pub enum FindType {
    Id(i64),
    Email(String),
}

pub(crate) async fn find(
    pool: &SqlitePool,
    arg_type: FindType,
) -> larder_shared::Result<Option<UserRow>> {
    let mut statement = Query::select()
        .columns([
            User::Id,
            User::Email,
            User::Name,
            User::Password,
            User::IsActive,
            User::IsStaff,
            User::IsSuperuser,
        ])
        .from(User::Table)
        .limit(1)
        .to_owned();

    match arg_type {
        FindType::Id(id) => statement.and_where(Expr::col(User::Id).eq(id)),
        // The unique index is NOCASE, lookups follow it.
        FindType::Email(email) => statement.and_where(
            Expr::cust_with_values(r#""email" = ? COLLATE NOCASE"#, [email]),
        ),
    };

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    Ok(sqlx::query_as_with::<_, UserRow, _>(&sql, values)
        .fetch_optional(pool)
        .await?)
}

pub struct CreateInput {
    pub email: String,
    pub name: String,
    pub password: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}

pub(crate) async fn create(pool: &SqlitePool, input: CreateInput) -> larder_shared::Result<i64> {
    let now = OffsetDateTime::now_utc().unix_timestamp();
    let statement = Query::insert()
        .into_table(User::Table)
        .columns([
            User::Email,
            User::Name,
            User::Password,
            User::IsActive,
            User::IsStaff,
            User::IsSuperuser,
            User::CreatedAt,
        ])
        .values_panic([
            input.email.into(),
            input.name.into(),
            input.password.into(),
            true.into(),
            input.is_staff.into(),
            input.is_superuser.into(),
            now.into(),
        ])
        .returning_col(User::Id)
        .to_owned();

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);

    let result = sqlx::query_as_with::<_, (i64,), _>(&sql, values)
        .fetch_one(pool)
        .await;

    match result {
        Ok((id,)) => Ok(id),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            larder_shared::user!("Email already exists")
        }
        Err(e) => Err(e.into()),
    }
}

pub struct UpdateInput {
    pub id: i64,
    pub name: Option<String>,
    pub password: Option<String>,
}

pub(crate) async fn update(pool: &SqlitePool, input: UpdateInput) -> larder_shared::Result<()> {
    if input.name.is_none() && input.password.is_none() {
        return Ok(());
    }

    let mut statement = Query::update()
        .table(User::Table)
        .and_where(Expr::col(User::Id).eq(input.id))
        .to_owned();

    if let Some(name) = input.name {
        statement.value(User::Name, name);
    }

    if let Some(password) = input.password {
        statement.value(User::Password, password);
    }

    let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
    sqlx::query_with(&sql, values).execute(pool).await?;

    Ok(())
}
