mod command;

pub use command::*;

/// Pools shared by every command of the workspace.
///
/// SQLite only tolerates one writer, so writes go through `write_db` (a single
/// connection) while queries use the `read_db` pool.
#[derive(Clone)]
pub struct State {
    pub read_db: sqlx::SqlitePool,
    pub write_db: sqlx::SqlitePool,
}

impl State {
    pub fn new(pool: sqlx::SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}
