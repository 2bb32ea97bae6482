use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection, PoolError};

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA: &str = include_str!("../migrations/00000000000000_create_tables/up.sql");

// milliseconds a writer waits on a locked database before failing
const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Per-connection pragmas. SQLite only enforces `REFERENCES` when asked to.
#[derive(Debug)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        apply_pragmas(conn).map_err(r2d2::Error::QueryError)
    }
}

fn apply_pragmas(conn: &SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(&format!(
        "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = {};",
        BUSY_TIMEOUT_MS
    ))
}

pub fn build_pool(database_url: &str, max_size: u32) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionPragmas))
        .build(manager)
}

/// Creates the inventory, recipes and ingredients tables if they are missing.
pub fn init_schema(conn: &SqliteConnection) -> QueryResult<()> {
    conn.batch_execute(SCHEMA)
}

#[cfg(test)]
pub(crate) fn test_connection() -> SqliteConnection {
    let conn = SqliteConnection::establish(":memory:").unwrap();
    apply_pragmas(&conn).unwrap();
    init_schema(&conn).unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ingredients;

    #[test]
    fn schema_init_is_idempotent() {
        let conn = test_connection();
        init_schema(&conn).unwrap();
    }

    #[test]
    fn orphan_ingredients_are_rejected() {
        let conn = test_connection();
        let result = diesel::insert_into(ingredients::table)
            .values((
                ingredients::name.eq("egg"),
                ingredients::quantity.eq(1),
                ingredients::unit.eq("pcs"),
                ingredients::recipe_id.eq(42),
            ))
            .execute(&conn);
        assert!(result.is_err());
    }

    #[test]
    fn pooled_memory_database_is_usable() {
        let pool = build_pool(":memory:", 1).unwrap();
        let conn = pool.get().unwrap();
        init_schema(&conn).unwrap();
    }
}
