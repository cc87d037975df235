use diesel::prelude::*;
use diesel::r2d2::ConnectionManager;
use diesel::SqliteConnection;
use r2d2::Pool;

use crate::api::errors::TodoApiError;

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const CREATE_TODOS_TABLE: &str =
    r#"CREATE TABLE IF NOT EXISTS todos (title TEXT, completed BOOLEAN, "order" INTEGER)"#;

/// Storage adapter around the one SQLite connection the server uses.
///
/// The pool never holds more than a single connection and never recycles
/// it, so an in-memory database lives as long as the `Database` does.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens (or creates) the database at `database_url` and makes sure the
    /// `todos` table exists. Use `:memory:` for a transient store.
    pub fn open(database_url: &str) -> Result<Self, TodoApiError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);

        let pool = Pool::builder()
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?;

        let database = Database { pool };

        database.transaction(|conn| {
            diesel::sql_query(CREATE_TODOS_TABLE).execute(conn)?;
            Ok(())
        })?;

        log::info!("Using todo storage at {}", database_url);

        Ok(database)
    }

    /// Runs `work` inside a transaction.
    ///
    /// Commits when `work` returns `Ok`, rolls back and hands the error back
    /// when it returns `Err`. The connection goes back to the pool on every
    /// exit path, panics included.
    pub fn transaction<T, F>(&self, work: F) -> Result<T, TodoApiError>
    where
        F: FnOnce(&SqliteConnection) -> Result<T, TodoApiError>,
    {
        let conn = self.pool.get()?;

        conn.transaction(|| work(&conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::todos::dsl::*;

    #[test]
    fn test_open_creates_table() {
        let db = Database::open(":memory:").unwrap();

        let count: i64 = db
            .transaction(|conn| Ok(todos.count().get_result(conn)?))
            .unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open(":memory:").unwrap();

        let result: Result<(), TodoApiError> = db.transaction(|conn| {
            diesel::insert_into(todos)
                .values(title.eq(Some("rolled back")))
                .execute(conn)?;

            Err(TodoApiError::InternalServerError)
        });

        assert!(result.is_err());

        let count: i64 = db
            .transaction(|conn| Ok(todos.count().get_result(conn)?))
            .unwrap();

        assert_eq!(count, 0);
    }

    #[test]
    fn test_transaction_commits_on_success() {
        let db = Database::open(":memory:").unwrap();

        db.transaction(|conn| {
            diesel::insert_into(todos)
                .values(title.eq(Some("kept")))
                .execute(conn)?;
            Ok(())
        })
        .unwrap();

        let count: i64 = db
            .transaction(|conn| Ok(todos.count().get_result(conn)?))
            .unwrap();

        assert_eq!(count, 1);
    }
}
