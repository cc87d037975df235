use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;

use super::todo_model::{Todo, TodoChanges, TodoRow};
use crate::api::errors::TodoApiError;
use crate::db::Database;

no_arg_sql_function!(
    last_insert_rowid,
    BigInt,
    "Row id of the most recent insert on this connection"
);

/// CRUD access to the `todos` table.
///
/// Every method is one transaction on the shared connection. Rows come
/// back as [`Todo`] with their `url` filled in from `base_url`.
#[derive(Clone)]
pub struct TodoRepository {
    db: Database,
    base_url: String,
}

impl TodoRepository {
    pub fn new(db: Database, base_url: impl Into<String>) -> Self {
        Self {
            db,
            base_url: base_url.into(),
        }
    }

    /// Insert a todo and return it as stored
    pub fn create(&self, changes: &TodoChanges) -> Result<Todo, TodoApiError> {
        use crate::schema::todos::dsl::*;

        self.db.transaction(|conn| {
            diesel::insert_into(todos)
                .values(&changes.as_new_todo())
                .execute(conn)?;

            let new_id: i64 = diesel::select(last_insert_rowid).get_result(conn)?;

            self.find(conn, new_id)?
                .ok_or(TodoApiError::InternalServerError)
        })
    }

    /// All todos, highest `order` first
    pub fn get_all(&self) -> Result<Vec<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        self.db.transaction(|conn| {
            let rows = todos
                .select((rowid, title, completed, position))
                .order(position.desc())
                .load::<TodoRow>(conn)?;

            Ok(rows.into_iter().map(|row| self.to_todo(row)).collect())
        })
    }

    pub fn get_by_id(&self, todo_id: i64) -> Result<Option<Todo>, TodoApiError> {
        self.db.transaction(|conn| self.find(conn, todo_id))
    }

    /// Merge `changes` into an existing todo.
    ///
    /// Returns `None` without writing anything when `todo_id` has no row.
    pub fn update_by_id(
        &self,
        todo_id: i64,
        changes: TodoChanges,
    ) -> Result<Option<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        self.db.transaction(|conn| {
            let existing = match self.find(conn, todo_id)? {
                Some(todo) => todo,
                None => return Ok(None),
            };

            let merged = existing.merge(changes);

            diesel::update(todos.find(todo_id))
                .set((
                    title.eq(merged.title.as_deref()),
                    completed.eq(Some(i32::from(merged.completed))),
                    position.eq(merged.order),
                ))
                .execute(conn)?;

            self.find(conn, todo_id)
        })
    }

    /// Delete a todo; deleting a missing id is not an error
    pub fn delete_by_id(&self, todo_id: i64) -> Result<(), TodoApiError> {
        use crate::schema::todos::dsl::*;

        self.db.transaction(|conn| {
            let deleted = diesel::delete(todos.find(todo_id)).execute(conn)?;

            if deleted == 0 {
                log::debug!("todo {} was already gone", todo_id);
            }

            Ok(())
        })
    }

    pub fn delete_all(&self) -> Result<(), TodoApiError> {
        use crate::schema::todos::dsl::*;

        self.db.transaction(|conn| {
            diesel::delete(todos).execute(conn)?;
            Ok(())
        })
    }

    fn find(&self, conn: &SqliteConnection, todo_id: i64) -> Result<Option<Todo>, TodoApiError> {
        use crate::schema::todos::dsl::*;

        let row = todos
            .find(todo_id)
            .select((rowid, title, completed, position))
            .first::<TodoRow>(conn)
            .optional()?;

        Ok(row.map(|row| self.to_todo(row)))
    }

    fn to_todo(&self, row: TodoRow) -> Todo {
        Todo::from_row(row, &self.base_url)
    }
}
