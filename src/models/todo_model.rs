use crate::schema::*;
use diesel::{Insertable, Queryable};
use serde::{Deserialize, Deserializer, Serialize};

/// A todo as the API sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: Option<String>,
    pub completed: bool,
    pub order: Option<i64>,
    pub url: String,
}

/// Raw `todos` row, `completed` still in its stored integer form
#[derive(Debug, Queryable)]
pub struct TodoRow {
    pub rowid: i64,
    pub title: Option<String>,
    pub completed: Option<i32>,
    pub position: Option<i64>,
}

#[derive(Debug, Insertable)]
#[table_name = "todos"]
pub struct NewTodo<'a> {
    pub title: Option<&'a str>,
    pub completed: Option<i32>,
    pub position: Option<i64>,
}

/// Fields a client may send when creating or patching a todo.
///
/// Anything absent, `null` or of the wrong JSON type is left as `None`
/// and unknown keys (`id`, `url`, ...) are ignored.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct TodoChanges {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;

    Ok(serde_json::from_value(value).ok())
}

impl Todo {
    /// Builds the API representation of a stored row.
    ///
    /// `completed` is stored as 0/1: zero (or NULL) reads as `false`,
    /// anything else as `true`.
    pub fn from_row(row: TodoRow, base_url: &str) -> Self {
        Self {
            id: row.rowid,
            url: todo_url(base_url, row.rowid),
            title: row.title,
            completed: row.completed.map_or(false, |value| value != 0),
            order: row.position,
        }
    }

    /// Overwrites every field `changes` supplies, keeps the rest.
    pub fn merge(self, changes: TodoChanges) -> Self {
        Self {
            title: changes.title.or(self.title),
            completed: changes.completed.unwrap_or(self.completed),
            order: changes.order.or(self.order),
            ..self
        }
    }
}

impl TodoChanges {
    pub fn as_new_todo(&self) -> NewTodo<'_> {
        NewTodo {
            title: self.title.as_deref(),
            completed: Some(i32::from(self.completed.unwrap_or(false))),
            position: self.order,
        }
    }
}

/// Absolute url of a todo, e.g. `http://localhost:5900/v1/todos/3`
pub fn todo_url(base_url: &str, id: i64) -> String {
    format!("{}/v1/todos/{}", base_url.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Todo {
        Todo {
            id: 7,
            title: Some("walk the dog".to_string()),
            completed: false,
            order: Some(3),
            url: todo_url("http://localhost:5900", 7),
        }
    }

    #[test]
    fn test_merge_empty_changes_keeps_everything() {
        let merged = stored().merge(TodoChanges::default());

        assert_eq!(merged, stored());
    }

    #[test]
    fn test_merge_completed_only() {
        let changes: TodoChanges = serde_json::from_str(r#"{"completed": true}"#).unwrap();

        let merged = stored().merge(changes);

        assert!(merged.completed);
        assert_eq!(merged.title.as_deref(), Some("walk the dog"));
        assert_eq!(merged.order, Some(3));
        assert_eq!(merged.id, 7);
    }

    #[test]
    fn test_merge_null_does_not_clear() {
        let changes: TodoChanges =
            serde_json::from_str(r#"{"title": null, "order": 10}"#).unwrap();

        let merged = stored().merge(changes);

        assert_eq!(merged.title.as_deref(), Some("walk the dog"));
        assert_eq!(merged.order, Some(10));
    }

    #[test]
    fn test_changes_ignore_malformed_and_unknown_fields() {
        let changes: TodoChanges = serde_json::from_str(
            r#"{"id": 99, "url": "x", "title": 5, "completed": "yes", "order": 2}"#,
        )
        .unwrap();

        assert_eq!(
            changes,
            TodoChanges {
                title: None,
                completed: None,
                order: Some(2),
            }
        );
    }

    #[test]
    fn test_from_row_normalizes_completed() {
        let row = |completed| TodoRow {
            rowid: 1,
            title: None,
            completed,
            position: None,
        };

        assert!(!Todo::from_row(row(Some(0)), "http://h").completed);
        assert!(!Todo::from_row(row(None), "http://h").completed);
        assert!(Todo::from_row(row(Some(1)), "http://h").completed);
        assert!(Todo::from_row(row(Some(-4)), "http://h").completed);
    }

    #[test]
    fn test_todo_url() {
        assert_eq!(
            todo_url("https://todo.example.com/", 42),
            "https://todo.example.com/v1/todos/42"
        );
    }

    #[test]
    fn test_new_todo_defaults_completed_to_false() {
        let changes = TodoChanges {
            title: Some("a".to_string()),
            completed: None,
            order: Some(1),
        };

        let new_todo = changes.as_new_todo();

        assert_eq!(new_todo.title, Some("a"));
        assert_eq!(new_todo.completed, Some(0));
        assert_eq!(new_todo.position, Some(1));
    }
}
