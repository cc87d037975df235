use actix_web::{web, HttpResponse};
use serde_json::Value;

use super::api::AppContext;
use super::errors::TodoApiError;
use crate::models::todo_model::TodoChanges;

/// Preflight for the collection
pub async fn options_todos() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Preflight for a single todo
pub async fn options_todo(_: web::Path<String>) -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// List every todo
pub async fn list_todos(ctx: web::Data<AppContext>) -> Result<HttpResponse, actix_web::Error> {
    let list = web::block(move || ctx.todos.get_all()).await??;

    Ok(HttpResponse::Ok().json(&list))
}

/// Create a new todo
pub async fn create_todo(
    body: web::Bytes,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, actix_web::Error> {
    let changes = parse_changes(&body)?;

    let inserted = web::block(move || ctx.todos.create(&changes)).await??;

    Ok(HttpResponse::Created().json(&inserted))
}

/// Remove every todo, answering with the now empty list
pub async fn delete_all_todos(
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, actix_web::Error> {
    web::block(move || ctx.todos.delete_all()).await??;

    Ok(HttpResponse::Ok().json(Vec::<()>::new()))
}

pub async fn get_todo(
    params: web::Path<String>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, actix_web::Error> {
    let raw_id = params.into_inner();
    let todo_id = parse_todo_id(&raw_id)?;

    let todo = web::block(move || ctx.todos.get_by_id(todo_id)).await??;

    match todo {
        Some(todo) => Ok(HttpResponse::Ok().json(&todo)),
        None => Err(TodoApiError::NotFound(raw_id).into()),
    }
}

/// Partially update a todo
pub async fn update_todo(
    params: web::Path<String>,
    body: web::Bytes,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, actix_web::Error> {
    let raw_id = params.into_inner();
    let todo_id = parse_todo_id(&raw_id)?;
    let changes = parse_changes(&body)?;

    let updated = web::block(move || ctx.todos.update_by_id(todo_id, changes)).await??;

    match updated {
        Some(todo) => Ok(HttpResponse::Ok().json(&todo)),
        None => Err(TodoApiError::NotFound(raw_id).into()),
    }
}

/// Delete a todo. Answers 204 whether or not it existed.
pub async fn delete_todo(
    params: web::Path<String>,
    ctx: web::Data<AppContext>,
) -> Result<HttpResponse, actix_web::Error> {
    if let Ok(todo_id) = params.parse::<i64>() {
        web::block(move || ctx.todos.delete_by_id(todo_id)).await??;
    }

    Ok(HttpResponse::NoContent().finish())
}

/// An id that is not a number can't match a row, so it is reported the
/// same way as a missing one.
fn parse_todo_id(raw_id: &str) -> Result<i64, TodoApiError> {
    raw_id
        .parse::<i64>()
        .map_err(|_| TodoApiError::NotFound(raw_id.to_string()))
}

/// Empty bodies count as `{}`; anything else must be a JSON object
fn parse_changes(body: &[u8]) -> Result<TodoChanges, TodoApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(TodoChanges::default());
    }

    match serde_json::from_slice::<Value>(body)? {
        object @ Value::Object(_) => Ok(serde_json::from_value(object)?),
        _ => Err(TodoApiError::BadRequest(
            "Expected a JSON object".to_string(),
        )),
    }
}
