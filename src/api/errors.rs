use actix_web::{
    body::BoxBody,
    http::{
        self,
        header::{self, HeaderValue},
    },
    HttpResponse, ResponseError,
};
use derive_more::Display;
use diesel::result::Error as DBError;
use serde_json::json;
use std::convert::From;

#[derive(Debug, Display)]
pub enum TodoApiError {
    #[display(fmt = "Internal Server Error")]
    InternalServerError,

    #[display(fmt = "BadRequest: {}", _0)]
    BadRequest(String),

    #[display(fmt = "Database Connection Error")]
    DatabaseConnectionError,

    /// Carries the id exactly as the client wrote it
    #[display(fmt = "todo {} not found", _0)]
    NotFound(String),
}

impl ResponseError for TodoApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            TodoApiError::BadRequest(_) => http::StatusCode::BAD_REQUEST,
            TodoApiError::NotFound(_) => http::StatusCode::NOT_FOUND,
            TodoApiError::InternalServerError | TodoApiError::DatabaseConnectionError => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        let mut res = HttpResponse::new(self.status_code());

        res.headers_mut().append(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        res.set_body(BoxBody::new(json!({"error": self.to_string()}).to_string()))
    }
}

impl From<r2d2::Error> for TodoApiError {
    fn from(error: r2d2::Error) -> Self {
        log::error!("Could not get a database connection: {}", error);
        TodoApiError::DatabaseConnectionError
    }
}

impl From<DBError> for TodoApiError {
    fn from(error: DBError) -> Self {
        log::error!("Database error: {}", error);
        TodoApiError::InternalServerError
    }
}

impl From<serde_json::Error> for TodoApiError {
    fn from(error: serde_json::Error) -> Self {
        TodoApiError::BadRequest(format!("Invalid JSON: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_not_found_body() {
        let res = TodoApiError::NotFound("42".to_string()).error_response();

        assert_eq!(res.status(), http::StatusCode::NOT_FOUND);
        assert_eq!(
            res.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let body = res.into_body().try_into_bytes().unwrap();
        assert_eq!(body.as_ref(), br#"{"error":"todo 42 not found"}"#);
    }

    #[test]
    fn test_storage_errors_are_internal() {
        let error: TodoApiError = DBError::NotFound.into();

        assert_eq!(
            error.status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            TodoApiError::DatabaseConnectionError.status_code(),
            http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
