pub mod todo_model;
pub mod todo_repository;
