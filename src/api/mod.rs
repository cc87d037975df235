pub mod api;
pub(crate) mod errors;
mod middlewares;
mod todos_handler;
