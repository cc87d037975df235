use actix_web::{self, http::Method, middleware, web, App, HttpServer};

use crate::config::ServerConfig;
use crate::db::Database;
use crate::models::todo_repository::TodoRepository;

use super::{
    middlewares::{content_negotiation::ContentNegotiation, cors::Cors},
    todos_handler,
};

/// Everything a handler needs, built once in `start_server`
pub struct AppContext {
    pub todos: TodoRepository,
}

impl AppContext {
    pub fn new(todos: TodoRepository) -> Self {
        Self { todos }
    }
}

/// Registers the `/v1/todos` routes
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/v1/todos")
            .service(
                web::resource("")
                    .route(web::method(Method::OPTIONS).to(todos_handler::options_todos))
                    .route(web::get().to(todos_handler::list_todos))
                    .route(web::post().to(todos_handler::create_todo))
                    .route(web::delete().to(todos_handler::delete_all_todos)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::method(Method::OPTIONS).to(todos_handler::options_todo))
                    .route(web::get().to(todos_handler::get_todo))
                    .route(web::patch().to(todos_handler::update_todo))
                    .route(web::delete().to(todos_handler::delete_todo)),
            ),
    );
}

#[actix_web::main]
pub async fn start_server(config: ServerConfig) -> std::io::Result<()> {
    env_logger::init_from_env(
        env_logger::Env::default()
            .default_filter_or("todo_backend=info,actix_web=info,actix_server=info"),
    );

    let db = Database::open(&config.database_url).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to open database {}: {}", config.database_url, e),
        )
    })?;

    let context = web::Data::new(AppContext::new(TodoRepository::new(db, config.base_url())));

    log::info!("Starting server on {}", config.bind);

    HttpServer::new(move || {
        App::new()
            .app_data(context.clone())
            .wrap(Cors)
            .wrap(ContentNegotiation)
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .workers(config.workers)
    .bind(config.bind.as_str())?
    .run()
    .await
}
