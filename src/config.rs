use clap::Parser;

/// Server settings, read from flags or the matching environment variables.
#[derive(Debug, Clone, Parser)]
#[clap(author, version, about, long_about = "Todo-Backend compatible todo server")]
pub struct ServerConfig {
    /// Address to listen on
    #[clap(long, env = "BIND_ADDRESS", default_value = "127.0.0.1:5900")]
    pub bind: String,

    /// SQLite database file, or `:memory:` for a transient store
    #[clap(long, env = "DATABASE_URL", default_value = "todos.db")]
    pub database_url: String,

    /// Public root used to build each todo's `url`. Defaults to `http://<bind>`
    #[clap(long, env = "BASE_URL")]
    pub base_url: Option<String>,

    /// Number of HTTP worker threads
    #[clap(long, env = "WORKERS", default_value_t = 1)]
    pub workers: usize,
}

impl ServerConfig {
    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| format!("http://{}", self.bind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_defaults_to_bind_address() {
        // a developer's .env or shell may set it
        std::env::remove_var("BASE_URL");

        let config = ServerConfig::parse_from(["todo-backend", "--bind", "0.0.0.0:8080"]);

        assert_eq!(config.base_url(), "http://0.0.0.0:8080");
    }

    #[test]
    fn test_explicit_base_url() {
        let config = ServerConfig::parse_from([
            "todo-backend",
            "--base-url",
            "https://todos.example.com",
            "--database-url",
            ":memory:",
        ]);

        assert_eq!(config.base_url(), "https://todos.example.com");
        assert_eq!(config.database_url, ":memory:");
    }
}
