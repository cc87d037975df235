use api::api::start_server;

#[macro_use]
extern crate diesel;

use clap::Parser;
use config::ServerConfig;

mod api;
mod config;
mod db;
mod models;
mod schema;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = ServerConfig::parse();

    start_server(config)?;

    Ok(())
}
