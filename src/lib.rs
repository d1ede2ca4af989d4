use anyhow::Context;
use config::Config;
use startup::Application;

pub mod auth;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod middlewares;
pub mod model;
pub mod reading;
pub mod routes;
pub mod startup;
pub mod state;
pub mod store;
pub mod telemetry;

pub async fn run() -> Result<(), anyhow::Error> {
    let config = Config::new().context("Failed to read configuration.")?;
    let application = Application::build(config).await?;

    tracing::info!(
        "Starting server: {}:{}",
        application.host(),
        application.port()
    );

    application.run_until_stopped().await?;

    Ok(())
}
