use std::sync::Arc;

use anyhow::Context;
use axum::{Router, serve::Serve};
use tokio::net::TcpListener;

use crate::{config::Config, routes::init_router, state::AppState};

pub struct Application {
    port: u16,
    host: String,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    /// Binds the listener and wires the state. Port `0` picks a free port.
    pub async fn build(config: Config) -> Result<Self, anyhow::Error> {
        let address = config.application.get_address();

        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Unable opening {}", address))?;

        let local_address = listener.local_addr()?;
        let port = local_address.port();
        let host = local_address.ip().to_string();

        let state = AppState::init(config)
            .await
            .context("Failed initializing application state")?;
        let router = init_router(Arc::new(state));

        let server = axum::serve(listener, router);

        Ok(Application { port, host, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}
