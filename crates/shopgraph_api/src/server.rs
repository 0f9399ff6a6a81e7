//! HTTP serving for the catalog schema.
//!
//! Routes:
//! - `POST /graphql` executes GraphQL requests.
//! - `GET /graphql` serves the GraphiQL explorer.
//! - `GET /health` answers `ok`.

use crate::schema::{build_schema, CatalogSchema};
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQL;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use shopgraph_core::Store;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;

const GRAPHQL_PATH: &str = "/graphql";

/// Listener settings for `run_server`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Builds the HTTP router around an executable schema.
pub fn router(schema: CatalogSchema) -> Router {
    Router::new()
        .route(
            GRAPHQL_PATH,
            get(graphiql).post_service(GraphQL::new(schema)),
        )
        .route("/health", get(health))
}

/// Serves the catalog until Ctrl-C.
pub async fn run_server(config: ServerConfig, store: Arc<Store>) -> std::io::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("event=server_start module=api status=ok addr={addr} path={GRAPHQL_PATH}");

    axum::serve(listener, router(build_schema(store)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=api status=ok");
    Ok(())
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

async fn health() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=api status=error error={err}");
        std::future::pending::<()>().await;
    }
    info!("event=server_shutdown module=api status=start");
}
