use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appc_session_axum::appc_session::{AppcStrategy, PlatformClient, StrategyConfig};
use appc_session_axum::require_appc_session;

mod handlers;
mod session;
mod verify;

use crate::{
    handlers::{callback, index, protected},
    session::{SessionStore, session_layer},
    verify::{DemoStrategy, DemoVerify},
};

const DEFAULT_PORT: u16 = 3001;
const CALLBACK_PATH: &str = "/auth/appc/callback";

fn app(strategy: Arc<DemoStrategy>, store: SessionStore) -> Router {
    let guarded = Router::new()
        .route("/protected", get(protected))
        .route(CALLBACK_PATH, get(callback))
        .route_layer(middleware::from_fn_with_state(
            strategy,
            require_appc_session::<DemoStrategy>,
        ));

    Router::new()
        .route("/", get(index))
        .merge(guarded)
        .layer(middleware::from_fn_with_state(store, session_layer))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = StrategyConfig::from_env()?;
    if config.callback_url().is_none() {
        config = config.with_callback_url(CALLBACK_PATH);
    }
    let client = PlatformClient::from_env()?;
    tracing::info!("Validating sessions against {}", client.base_url());

    let strategy = Arc::new(AppcStrategy::new(config, client, DemoVerify)?);

    let port = match std::env::var("PORT") {
        Ok(value) => value.parse()?,
        Err(_) => DEFAULT_PORT,
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::debug!("HTTP server listening on {}", addr);

    axum::serve(listener, app(strategy, SessionStore::default())).await?;
    Ok(())
}
