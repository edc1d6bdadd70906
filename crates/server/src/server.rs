use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;

use crate::{health, pharmacies, purchase, reports, search};
use engine::Engine;

/// Default deadline for one purchase transaction, lock waits included.
pub const DEFAULT_PURCHASE_DEADLINE: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub purchase_deadline: Duration,
}

impl ServerState {
    pub fn new(engine: Engine, db: DatabaseConnection, purchase_deadline: Duration) -> Self {
        Self {
            engine: Arc::new(engine),
            db,
            purchase_deadline,
        }
    }
}

/// Builds the application router. Exposed so tests can drive the API without
/// binding a socket.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/v1/pharmacies/open", post(pharmacies::open))
        .route("/api/v1/pharmacies/masks", post(pharmacies::masks))
        .route("/api/v1/pharmacies/filter", post(pharmacies::filter))
        .route("/api/v1/pharmacies/users/top", post(reports::top_users))
        .route(
            "/api/v1/pharmacies/transactions/summary",
            post(reports::summary),
        )
        .route("/api/v1/pharmacies/search", post(search::search))
        .route("/api/v1/pharmacies/purchase", post(purchase::process))
        .route("/api/v1/pharmacies/health", get(health::health))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, DEFAULT_PURCHASE_DEADLINE, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    purchase_deadline: Duration,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState::new(engine, db, purchase_deadline);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    purchase_deadline: Duration,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, purchase_deadline, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
