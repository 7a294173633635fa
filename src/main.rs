mod config;
mod db;
mod domain;
mod ids;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use crate::store::RoomStore;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");

    let store: Arc<dyn RoomStore> = match &config.backend {
        config::StoreBackend::Memory => {
            tracing::info!("using in-memory room store");
            Arc::new(store::memory::MemoryRoomStore::new())
        }
        config::StoreBackend::Postgres { database_url } => {
            let pool = db::init_pool(database_url, config.db_max_connections)
                .await
                .expect("database init failed");
            tracing::info!("using postgres room store");
            Arc::new(store::postgres::PgRoomStore::new(pool))
        }
    };

    let state = state::AppState::new(store);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, "drawsync listening");
    axum::serve(listener, app).await.expect("server failed");
}
