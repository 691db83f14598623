mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::{
    db::db::DBClient,
    service::{
        billing::BillingManager, booking_lifecycle::BookingLifecycleManager,
        time_tracking::TimeTrackingManager,
    },
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub booking_lifecycle: BookingLifecycleManager,
    pub time_tracking: TimeTrackingManager,
    pub billing: BillingManager,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        let booking_lifecycle = BookingLifecycleManager::new(db_client.clone());
        let time_tracking = TimeTrackingManager::new(db_client.clone());
        let billing = BillingManager::new(
            db_client.clone(),
            config.tax_rate,
            config.invoice_due_days,
        );

        Self {
            env: config,
            db_client,
            booking_lifecycle,
            time_tracking,
            billing,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);
    if let Err(err) = db_client.health_check().await {
        tracing::error!("database health check failed: {:?}", err);
        std::process::exit(1);
    }

    let allowed_origins = vec![
        "http://localhost:3000".parse::<HeaderValue>().expect("valid origin"),
        "http://localhost:8000".parse::<HeaderValue>().expect("valid origin"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let port = config.port;
    let app_state = Arc::new(AppState::new(db_client, config));
    let app = create_router(app_state).layer(cors);

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind port {}: {:?}", port, err);
            std::process::exit(1);
        }
    };

    tracing::info!("server listening on port {}", port);

    if let Err(err) = axum::serve(listener, app).await {
        tracing::error!("server error: {:?}", err);
    }
}
