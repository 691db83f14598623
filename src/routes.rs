use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{
    handler::{
        billing::{invoices_handler, payouts_handler},
        bookings::{bookings_handler, create_booking, list_bookings},
        cleaner::{cleaner_handler, login},
        customers::customers_handler,
        engagement::{leads_handler, reviews_handler},
    },
    middleware::auth,
    AppState,
};

async fn health_check(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Json<serde_json::Value> {
    let database_up = app_state.db_client.health_check().await.is_ok();
    Json(json!({
        "status": if database_up { "ok" } else { "degraded" },
        "database": database_up,
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // Public intake plus staff routes, merged under one /bookings nest.
    let booking_routes = Router::new()
        .route("/", get(list_bookings).post(create_booking))
        .merge(bookings_handler().layer(middleware::from_fn(auth)));

    let cleaner_routes = Router::new()
        .route("/login", post(login))
        .merge(cleaner_handler().layer(middleware::from_fn(auth)));

    let api_route = Router::new()
        .nest("/bookings", booking_routes)
        .nest("/cleaner", cleaner_routes)
        .nest(
            "/customers",
            customers_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/invoices",
            invoices_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/payouts",
            payouts_handler().layer(middleware::from_fn(auth)),
        )
        .nest(
            "/reviews",
            reviews_handler().layer(middleware::from_fn(auth)),
        )
        .nest("/leads", leads_handler().layer(middleware::from_fn(auth)))
        .layer(TraceLayer::new_for_http());

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
        .layer(Extension(app_state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, db::db::DBClient};
    use sqlx::postgres::PgPoolOptions;

    // Route conflicts (overlapping paths, bad nests) panic at assembly time.
    #[tokio::test]
    async fn router_assembles_without_conflicts() {
        let config = Config {
            database_url: "postgres://localhost:5432/ecoshine".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_maxage: 60,
            port: 8000,
            tax_rate: 0.0825,
            invoice_due_days: 30,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let app_state = Arc::new(crate::AppState::new(DBClient::new(pool), config));

        let _router = create_router(app_state);
    }
}
