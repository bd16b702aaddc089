//! Backend de coordinación logística de flota
//!
//! Core: el ciclo de vida de delivery orders (máquina de estados) y la
//! asignación de recursos (driver/vehículo) que ese ciclo mantiene, más el
//! ledger de gastos de drivers.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

/// Construir el router completo de la aplicación
pub fn create_app(app_state: AppState) -> Router {
    // sin orígenes configurados se abre todo (desarrollo)
    let cors = if app_state.config.cors_origins.is_empty() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(app_state.config.cors_origins.clone())
    };

    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api/delivery-orders",
            routes::delivery_order_routes::create_delivery_order_router(),
        )
        .nest(
            "/api/driver-expenses",
            routes::driver_expense_routes::create_driver_expense_router(),
        )
        .nest(
            "/api/resources",
            routes::resource_routes::create_resource_router(),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Health check simple
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "fleet-logistics",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
