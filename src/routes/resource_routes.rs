use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::resource_controller::ResourceController;
use crate::dto::resource_dto::ReconcileReport;
use crate::middleware::auth::AuthUser;
use crate::models::resource::{DriverProfile, Vehicle};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_resource_router() -> Router<AppState> {
    Router::new()
        .route("/drivers/available", get(available_drivers))
        .route("/vehicles/available", get(available_vehicles))
        .route("/reconcile", post(reconcile))
}

async fn available_drivers(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DriverProfile>>, AppError> {
    let controller = ResourceController::new(state.pool.clone());
    let drivers = controller.available_drivers(auth).await?;
    Ok(Json(drivers))
}

async fn available_vehicles(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let controller = ResourceController::new(state.pool.clone());
    let vehicles = controller.available_vehicles(auth).await?;
    Ok(Json(vehicles))
}

async fn reconcile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ReconcileReport>, AppError> {
    let controller = ResourceController::new(state.pool.clone());
    let report = controller.reconcile(auth).await?;
    Ok(Json(report))
}
