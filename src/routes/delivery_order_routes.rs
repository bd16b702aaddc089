use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};

use crate::controllers::delivery_order_controller::DeliveryOrderController;
use crate::dto::common::ApiResponse;
use crate::dto::delivery_order_dto::{
    CreateDeliveryOrderRequest, DeliveryOrderDetailResponse, ListDeliveryOrdersQuery,
    TransitionResponse,
};
use crate::middleware::auth::AuthUser;
use crate::models::delivery_order::{DeliveryOrder, TransitionAction};
use crate::repositories::delivery_order_repository::DeliveryOrderDetail;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_delivery_order_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/me", get(list_my_orders))
        .route("/:id", get(get_order))
        .route("/:id/start", patch(start_order))
        .route("/:id/arrive", patch(arrive_order))
        .route("/:id/return", patch(return_order))
        .route("/:id/complete", patch(complete_order))
        .route("/:id/cancel", patch(cancel_order))
}

async fn create_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<CreateDeliveryOrderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<DeliveryOrder>>), AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.create(auth, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_orders(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListDeliveryOrdersQuery>,
) -> Result<Json<Vec<DeliveryOrderDetail>>, AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.list_all(auth, query).await?;
    Ok(Json(response))
}

async fn list_my_orders(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<DeliveryOrderDetail>>, AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.list_mine(auth).await?;
    Ok(Json(response))
}

async fn get_order(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DeliveryOrderDetailResponse>, AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn start_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply_transition(state, auth, id, TransitionAction::Start).await
}

async fn arrive_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply_transition(state, auth, id, TransitionAction::Arrive).await
}

async fn return_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply_transition(state, auth, id, TransitionAction::Return).await
}

async fn complete_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TransitionResponse>, AppError> {
    apply_transition(state, auth, id, TransitionAction::Complete).await
}

async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.cancel(auth, id).await?;
    Ok(Json(response))
}

async fn apply_transition(
    state: AppState,
    auth: AuthUser,
    id: i64,
    action: TransitionAction,
) -> Result<Json<TransitionResponse>, AppError> {
    let controller = DeliveryOrderController::new(state.pool.clone());
    let response = controller.transition(auth, id, action).await?;
    Ok(Json(response))
}
