//! Lifecycle Engine: operaciones sobre delivery orders
//!
//! Toda transición y todo efecto colateral sobre los flags de recursos pasa
//! por aquí; ningún handler escribe estado de ciclo de vida por su cuenta.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::delivery_order_dto::{
    CreateDeliveryOrderRequest, DeliveryOrderDetailResponse, ListDeliveryOrdersQuery,
    TransitionResponse,
};
use crate::middleware::auth::AuthUser;
use crate::models::auth::UserRole;
use crate::models::delivery_order::{
    DeliveryOrder, TransitionAction, PAYMENT_STATUSES, PAYMENT_TYPES,
};
use crate::repositories::delivery_order_repository::{DeliveryOrderDetail, DeliveryOrderRepository};
use crate::repositories::resource_repository::ResourceRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_status_filter, require_positive_amount};

pub struct DeliveryOrderController {
    orders: DeliveryOrderRepository,
    resources: ResourceRepository,
}

impl DeliveryOrderController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            orders: DeliveryOrderRepository::new(pool.clone()),
            resources: ResourceRepository::new(pool),
        }
    }

    /// Crear una orden y marcar driver/vehículo ocupados (atómico)
    pub async fn create(
        &self,
        caller: AuthUser,
        request: CreateDeliveryOrderRequest,
    ) -> Result<ApiResponse<DeliveryOrder>, AppError> {
        caller.require_dispatcher()?;
        request.validate()?;
        require_positive_amount(request.total_amount, "total_amount")?;

        if let Some(ps) = &request.payment_status {
            if !PAYMENT_STATUSES.contains(&ps.as_str()) {
                return Err(AppError::Validation(format!(
                    "payment_status must be one of: {}",
                    PAYMENT_STATUSES.join(", ")
                )));
            }
        }
        if let Some(pt) = &request.payment_type {
            if !PAYMENT_TYPES.contains(&pt.as_str()) {
                return Err(AppError::Validation(format!(
                    "payment_type must be one of: {}",
                    PAYMENT_TYPES.join(", ")
                )));
            }
        }

        let driver = self
            .resources
            .find_driver(request.driver_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Driver not found".to_string()))?;

        let vehicle = self
            .resources
            .find_vehicle(request.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        // El doble booking no se rechaza (comportamiento heredado del
        // sistema original) pero queda visible en los logs.
        if driver.status != "available" {
            tracing::warn!(
                driver_id = request.driver_id,
                status = %driver.status,
                "Assigning a driver that is not available"
            );
        }
        if vehicle.status != "available" {
            tracing::warn!(
                vehicle_id = request.vehicle_id,
                status = %vehicle.status,
                "Assigning a vehicle that is not available"
            );
        }

        let order = self.orders.create_with_assignment(&request).await?;

        Ok(ApiResponse::success_with_message(
            order,
            "Delivery Order created".to_string(),
        ))
    }

    /// Detalle de la orden más la suma de sus gastos
    pub async fn get_by_id(&self, id: i64) -> Result<DeliveryOrderDetailResponse, AppError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Delivery Order not found".to_string()))?;

        let expense_total = self.orders.expense_total(order.order.id).await?;

        Ok(DeliveryOrderDetailResponse {
            order,
            expense_total,
        })
    }

    /// Lista de tareas del driver autenticado
    pub async fn list_mine(&self, caller: AuthUser) -> Result<Vec<DeliveryOrderDetail>, AppError> {
        caller.require_driver()?;
        self.orders.list(None, Some(caller.id)).await
    }

    /// Listado general; un driver solo ve sus propias órdenes
    pub async fn list_all(
        &self,
        caller: AuthUser,
        query: ListDeliveryOrdersQuery,
    ) -> Result<Vec<DeliveryOrderDetail>, AppError> {
        let statuses = query
            .status
            .as_deref()
            .map(parse_status_filter)
            .filter(|s| !s.is_empty());

        let scope = if caller.role == UserRole::Driver {
            Some(caller.id)
        } else {
            None
        };

        self.orders.list(statuses, scope).await
    }

    /// Aplicar una transición como el driver asignado
    pub async fn transition(
        &self,
        caller: AuthUser,
        order_id: i64,
        action: TransitionAction,
    ) -> Result<TransitionResponse, AppError> {
        caller.require_driver()?;

        let order = self.orders.transition(order_id, caller.id, action).await?;

        let message = match action {
            TransitionAction::Start => "Status updated to OTW to Destination",
            TransitionAction::Arrive => "Status updated to At Destination",
            TransitionAction::Return => "Status updated to OTW to Base",
            TransitionAction::Complete => "Delivery Order completed successfully!",
        };

        Ok(TransitionResponse {
            message: message.to_string(),
            order,
        })
    }

    /// Override administrativo: cancelar liberando recursos
    pub async fn cancel(
        &self,
        caller: AuthUser,
        order_id: i64,
    ) -> Result<TransitionResponse, AppError> {
        caller.require_dispatcher()?;

        let order = self.orders.cancel(order_id).await?;

        Ok(TransitionResponse {
            message: "Delivery Order cancelled".to_string(),
            order,
        })
    }
}
