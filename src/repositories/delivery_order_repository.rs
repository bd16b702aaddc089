//! Persistencia del Lifecycle Engine
//!
//! Todas las escrituras multi-tabla (create, complete, cancel) viven aquí
//! como transacciones únicas: la orden y los flags de recursos cambian
//! juntos o no cambia nada. Las transiciones intermedias son un único
//! UPDATE guardado por `(id, driver_id, status esperado)`.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::dto::delivery_order_dto::CreateDeliveryOrderRequest;
use crate::models::delivery_order::{
    lookup_transition, DeliveryOrder, DeliveryStatus, TransitionAction,
};
use crate::models::resource::{DriverStatus, VehicleStatus};
use crate::repositories::resource_repository::ResourceRepository;
use crate::utils::errors::{map_unique_violation, AppError};

/// Mensaje deliberadamente ambiguo: no revela si la orden existe
/// cuando el caller no es su driver (anti-enumeración).
pub const NOT_FOUND_OR_UNAUTHORIZED: &str = "Delivery Order not found or you are not authorized.";

/// Orden con sus referencias unidas (po_number, placa, nombre del driver)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DeliveryOrderDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: DeliveryOrder,
    pub po_number: Option<String>,
    pub license_plate: Option<String>,
    pub vehicle_type: Option<String>,
    pub driver_name: Option<String>,
}

const DETAIL_SELECT: &str = r#"
    SELECT d.*,
           po.po_number AS po_number,
           v.license_plate AS license_plate,
           v.type AS vehicle_type,
           dp.full_name AS driver_name
    FROM delivery_orders d
    LEFT JOIN purchase_orders po ON po.id = d.purchase_order_id
    LEFT JOIN vehicles v ON v.id = d.vehicle_id
    LEFT JOIN driver_profiles dp ON dp.user_id = d.driver_id
"#;

pub struct DeliveryOrderRepository {
    pool: PgPool,
}

impl DeliveryOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insertar la orden y marcar driver/vehículo ocupados, todo o nada.
    pub async fn create_with_assignment(
        &self,
        req: &CreateDeliveryOrderRequest,
    ) -> Result<DeliveryOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, DeliveryOrder>(
            r#"
            INSERT INTO delivery_orders (
                purchase_order_id, driver_id, vehicle_id, do_number,
                customer_name, item_name, quantity, unit_price, total_amount,
                load_location, unload_location, surat_jalan_url,
                payment_status, payment_type, deposit_amount, invoice_amount,
                due_date, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                    COALESCE($13, 'proses_tagihan'), $14, COALESCE($15, 0), $16, $17,
                    'assigned')
            RETURNING *
            "#,
        )
        .bind(req.purchase_order_id)
        .bind(req.driver_id)
        .bind(req.vehicle_id)
        .bind(req.do_number.trim())
        .bind(req.customer_name.trim())
        .bind(&req.item_name)
        .bind(req.quantity)
        .bind(req.unit_price)
        .bind(req.total_amount)
        .bind(&req.load_location)
        .bind(&req.unload_location)
        .bind(&req.surat_jalan_url)
        .bind(&req.payment_status)
        .bind(&req.payment_type)
        .bind(req.deposit_amount)
        .bind(req.invoice_amount)
        .bind(req.due_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, "A delivery order with this do_number already exists"))?;

        ResourceRepository::set_driver_status(&mut *tx, req.driver_id, DriverStatus::Busy).await?;
        ResourceRepository::set_vehicle_status(&mut *tx, req.vehicle_id, VehicleStatus::InUse)
            .await?;

        tx.commit().await?;

        Ok(order)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DeliveryOrderDetail>, AppError> {
        let sql = format!("{} WHERE d.id = $1", DETAIL_SELECT);
        let order = sqlx::query_as::<_, DeliveryOrderDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Listado con filtro opcional de estados y scoping opcional por driver
    pub async fn list(
        &self,
        statuses: Option<Vec<String>>,
        driver_scope: Option<i64>,
    ) -> Result<Vec<DeliveryOrderDetail>, AppError> {
        let sql = format!(
            r#"{}
            WHERE ($1::text[] IS NULL OR d.status = ANY($1))
              AND ($2::bigint IS NULL OR d.driver_id = $2)
            ORDER BY d.created_at DESC
            "#,
            DETAIL_SELECT
        );

        let orders = sqlx::query_as::<_, DeliveryOrderDetail>(&sql)
            .bind(statuses)
            .bind(driver_scope)
            .fetch_all(&self.pool)
            .await?;

        Ok(orders)
    }

    /// Fila cruda sin joins (checks de ownership/estado del expense ledger)
    pub async fn find_raw(&self, id: i64) -> Result<Option<DeliveryOrder>, AppError> {
        let order = sqlx::query_as::<_, DeliveryOrder>("SELECT * FROM delivery_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Aplicar una transición del driver asignado.
    ///
    /// La búsqueda filtra por `(id, driver_id)`: cero filas produce el mismo
    /// 404 exista la orden o no. El UPDATE va guardado por el estado
    /// predecesor, así que un doble submit concurrente pierde la carrera y
    /// recibe `InvalidTransition` en vez de re-pisar el timestamp.
    pub async fn transition(
        &self,
        order_id: i64,
        driver_id: i64,
        action: TransitionAction,
    ) -> Result<DeliveryOrder, AppError> {
        if action == TransitionAction::Complete {
            return self.complete(order_id, driver_id).await;
        }

        let order = sqlx::query_as::<_, DeliveryOrder>(
            "SELECT * FROM delivery_orders WHERE id = $1 AND driver_id = $2",
        )
        .bind(order_id)
        .bind(driver_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_OR_UNAUTHORIZED.to_string()))?;

        let transition = self.resolve_transition(&order, action)?;

        let sql = format!(
            r#"
            UPDATE delivery_orders
            SET status = $3, {} = NOW()
            WHERE id = $1 AND driver_id = $2 AND status = $4
            RETURNING *
            "#,
            transition.timestamp_column
        );

        let updated = sqlx::query_as::<_, DeliveryOrder>(&sql)
            .bind(order_id)
            .bind(driver_id)
            .bind(transition.to.as_str())
            .bind(transition.from.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::InvalidTransition(format!(
                    "Order {} is no longer in status '{}'",
                    order_id,
                    transition.from.as_str()
                ))
            })?;

        Ok(updated)
    }

    /// Transición terminal: cierra la orden y libera driver y vehículo
    /// en la misma transacción.
    async fn complete(&self, order_id: i64, driver_id: i64) -> Result<DeliveryOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, DeliveryOrder>(
            "SELECT * FROM delivery_orders WHERE id = $1 AND driver_id = $2 FOR UPDATE",
        )
        .bind(order_id)
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND_OR_UNAUTHORIZED.to_string()))?;

        let transition = self.resolve_transition(&order, TransitionAction::Complete)?;

        let updated = sqlx::query_as::<_, DeliveryOrder>(
            r#"
            UPDATE delivery_orders
            SET status = $2, completed_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(order_id)
        .bind(transition.to.as_str())
        .fetch_one(&mut *tx)
        .await?;

        ResourceRepository::set_driver_status(&mut *tx, order.driver_id, DriverStatus::Available)
            .await?;
        ResourceRepository::set_vehicle_status(
            &mut *tx,
            order.vehicle_id,
            VehicleStatus::Available,
        )
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    /// Override administrativo: cancela la orden desde cualquier estado no
    /// terminal y libera los recursos, en una sola transacción.
    pub async fn cancel(&self, order_id: i64) -> Result<DeliveryOrder, AppError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, DeliveryOrder>(
            "SELECT * FROM delivery_orders WHERE id = $1 FOR UPDATE",
        )
        .bind(order_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Delivery Order not found".to_string()))?;

        let current = order
            .parsed_status()
            .ok_or_else(|| AppError::Internal(format!("Unknown order status '{}'", order.status)))?;

        if current.is_terminal() {
            return Err(AppError::InvalidTransition(format!(
                "Cannot cancel an order in status '{}'",
                order.status
            )));
        }

        let updated = sqlx::query_as::<_, DeliveryOrder>(
            "UPDATE delivery_orders SET status = 'cancelled' WHERE id = $1 RETURNING *",
        )
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        ResourceRepository::set_driver_status(&mut *tx, order.driver_id, DriverStatus::Available)
            .await?;
        ResourceRepository::set_vehicle_status(
            &mut *tx,
            order.vehicle_id,
            VehicleStatus::Available,
        )
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    fn resolve_transition(
        &self,
        order: &DeliveryOrder,
        action: TransitionAction,
    ) -> Result<crate::models::delivery_order::Transition, AppError> {
        let current = order
            .parsed_status()
            .ok_or_else(|| AppError::Internal(format!("Unknown order status '{}'", order.status)))?;

        lookup_transition(current, action).ok_or_else(|| {
            AppError::InvalidTransition(format!(
                "Cannot {} an order in status '{}'",
                action.as_str(),
                order.status
            ))
        })
    }

    /// Suma de gastos registrados contra una orden
    pub async fn expense_total(&self, order_id: i64) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(amount), 0) FROM driver_expenses WHERE delivery_order_id = $1",
        )
        .bind(order_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_does_not_leak_existence() {
        // mismo mensaje para "no existe" y "no es tuya"
        assert!(NOT_FOUND_OR_UNAUTHORIZED.contains("not found or you are not authorized"));
    }

    #[test]
    fn test_detail_select_does_not_leak_joined_status_columns() {
        // los joins solo traen columnas con alias explícito; el status de la
        // orden no puede ser pisado por el del vehículo
        assert!(!DETAIL_SELECT.contains("v.*"));
        assert!(!DETAIL_SELECT.contains("v.status"));
        assert!(DETAIL_SELECT.contains("v.type AS vehicle_type"));
    }

    #[test]
    fn test_delivery_status_helpers_used_by_queries() {
        assert_eq!(DeliveryStatus::Assigned.as_str(), "assigned");
        assert_eq!(DriverStatus::Busy.as_str(), "busy");
        assert_eq!(VehicleStatus::InUse.as_str(), "in_use");
    }
}
