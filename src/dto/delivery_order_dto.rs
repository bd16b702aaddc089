use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::delivery_order::DeliveryOrder;
use crate::repositories::delivery_order_repository::DeliveryOrderDetail;

// Request para crear un delivery order
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDeliveryOrderRequest {
    pub purchase_order_id: Option<i64>,
    pub driver_id: i64,
    pub vehicle_id: i64,
    #[validate(length(min = 1, max = 50, message = "do_number is required"))]
    pub do_number: String,
    #[validate(length(min = 1, max = 100, message = "customer_name is required"))]
    pub customer_name: String,
    pub item_name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_amount: Decimal,
    pub load_location: Option<String>,
    pub unload_location: Option<String>,
    pub payment_status: Option<String>,
    pub payment_type: Option<String>,
    pub deposit_amount: Option<Decimal>,
    pub invoice_amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    /// Referencia al documento surat jalan ya almacenado en el blob store
    pub surat_jalan_url: Option<String>,
}

// Query params para listar delivery orders
#[derive(Debug, Default, Deserialize)]
pub struct ListDeliveryOrdersQuery {
    /// Filtro CSV de estados: `?status=assigned,otw_to_destination`
    pub status: Option<String>,
}

// Detalle de una orden con el total de gastos registrados contra ella
#[derive(Debug, Serialize)]
pub struct DeliveryOrderDetailResponse {
    #[serde(flatten)]
    pub order: DeliveryOrderDetail,
    pub expense_total: Decimal,
}

// Response de una transición de estado
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    pub message: String,
    pub order: DeliveryOrder,
}
