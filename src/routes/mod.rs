//! Rutas HTTP de la API

pub mod delivery_order_routes;
pub mod driver_expense_routes;
pub mod resource_routes;
