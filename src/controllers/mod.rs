//! Controllers: lógica de negocio detrás de las rutas

pub mod delivery_order_controller;
pub mod driver_expense_controller;
pub mod resource_controller;
