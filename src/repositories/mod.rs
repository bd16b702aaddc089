//! Repositorios de acceso a datos

pub mod delivery_order_repository;
pub mod driver_expense_repository;
pub mod resource_repository;
