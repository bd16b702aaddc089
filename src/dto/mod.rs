//! DTOs de request/response de la API

pub mod common;
pub mod delivery_order_dto;
pub mod driver_expense_dto;
pub mod resource_dto;
