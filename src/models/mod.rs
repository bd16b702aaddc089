//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos que mapean exactamente
//! al schema PostgreSQL, más la máquina de estados del ciclo de vida.

pub mod auth;
pub mod delivery_order;
pub mod driver_expense;
pub mod resource;
