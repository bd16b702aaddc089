//! Recursos de la flota: drivers y vehículos
//!
//! Los flags busy/available son estado denormalizado mantenido por el
//! Lifecycle Engine en create/complete/cancel. Las funciones
//! `expected_*_status` recomputan el valor esperado a partir de las órdenes
//! activas y sirven tanto para auditar drift como para corregirlo.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// Estado de un driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Available,
    Busy,
}

impl DriverStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriverStatus::Available => "available",
            DriverStatus::Busy => "busy",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(DriverStatus::Available),
            "busy" => Some(DriverStatus::Busy),
            _ => None,
        }
    }
}

/// Estado de un vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
}

impl VehicleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::InUse => "in_use",
            VehicleStatus::Maintenance => "maintenance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(VehicleStatus::Available),
            "in_use" => Some(VehicleStatus::InUse),
            "maintenance" => Some(VehicleStatus::Maintenance),
            _ => None,
        }
    }
}

/// Estado esperado de un driver según sus órdenes activas
pub fn expected_driver_status(active_orders: i64) -> DriverStatus {
    if active_orders > 0 {
        DriverStatus::Busy
    } else {
        DriverStatus::Available
    }
}

/// Estado esperado de un vehículo según sus órdenes activas.
///
/// `maintenance` se entra y sale fuera del ciclo de vida, así que un
/// vehículo en mantenimiento sin órdenes activas no se toca.
pub fn expected_vehicle_status(current: VehicleStatus, active_orders: i64) -> VehicleStatus {
    if active_orders > 0 {
        VehicleStatus::InUse
    } else if current == VehicleStatus::Maintenance {
        VehicleStatus::Maintenance
    } else {
        VehicleStatus::Available
    }
}

/// Fila de `driver_profiles`
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DriverProfile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fila de `vehicles`
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub license_plate: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub capacity: Option<i32>,
    pub status: String,
    pub last_service_date: Option<NaiveDate>,
    pub next_service_due: Option<NaiveDate>,
    pub stnk_number: Option<String>,
    pub stnk_expired_date: Option<NaiveDate>,
    pub tax_due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_driver_status() {
        assert_eq!(expected_driver_status(0), DriverStatus::Available);
        assert_eq!(expected_driver_status(1), DriverStatus::Busy);
        assert_eq!(expected_driver_status(3), DriverStatus::Busy);
    }

    #[test]
    fn test_expected_vehicle_status_preserves_maintenance() {
        assert_eq!(
            expected_vehicle_status(VehicleStatus::Maintenance, 0),
            VehicleStatus::Maintenance
        );
        // una orden activa siempre gana sobre maintenance
        assert_eq!(
            expected_vehicle_status(VehicleStatus::Maintenance, 1),
            VehicleStatus::InUse
        );
        assert_eq!(
            expected_vehicle_status(VehicleStatus::InUse, 0),
            VehicleStatus::Available
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(DriverStatus::parse("busy"), Some(DriverStatus::Busy));
        assert_eq!(VehicleStatus::parse("in_use"), Some(VehicleStatus::InUse));
        assert!(VehicleStatus::parse("parked").is_none());
    }
}
