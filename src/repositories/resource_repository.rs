//! Resource Registry: flags de disponibilidad de drivers y vehículos
//!
//! Los `set_*_status` son funciones asociadas que reciben la conexión para
//! poder ejecutarse dentro de las transacciones del Lifecycle Engine. Nadie
//! más debería mutar estos flags.

use sqlx::{PgConnection, PgPool};

use crate::models::delivery_order::ACTIVE_STATUSES;
use crate::models::resource::{DriverProfile, DriverStatus, Vehicle, VehicleStatus};
use crate::utils::errors::AppError;

pub struct ResourceRepository {
    pool: PgPool,
}

impl ResourceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_driver(&self, user_id: i64) -> Result<Option<DriverProfile>, AppError> {
        let driver = sqlx::query_as::<_, DriverProfile>(
            "SELECT * FROM driver_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_vehicle(&self, id: i64) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    /// Picklist del admin al crear órdenes
    pub async fn find_available_drivers(&self) -> Result<Vec<DriverProfile>, AppError> {
        let drivers = sqlx::query_as::<_, DriverProfile>(
            "SELECT * FROM driver_profiles WHERE status = 'available' ORDER BY full_name ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    /// Picklist del admin al crear órdenes
    pub async fn find_available_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE status = 'available' ORDER BY license_plate ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(vehicles)
    }

    pub async fn all_drivers(&self) -> Result<Vec<DriverProfile>, AppError> {
        let drivers =
            sqlx::query_as::<_, DriverProfile>("SELECT * FROM driver_profiles ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(drivers)
    }

    pub async fn all_vehicles(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    /// Órdenes activas del driver (fuente de verdad para la reconciliación)
    pub async fn count_active_orders_for_driver(&self, user_id: i64) -> Result<i64, AppError> {
        let active: Vec<String> = ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM delivery_orders WHERE driver_id = $1 AND status = ANY($2)",
        )
        .bind(user_id)
        .bind(&active)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Órdenes activas del vehículo (fuente de verdad para la reconciliación)
    pub async fn count_active_orders_for_vehicle(&self, vehicle_id: i64) -> Result<i64, AppError> {
        let active: Vec<String> = ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect();
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM delivery_orders WHERE vehicle_id = $1 AND status = ANY($2)",
        )
        .bind(vehicle_id)
        .bind(&active)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Mutación atómica del flag del driver, keyed por user_id.
    ///
    /// Recibe la conexión para ejecutarse dentro de la transacción del
    /// create/complete/cancel del Lifecycle Engine.
    pub async fn set_driver_status(
        conn: &mut PgConnection,
        user_id: i64,
        status: DriverStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE driver_profiles SET status = $2 WHERE user_id = $1")
            .bind(user_id)
            .bind(status.as_str())
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Mutación atómica del flag del vehículo
    pub async fn set_vehicle_status(
        conn: &mut PgConnection,
        vehicle_id: i64,
        status: VehicleStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET status = $2 WHERE id = $1")
            .bind(vehicle_id)
            .bind(status.as_str())
            .execute(conn)
            .await?;

        Ok(())
    }
}
