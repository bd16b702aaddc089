//! Resource Registry: picklists de disponibilidad y reconciliación
//!
//! Los flags busy/available son denormalizados y pueden derivar si alguien
//! muta órdenes por fuera del Lifecycle Engine. `reconcile` recomputa el
//! estado esperado desde las órdenes activas y corrige las diferencias.

use sqlx::PgPool;

use crate::dto::resource_dto::{ReconcileReport, ReconciledResource};
use crate::middleware::auth::AuthUser;
use crate::models::resource::{
    expected_driver_status, expected_vehicle_status, DriverProfile, Vehicle, VehicleStatus,
};
use crate::repositories::resource_repository::ResourceRepository;
use crate::utils::errors::AppError;

pub struct ResourceController {
    pool: PgPool,
    resources: ResourceRepository,
}

impl ResourceController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            resources: ResourceRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn available_drivers(&self, caller: AuthUser) -> Result<Vec<DriverProfile>, AppError> {
        caller.require_dispatcher()?;
        self.resources.find_available_drivers().await
    }

    pub async fn available_vehicles(&self, caller: AuthUser) -> Result<Vec<Vehicle>, AppError> {
        caller.require_dispatcher()?;
        self.resources.find_available_vehicles().await
    }

    /// Auditar y corregir drift de los flags de disponibilidad
    pub async fn reconcile(&self, caller: AuthUser) -> Result<ReconcileReport, AppError> {
        caller.require_dispatcher()?;

        let mut report = ReconcileReport::default();

        for driver in self.resources.all_drivers().await? {
            report.drivers_checked += 1;

            let active = self
                .resources
                .count_active_orders_for_driver(driver.user_id)
                .await?;
            let expected = expected_driver_status(active);

            if driver.status != expected.as_str() {
                let mut conn = self.pool.acquire().await?;
                ResourceRepository::set_driver_status(&mut *conn, driver.user_id, expected).await?;

                tracing::warn!(
                    driver_id = driver.user_id,
                    from = %driver.status,
                    to = expected.as_str(),
                    "Reconciled driver status"
                );
                report.drivers_fixed.push(ReconciledResource {
                    id: driver.user_id,
                    previous_status: driver.status.clone(),
                    corrected_status: expected.as_str().to_string(),
                });
            }
        }

        for vehicle in self.resources.all_vehicles().await? {
            report.vehicles_checked += 1;

            let Some(current) = VehicleStatus::parse(&vehicle.status) else {
                tracing::warn!(
                    vehicle_id = vehicle.id,
                    status = %vehicle.status,
                    "Skipping vehicle with unknown status"
                );
                continue;
            };

            let active = self
                .resources
                .count_active_orders_for_vehicle(vehicle.id)
                .await?;
            let expected = expected_vehicle_status(current, active);

            if current != expected {
                let mut conn = self.pool.acquire().await?;
                ResourceRepository::set_vehicle_status(&mut *conn, vehicle.id, expected).await?;

                tracing::warn!(
                    vehicle_id = vehicle.id,
                    from = %vehicle.status,
                    to = expected.as_str(),
                    "Reconciled vehicle status"
                );
                report.vehicles_fixed.push(ReconciledResource {
                    id: vehicle.id,
                    previous_status: vehicle.status.clone(),
                    corrected_status: expected.as_str().to_string(),
                });
            }
        }

        Ok(report)
    }
}
