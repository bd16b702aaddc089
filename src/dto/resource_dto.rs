use serde::Serialize;

// Reporte de la reconciliación de flags busy/available
#[derive(Debug, Default, Serialize)]
pub struct ReconcileReport {
    pub drivers_checked: u64,
    pub drivers_fixed: Vec<ReconciledResource>,
    pub vehicles_checked: u64,
    pub vehicles_fixed: Vec<ReconciledResource>,
}

// Un recurso cuyo flag no coincidía con sus órdenes activas
#[derive(Debug, Serialize)]
pub struct ReconciledResource {
    pub id: i64,
    pub previous_status: String,
    pub corrected_status: String,
}
