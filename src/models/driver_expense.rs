//! Gastos de driver (ledger append-only)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::utils::errors::AppError;

/// Categorías válidas de gasto
pub const EXPENSE_TYPES: [&str; 5] = ["bbm", "tol", "parkir", "makan", "lainnya"];

/// Longitud máxima de las notas
pub const MAX_NOTES_LEN: usize = 500;

/// Normalizar y validar la categoría de gasto (lowercase + trim)
pub fn normalize_jenis(raw: &str) -> Result<String, AppError> {
    let jenis = raw.trim().to_lowercase();
    if jenis.is_empty() {
        return Err(AppError::Validation("Expense type cannot be empty".to_string()));
    }
    if !EXPENSE_TYPES.contains(&jenis.as_str()) {
        return Err(AppError::Validation(format!(
            "Expense type must be one of: {}",
            EXPENSE_TYPES.join(", ")
        )));
    }
    Ok(jenis)
}

/// Fila de `driver_expenses`
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DriverExpense {
    pub id: i64,
    pub delivery_order_id: i64,
    pub driver_id: i64,
    pub jenis: String,
    pub amount: Decimal,
    pub receipt_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DriverExpense {
    pub fn has_receipt(&self) -> bool {
        self.receipt_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_jenis_accepts_closed_set() {
        for jenis in EXPENSE_TYPES {
            assert_eq!(normalize_jenis(jenis).unwrap(), jenis);
        }
    }

    #[test]
    fn test_normalize_jenis_lowercases_and_trims() {
        assert_eq!(normalize_jenis("  BBM ").unwrap(), "bbm");
        assert_eq!(normalize_jenis("Tol").unwrap(), "tol");
    }

    #[test]
    fn test_normalize_jenis_rejects_unknown() {
        assert!(normalize_jenis("hotel").is_err());
        assert!(normalize_jenis("").is_err());
        assert!(normalize_jenis("   ").is_err());
    }
}
