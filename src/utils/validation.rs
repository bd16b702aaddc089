//! Utilidades de validación
//!
//! Funciones helper de validación compartidas por los DTOs y controllers.

use rust_decimal::Decimal;

use crate::utils::errors::AppError;

/// Validar que un string no esté vacío
pub fn require_not_empty(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

/// Validar que un monto sea estrictamente positivo
pub fn require_positive_amount(amount: Decimal, field: &str) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::Validation(format!("{} must be greater than 0", field)));
    }
    Ok(())
}

/// Parsear un filtro CSV de estados (`?status=assigned,completed`)
pub fn parse_status_filter(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_not_empty() {
        assert!(require_not_empty("DO-1001", "do_number").is_ok());
        assert!(require_not_empty("   ", "do_number").is_err());
        assert!(require_not_empty("", "do_number").is_err());
    }

    #[test]
    fn test_require_positive_amount() {
        assert!(require_positive_amount(Decimal::new(50000, 0), "amount").is_ok());
        assert!(require_positive_amount(Decimal::ZERO, "amount").is_err());
        assert!(require_positive_amount(Decimal::new(-1, 0), "amount").is_err());
    }

    #[test]
    fn test_parse_status_filter() {
        assert_eq!(
            parse_status_filter("assigned, OTW_to_destination ,"),
            vec!["assigned".to_string(), "otw_to_destination".to_string()]
        );
        assert!(parse_status_filter("").is_empty());
    }
}
