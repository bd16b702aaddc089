//! Persistencia del expense ledger

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::models::driver_expense::DriverExpense;
use crate::utils::errors::AppError;

/// Gasto con contexto de su orden (do_number, cliente)
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct ExpenseDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub expense: DriverExpense,
    pub do_number: Option<String>,
    pub customer_name: Option<String>,
}

pub struct DriverExpenseRepository {
    pool: PgPool,
}

impl DriverExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        delivery_order_id: i64,
        driver_id: i64,
        jenis: &str,
        amount: Decimal,
        notes: Option<String>,
        receipt_url: Option<String>,
    ) -> Result<DriverExpense, AppError> {
        let expense = sqlx::query_as::<_, DriverExpense>(
            r#"
            INSERT INTO driver_expenses (delivery_order_id, driver_id, jenis, amount, notes, receipt_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(delivery_order_id)
        .bind(driver_id)
        .bind(jenis)
        .bind(amount)
        .bind(notes)
        .bind(receipt_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(expense)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<DriverExpense>, AppError> {
        let expense =
            sqlx::query_as::<_, DriverExpense>("SELECT * FROM driver_expenses WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(expense)
    }

    /// Listado newest-first con filtros opcionales
    pub async fn list(
        &self,
        driver_filter: Option<i64>,
        order_filter: Option<i64>,
        jenis_filter: Option<String>,
    ) -> Result<Vec<ExpenseDetail>, AppError> {
        let expenses = sqlx::query_as::<_, ExpenseDetail>(
            r#"
            SELECT e.*, d.do_number AS do_number, d.customer_name AS customer_name
            FROM driver_expenses e
            LEFT JOIN delivery_orders d ON d.id = e.delivery_order_id
            WHERE ($1::bigint IS NULL OR e.driver_id = $1)
              AND ($2::bigint IS NULL OR e.delivery_order_id = $2)
              AND ($3::text IS NULL OR e.jenis = $3)
            ORDER BY e.created_at DESC
            "#,
        )
        .bind(driver_filter)
        .bind(order_filter)
        .bind(jenis_filter)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM driver_expenses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
