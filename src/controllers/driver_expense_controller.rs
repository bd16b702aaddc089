//! Expense Ledger: gastos de driver contra una orden
//!
//! Append-only: un gasto se crea o se borra (administrativamente), nunca se
//! edita. El borrado también elimina el recibo del blob store, best-effort.

use sqlx::PgPool;

use crate::dto::driver_expense_dto::{ListExpensesQuery, NewExpenseForm};
use crate::middleware::auth::AuthUser;
use crate::models::auth::UserRole;
use crate::models::driver_expense::{normalize_jenis, DriverExpense, MAX_NOTES_LEN};
use crate::repositories::delivery_order_repository::DeliveryOrderRepository;
use crate::repositories::driver_expense_repository::{DriverExpenseRepository, ExpenseDetail};
use crate::services::storage_service::StorageService;
use crate::utils::errors::AppError;
use crate::utils::validation::require_positive_amount;

pub struct DriverExpenseController {
    expenses: DriverExpenseRepository,
    orders: DeliveryOrderRepository,
    storage: StorageService,
}

impl DriverExpenseController {
    pub fn new(pool: PgPool, storage: StorageService) -> Self {
        Self {
            expenses: DriverExpenseRepository::new(pool.clone()),
            orders: DeliveryOrderRepository::new(pool),
            storage,
        }
    }

    pub async fn create(
        &self,
        caller: AuthUser,
        form: NewExpenseForm,
    ) -> Result<DriverExpense, AppError> {
        caller.require_driver()?;

        let delivery_order_id = form.delivery_order_id.ok_or_else(|| {
            AppError::Validation("delivery_order_id is required".to_string())
        })?;
        let jenis = normalize_jenis(
            form.jenis
                .as_deref()
                .ok_or_else(|| AppError::Validation("jenis is required".to_string()))?,
        )?;
        let amount = form
            .amount
            .ok_or_else(|| AppError::Validation("amount is required".to_string()))?;
        require_positive_amount(amount, "amount")?;

        let notes = form
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        if let Some(n) = &notes {
            if n.chars().count() > MAX_NOTES_LEN {
                return Err(AppError::Validation(format!(
                    "Notes must not exceed {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }

        let order = self
            .orders
            .find_raw(delivery_order_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Delivery Order not found".to_string()))?;

        if order.driver_id != caller.id {
            return Err(AppError::Forbidden(
                "You can only submit expenses for your own delivery orders".to_string(),
            ));
        }

        let status = order
            .parsed_status()
            .ok_or_else(|| AppError::Internal(format!("Unknown order status '{}'", order.status)))?;
        if status.is_terminal() {
            return Err(AppError::Conflict(format!(
                "Cannot add expenses to an order in status '{}'",
                order.status
            )));
        }

        let receipt_url = match &form.receipt {
            Some((filename, bytes)) => Some(self.storage.store_receipt(filename, bytes).await?),
            None => None,
        };

        let inserted = self
            .expenses
            .insert(delivery_order_id, caller.id, &jenis, amount, notes, receipt_url.clone())
            .await;

        // si el insert falla el blob queda huérfano: limpiarlo
        if inserted.is_err() {
            if let Some(url) = &receipt_url {
                self.storage.remove(url).await;
            }
        }

        inserted
    }

    /// Listado con filtros; un driver siempre queda limitado a sus gastos
    pub async fn list(
        &self,
        caller: AuthUser,
        query: ListExpensesQuery,
    ) -> Result<Vec<ExpenseDetail>, AppError> {
        let driver_filter = if caller.role == UserRole::Driver {
            Some(caller.id)
        } else {
            query.driver_id
        };

        let jenis_filter = query
            .jenis
            .as_deref()
            .map(|j| j.trim().to_lowercase())
            .filter(|j| !j.is_empty());

        self.expenses
            .list(driver_filter, query.order_filter(), jenis_filter)
            .await
    }

    /// Visible para el driver que lo cargó o para admin/owner
    pub async fn get_by_id(&self, caller: AuthUser, id: i64) -> Result<DriverExpense, AppError> {
        let expense = self
            .expenses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Expense not found".to_string()))?;

        self.authorize(&caller, &expense)?;

        Ok(expense)
    }

    /// Borrar el gasto y su recibo (el recibo best-effort)
    pub async fn delete(&self, caller: AuthUser, id: i64) -> Result<(), AppError> {
        let expense = self
            .expenses
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Expense not found".to_string()))?;

        self.authorize(&caller, &expense)?;

        self.expenses.delete(id).await?;

        if let Some(url) = &expense.receipt_url {
            self.storage.remove(url).await;
        }

        Ok(())
    }

    fn authorize(&self, caller: &AuthUser, expense: &DriverExpense) -> Result<(), AppError> {
        if expense.driver_id != caller.id && !caller.role.is_dispatcher() {
            return Err(AppError::Forbidden("Access forbidden.".to_string()));
        }
        Ok(())
    }
}
