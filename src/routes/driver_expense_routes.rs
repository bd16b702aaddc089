use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;

use crate::controllers::driver_expense_controller::DriverExpenseController;
use crate::dto::driver_expense_dto::{ListExpensesQuery, NewExpenseForm};
use crate::middleware::auth::AuthUser;
use crate::models::driver_expense::DriverExpense;
use crate::repositories::driver_expense_repository::ExpenseDetail;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_expense_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_expense).get(list_expenses))
        .route("/:id", get(get_expense))
        .route("/:id", delete(delete_expense))
}

async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DriverExpense>), AppError> {
    let form = parse_expense_form(multipart).await?;

    let controller = DriverExpenseController::new(state.pool.clone(), state.storage.clone());
    let expense = controller.create(auth, form).await?;
    Ok((StatusCode::CREATED, Json(expense)))
}

async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListExpensesQuery>,
) -> Result<Json<Vec<ExpenseDetail>>, AppError> {
    let controller = DriverExpenseController::new(state.pool.clone(), state.storage.clone());
    let expenses = controller.list(auth, query).await?;
    Ok(Json(expenses))
}

async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<DriverExpense>, AppError> {
    let controller = DriverExpenseController::new(state.pool.clone(), state.storage.clone());
    let expense = controller.get_by_id(auth, id).await?;
    Ok(Json(expense))
}

async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let controller = DriverExpenseController::new(state.pool.clone(), state.storage.clone());
    controller.delete(auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Parsear el multipart del formulario de gasto.
///
/// Acepta `delivery_order_id` o su alias histórico `trip_id`, y un archivo
/// opcional en el campo `receipt`.
async fn parse_expense_form(mut multipart: Multipart) -> Result<NewExpenseForm, AppError> {
    let mut form = NewExpenseForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "delivery_order_id" | "trip_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid field '{}': {}", name, e)))?;
                let id = text.trim().parse::<i64>().map_err(|_| {
                    AppError::Validation("delivery_order_id must be a number".to_string())
                })?;
                form.delivery_order_id = Some(id);
            }
            "jenis" => {
                form.jenis = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid field 'jenis': {}", e))
                })?);
            }
            "amount" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid field 'amount': {}", e))
                })?;
                let amount = text.trim().parse::<Decimal>().map_err(|_| {
                    AppError::Validation("amount must be a valid decimal number".to_string())
                })?;
                form.amount = Some(amount);
            }
            "notes" => {
                form.notes = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid field 'notes': {}", e))
                })?);
            }
            "receipt" => {
                let filename = field.file_name().unwrap_or("receipt").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid receipt upload: {}", e))
                })?;
                if !bytes.is_empty() {
                    form.receipt = Some((filename, bytes.to_vec()));
                }
            }
            // campos desconocidos se ignoran
            _ => {}
        }
    }

    Ok(form)
}
