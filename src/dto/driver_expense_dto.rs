use rust_decimal::Decimal;
use serde::Deserialize;

// Formulario multipart ya parseado para crear un gasto
#[derive(Debug, Default)]
pub struct NewExpenseForm {
    pub delivery_order_id: Option<i64>,
    pub jenis: Option<String>,
    pub amount: Option<Decimal>,
    pub notes: Option<String>,
    /// (nombre original, contenido) del recibo adjunto
    pub receipt: Option<(String, Vec<u8>)>,
}

// Query params para listar gastos
#[derive(Debug, Default, Deserialize)]
pub struct ListExpensesQuery {
    pub delivery_order_id: Option<i64>,
    /// Alias histórico de delivery_order_id usado por la app móvil
    pub trip_id: Option<i64>,
    pub jenis: Option<String>,
    /// Solo tiene efecto para admin/owner; un driver siempre ve lo suyo
    pub driver_id: Option<i64>,
}

impl ListExpensesQuery {
    pub fn order_filter(&self) -> Option<i64> {
        self.delivery_order_id.or(self.trip_id)
    }
}
