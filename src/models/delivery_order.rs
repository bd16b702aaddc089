//! Delivery Order y su máquina de estados
//!
//! El ciclo de vida es una tabla única de transiciones
//! `(estado actual, acción) -> (estado siguiente, campo timestamp)`.
//! Cualquier par fuera de la tabla se rechaza; no hay lógica de estados
//! dispersa por endpoint.
//!
//! ```text
//! assigned --start--> otw_to_destination --arrive--> at_destination
//!         --return--> otw_to_base --complete--> completed
//! ```
//!
//! `cancelled` es terminal y solo lo produce la operación administrativa
//! `cancel`, nunca una transición del driver.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Estado del ciclo de vida de un Delivery Order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Assigned,
    OtwToDestination,
    AtDestination,
    OtwToBase,
    Completed,
    Cancelled,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Assigned => "assigned",
            DeliveryStatus::OtwToDestination => "otw_to_destination",
            DeliveryStatus::AtDestination => "at_destination",
            DeliveryStatus::OtwToBase => "otw_to_base",
            DeliveryStatus::Completed => "completed",
            DeliveryStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "assigned" => Some(DeliveryStatus::Assigned),
            "otw_to_destination" => Some(DeliveryStatus::OtwToDestination),
            "at_destination" => Some(DeliveryStatus::AtDestination),
            "otw_to_base" => Some(DeliveryStatus::OtwToBase),
            "completed" => Some(DeliveryStatus::Completed),
            "cancelled" => Some(DeliveryStatus::Cancelled),
            _ => None,
        }
    }

    /// Un estado terminal no admite más transiciones
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeliveryStatus::Completed | DeliveryStatus::Cancelled)
    }

    /// Un estado activo mantiene ocupados al driver y al vehículo
    pub fn is_active(&self) -> bool {
        !self.is_terminal()
    }
}

/// Estados que ocupan recursos, en formato SQL (`status IN (...)`)
pub const ACTIVE_STATUSES: [&str; 4] = [
    "assigned",
    "otw_to_destination",
    "at_destination",
    "otw_to_base",
];

/// Acción de transición invocada por el driver asignado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionAction {
    Start,
    Arrive,
    Return,
    Complete,
}

impl TransitionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionAction::Start => "start",
            TransitionAction::Arrive => "arrive",
            TransitionAction::Return => "return",
            TransitionAction::Complete => "complete",
        }
    }
}

/// Resultado de consultar la tabla de transiciones
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Estado requerido antes de aplicar la acción
    pub from: DeliveryStatus,
    /// Estado resultante
    pub to: DeliveryStatus,
    /// Columna timestamp que registra el momento de la transición
    pub timestamp_column: &'static str,
}

/// Tabla de transiciones del ciclo de vida.
///
/// `complete` exige haber pasado por `otw_to_base`: el atajo
/// `at_destination -> completed` que existía en una variante del sistema
/// original queda rechazado deliberadamente.
pub const TRANSITIONS: [(TransitionAction, Transition); 4] = [
    (
        TransitionAction::Start,
        Transition {
            from: DeliveryStatus::Assigned,
            to: DeliveryStatus::OtwToDestination,
            timestamp_column: "started_at",
        },
    ),
    (
        TransitionAction::Arrive,
        Transition {
            from: DeliveryStatus::OtwToDestination,
            to: DeliveryStatus::AtDestination,
            timestamp_column: "reached_destination_at",
        },
    ),
    (
        TransitionAction::Return,
        Transition {
            from: DeliveryStatus::AtDestination,
            to: DeliveryStatus::OtwToBase,
            timestamp_column: "started_return_at",
        },
    ),
    (
        TransitionAction::Complete,
        Transition {
            from: DeliveryStatus::OtwToBase,
            to: DeliveryStatus::Completed,
            timestamp_column: "completed_at",
        },
    ),
];

/// Buscar la transición para `(estado actual, acción)`.
///
/// `None` significa que el par no está en la tabla y debe rechazarse
/// con `InvalidTransition`.
pub fn lookup_transition(current: DeliveryStatus, action: TransitionAction) -> Option<Transition> {
    TRANSITIONS
        .iter()
        .find(|(a, t)| *a == action && t.from == current)
        .map(|(_, t)| *t)
}

/// Fila de `delivery_orders`
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct DeliveryOrder {
    pub id: i64,
    pub purchase_order_id: Option<i64>,
    pub driver_id: i64,
    pub vehicle_id: i64,
    pub do_number: String,
    pub customer_name: String,
    pub item_name: Option<String>,
    pub quantity: Option<Decimal>,
    pub unit_price: Option<Decimal>,
    pub total_amount: Decimal,
    pub load_location: Option<String>,
    pub unload_location: Option<String>,
    pub surat_jalan_url: Option<String>,
    pub payment_status: String,
    pub payment_type: Option<String>,
    pub deposit_amount: Decimal,
    pub invoice_amount: Option<Decimal>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub reached_destination_at: Option<DateTime<Utc>>,
    pub started_return_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl DeliveryOrder {
    /// Estado parseado; la columna está protegida por la tabla de
    /// transiciones así que un valor desconocido es corrupción de datos.
    pub fn parsed_status(&self) -> Option<DeliveryStatus> {
        DeliveryStatus::parse(&self.status)
    }
}

/// Valores permitidos de payment_status
pub const PAYMENT_STATUSES: [&str; 3] = ["lunas", "deposit", "proses_tagihan"];

/// Valores permitidos de payment_type
pub const PAYMENT_TYPES: [&str; 3] = ["cash", "transfer", "deposit"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_through_the_table() {
        let mut status = DeliveryStatus::Assigned;
        let path = [
            (TransitionAction::Start, DeliveryStatus::OtwToDestination, "started_at"),
            (TransitionAction::Arrive, DeliveryStatus::AtDestination, "reached_destination_at"),
            (TransitionAction::Return, DeliveryStatus::OtwToBase, "started_return_at"),
            (TransitionAction::Complete, DeliveryStatus::Completed, "completed_at"),
        ];

        for (action, expected, column) in path {
            let t = lookup_transition(status, action).expect("transition must exist");
            assert_eq!(t.to, expected);
            assert_eq!(t.timestamp_column, column);
            status = t.to;
        }
        assert!(status.is_terminal());
    }

    #[test]
    fn test_complete_requires_return_leg() {
        // at_destination -> completed no está permitido
        assert!(lookup_transition(DeliveryStatus::AtDestination, TransitionAction::Complete).is_none());
    }

    #[test]
    fn test_repeated_action_is_rejected() {
        let t = lookup_transition(DeliveryStatus::Assigned, TransitionAction::Start).unwrap();
        // un segundo start desde el estado resultante ya no matchea la tabla
        assert!(lookup_transition(t.to, TransitionAction::Start).is_none());
    }

    #[test]
    fn test_terminal_states_have_no_transitions() {
        for terminal in [DeliveryStatus::Completed, DeliveryStatus::Cancelled] {
            for action in [
                TransitionAction::Start,
                TransitionAction::Arrive,
                TransitionAction::Return,
                TransitionAction::Complete,
            ] {
                assert!(lookup_transition(terminal, action).is_none());
            }
        }
    }

    #[test]
    fn test_every_invalid_pair_is_rejected() {
        let states = [
            DeliveryStatus::Assigned,
            DeliveryStatus::OtwToDestination,
            DeliveryStatus::AtDestination,
            DeliveryStatus::OtwToBase,
            DeliveryStatus::Completed,
            DeliveryStatus::Cancelled,
        ];
        let actions = [
            TransitionAction::Start,
            TransitionAction::Arrive,
            TransitionAction::Return,
            TransitionAction::Complete,
        ];

        let mut valid = 0;
        for state in states {
            for action in actions {
                if lookup_transition(state, action).is_some() {
                    valid += 1;
                }
            }
        }
        // exactamente las 4 transiciones de la tabla, nada más
        assert_eq!(valid, TRANSITIONS.len());
    }

    #[test]
    fn test_status_roundtrip() {
        for s in ACTIVE_STATUSES {
            let parsed = DeliveryStatus::parse(s).unwrap();
            assert_eq!(parsed.as_str(), s);
            assert!(parsed.is_active());
        }
        assert!(DeliveryStatus::parse("unknown").is_none());
    }
}
