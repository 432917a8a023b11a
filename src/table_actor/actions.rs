//! Custom actions for the Table actor.

use crate::model::TableStatus;

#[derive(Debug, Clone)]
pub enum TableAction {
    /// Someone sat down (or ordered from) the table.
    Occupy,
    /// The table is free again.
    Release,
    /// Front-of-house override, e.g. a reservation.
    SetStatus(TableStatus),
}

/// Results from TableActions; each carries the status before the action.
#[derive(Debug, Clone, PartialEq)]
pub enum TableActionResult {
    Occupy(TableStatus),
    Release(TableStatus),
    SetStatus(TableStatus),
}
