//! Dining tables. The core only ever changes `status`.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

entity_id!(
    /// Type-safe identifier for Tables.
    TableId,
    "table"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableStatus {
    Empty,
    Occupied,
    Reserved,
}

impl Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TableStatus::Empty => "Empty",
            TableStatus::Occupied => "Occupied",
            TableStatus::Reserved => "Reserved",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub area: String,
    pub status: TableStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCreate {
    pub name: String,
    pub area: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableUpdate {
    pub name: Option<String>,
    pub area: Option<String>,
}
