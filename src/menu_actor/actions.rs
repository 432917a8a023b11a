//! Custom actions for the Menu actor.

#[derive(Debug, Clone)]
pub enum MenuItemAction {
    /// Switches an item on or off without touching the rest of the record.
    SetAvailability(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuItemActionResult {
    /// Previous availability.
    SetAvailability(bool),
}
