//! Error types for the Menu actor.

use crate::model::MenuItemId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum MenuError {
    #[error("Menu item not found: {0}")]
    NotFound(String),

    /// The item exists but is switched off on the menu.
    #[error("Menu item {0} is not available")]
    Unavailable(MenuItemId),

    #[error("Menu item validation error: {0}")]
    ValidationError(String),

    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for MenuError {
    fn from(msg: String) -> Self {
        MenuError::ActorCommunicationError(msg)
    }
}
