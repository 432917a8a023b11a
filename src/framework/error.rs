//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity errors cross the channel boxed
//! inside [`FrameworkError::EntityError`]; typed clients recover them with
//! [`FrameworkError::downcast_entity`].

#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error carried by `EntityError`.
    ///
    /// Returns `Err(self)` unchanged for every other variant, or when the boxed
    /// error is not an `E`.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(err) => Ok(*err),
                Err(inner) => Err(FrameworkError::EntityError(inner)),
            },
            other => Err(other),
        }
    }
}
