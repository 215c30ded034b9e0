use thiserror::Error;

use crate::id_generator::ShapeId;

/// Errors that can occur during transform state transitions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// A gesture was started without an attached shape
    #[error("Cannot start {gesture}: no shape is attached")]
    NotAttached { gesture: &'static str },

    /// A second gesture was started before the first one ended
    #[error("Cannot start {requested} while {active} is in progress")]
    GestureInProgress {
        active: &'static str,
        requested: &'static str,
    },

    /// The attached id no longer resolves to a shape
    #[error("Shape {0} is not in the scene")]
    UnknownShape(ShapeId),
}
