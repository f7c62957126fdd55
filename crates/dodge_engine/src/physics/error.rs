//! Collision subsystem errors

use crate::foundation::collections::ColliderId;

/// Errors raised by collider lifecycle operations
///
/// Each error aborts only the call for the offending collider; the rest of
/// the scene keeps running.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CollisionError {
    /// Collider size must be strictly positive on both axes
    #[error("Invalid collider size {w}x{h}: both dimensions must be positive")]
    InvalidSize {
        /// Requested width
        w: f32,
        /// Requested height
        h: f32,
    },

    /// A handler name was declared but the owner does not provide it
    #[error("Collision handler '{0}' not found on owner")]
    MissingHandler(String),

    /// The id does not refer to a live collider
    #[error("Unknown collider {0:?}")]
    UnknownCollider(ColliderId),

    /// Operation requires a collider that went through setup
    #[error("Collider {0:?} has not been set up")]
    NotSetUp(ColliderId),

    /// Setup was already performed for this collider
    #[error("Collider {0:?} is already set up")]
    AlreadySetUp(ColliderId),

    /// The collider's handler was borrowed elsewhere during dispatch
    #[error("Collision handler of collider {0:?} is already borrowed")]
    HandlerBusy(ColliderId),
}
