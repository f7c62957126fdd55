//! Physics module for collision detection
//!
//! Provides quadtree broad-phase queries, rectangle narrow-phase tests and
//! flag/mask category filtering. Collisions are reported to handlers only;
//! there is no collision response.

pub mod collider;
pub mod collision_layers;
pub mod collision_system;
pub mod error;
pub mod registry;

#[cfg(test)]
mod tests;

pub use crate::foundation::collections::ColliderId;
pub use collider::{
    Collider, ColliderDescriptor, ColliderOwner, ColliderState, CollisionHandler, SharedHandler,
    Size,
};
pub use collision_layers::CollisionLayers;
pub use collision_system::CollisionWorld;
pub use error::CollisionError;
pub use registry::ColliderRegistry;
