//! Ordered registry of set-up colliders
//!
//! Scoped to one [`super::CollisionWorld`]. Drives the per-frame update order
//! and serves as the candidate list for the brute-force broad phase.

use crate::foundation::collections::ColliderId;

/// Colliders in the order they were set up
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    order: Vec<ColliderId>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { order: Vec::new() }
    }

    /// Append a collider, ignoring duplicates
    pub fn register(&mut self, id: ColliderId) -> bool {
        if self.contains(id) {
            return false;
        }
        self.order.push(id);
        true
    }

    /// Remove a collider, keeping the order of the others
    pub fn unregister(&mut self, id: ColliderId) -> bool {
        match self.order.iter().position(|&registered| registered == id) {
            Some(index) => {
                self.order.remove(index);
                true
            }
            None => false,
        }
    }

    /// Whether the collider is registered
    pub fn contains(&self, id: ColliderId) -> bool {
        self.order.contains(&id)
    }

    /// Registered colliders in setup order
    pub fn iter(&self) -> impl Iterator<Item = ColliderId> + '_ {
        self.order.iter().copied()
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget every collider
    pub fn clear(&mut self) {
        self.order.clear();
    }
}
