//! Handle types for arena-backed storage
//!
//! Colliders and spatial index entries refer to each other through these
//! keys instead of references, so neither side owns the other.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Handle to an entry stored in a [`crate::spatial::Quadtree`]
    pub struct EntryKey;

    /// Handle to a collider owned by a [`crate::physics::CollisionWorld`]
    pub struct ColliderId;
}
