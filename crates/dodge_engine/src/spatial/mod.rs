//! Spatial partitioning data structures
//!
//! Provides the quadtree used as the collision broad phase.

mod quadtree;

pub use crate::foundation::collections::EntryKey;
pub use quadtree::{Quadtree, QuadtreeConfig, QuadtreeEntry, QuadtreeNode};
