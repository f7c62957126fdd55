//! # Dodge Engine
//!
//! Collision detection for 2D arcade games built around a bucketed quadtree.
//!
//! ## Features
//!
//! - **Broad Phase**: Quadtree over a fixed playfield with a tunable bucket size
//! - **Narrow Phase**: Open axis-aligned rectangle intersection
//! - **Category Filtering**: One-way flag/mask filtering per collider
//! - **Scene Scoped**: All state lives in a [`physics::CollisionWorld`], no globals
//!
//! ## Quick Start
//!
//! ```rust
//! use std::cell::{Cell, RefCell};
//! use std::rc::Rc;
//! use dodge_engine::prelude::*;
//!
//! struct Hits(u32);
//!
//! impl CollisionHandler for Hits {
//!     fn on_collision(&mut self, _other: &Collider) {
//!         self.0 += 1;
//!     }
//! }
//!
//! struct Sprite {
//!     position: Cell<Vec2>,
//!     handler: Option<SharedHandler>,
//! }
//!
//! impl ColliderOwner for Sprite {
//!     fn world_position(&self) -> Vec2 {
//!         self.position.get()
//!     }
//!
//!     fn collision_handler(&self, _name: &str) -> Option<SharedHandler> {
//!         self.handler.clone()
//!     }
//! }
//!
//! fn main() -> Result<(), CollisionError> {
//!     let mut world = CollisionWorld::new(CollisionConfig::default());
//!     let hits = Rc::new(RefCell::new(Hits(0)));
//!
//!     let player = world.create_collider(
//!         ColliderDescriptor::new(1, 2, Size::new(10.0, 10.0)).with_handler("Player"),
//!     )?;
//!     let player_owner = Rc::new(Sprite {
//!         position: Cell::new(Vec2::new(0.0, 0.0)),
//!         handler: Some(hits.clone()),
//!     });
//!     world.setup_collider(player, player_owner)?;
//!
//!     let chicken = world.create_collider(ColliderDescriptor::new(2, 1, Size::new(10.0, 10.0)))?;
//!     let chicken_owner = Rc::new(Sprite {
//!         position: Cell::new(Vec2::new(5.0, 5.0)),
//!         handler: None,
//!     });
//!     world.setup_collider(chicken, chicken_owner)?;
//!
//!     world.step()?;
//!     assert_eq!(hits.borrow().0, 1);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{BroadPhase, CollisionConfig, Config, ConfigError, WorldBounds},
        foundation::math::{Rectangle, Vec2},
        physics::{
            Collider, ColliderDescriptor, ColliderId, ColliderOwner, ColliderState,
            CollisionError, CollisionHandler, CollisionLayers, CollisionWorld, SharedHandler,
            Size,
        },
        spatial::{EntryKey, Quadtree, QuadtreeConfig},
    };
}
