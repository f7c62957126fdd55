//! Scene-scoped collision context
//!
//! [`CollisionWorld`] owns everything one scene needs for collision
//! detection: the quadtree broad phase, the collider arena and the ordered
//! registry. Nothing is global, so several worlds can live side by side.
//!
//! A frame first repositions every participating index entry, then each
//! collider with a handler runs its own pass: gather broad-phase candidates,
//! filter them by category and enabled/active state, then run the rectangle
//! test and dispatch.

use std::rc::Rc;

use slotmap::SlotMap;

use crate::config::{BroadPhase, CollisionConfig, Config, ConfigError};
use crate::foundation::collections::ColliderId;
use crate::foundation::math::Rectangle;
use crate::physics::collider::{Collider, ColliderDescriptor, ColliderOwner, SharedHandler};
use crate::physics::error::CollisionError;
use crate::physics::registry::ColliderRegistry;
use crate::spatial::Quadtree;

/// Collision state for one scene
pub struct CollisionWorld {
    /// Broad-phase index; entries point back at their collider
    index: Quadtree<ColliderId>,

    /// Every created collider, set up or not
    colliders: SlotMap<ColliderId, Collider>,

    /// Set-up colliders in setup order
    registry: ColliderRegistry,

    config: CollisionConfig,
}

impl CollisionWorld {
    /// Create a world without validating the configuration
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            index: Quadtree::new(config.world.as_rectangle(), config.quadtree.clone()),
            colliders: SlotMap::with_key(),
            registry: ColliderRegistry::new(),
            config,
        }
    }

    /// Create a world after validating the configuration
    pub fn from_config(config: CollisionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Store a collider's static configuration
    ///
    /// Fails with [`CollisionError::InvalidSize`] for non-positive sizes.
    pub fn create_collider(&mut self, descr: ColliderDescriptor) -> Result<ColliderId, CollisionError> {
        if let Err(err) = descr.validate() {
            log::warn!("Rejected collider descriptor {:?}: {}", descr, err);
            return Err(err);
        }

        Ok(self.colliders.insert_with_key(|id| Collider::configured(id, descr)))
    }

    /// Bind a configured collider to its owner
    ///
    /// Resolves the declared handler, reads the owner's position, inserts the
    /// index entry and registers the collider. A missing handler is a
    /// configuration error and leaves the collider configured.
    pub fn setup_collider(
        &mut self,
        id: ColliderId,
        owner: Rc<dyn ColliderOwner>,
    ) -> Result<(), CollisionError> {
        let collider = self
            .colliders
            .get_mut(id)
            .ok_or(CollisionError::UnknownCollider(id))?;
        if collider.entry().is_some() {
            return Err(CollisionError::AlreadySetUp(id));
        }

        let handler = match collider.handler_name() {
            Some(name) => match owner.collision_handler(name) {
                Some(handler) => Some(handler),
                None => {
                    log::warn!("Collider {:?} declares handler '{}' but its owner has none", id, name);
                    return Err(CollisionError::MissingHandler(name.to_string()));
                }
            },
            None => None,
        };

        let size = collider.size();
        let area = Rectangle::from_position(owner.world_position(), size.w, size.h);
        let entry = self.index.insert(area, id);
        collider.attach(owner, handler, entry);
        self.registry.register(id);

        log::debug!("Collider {:?} set up at ({}, {})", id, area.x, area.y);
        Ok(())
    }

    /// Update for one collider driven outside of [`Self::step`]
    ///
    /// Syncs the index entry with the owner's position, then, for colliders
    /// with a handler, dispatches `on_collision` for every overlapping
    /// candidate that passes the filter. Candidate order is unspecified.
    /// Disabled colliders and colliders with an inactive owner are skipped.
    ///
    /// Only this collider's entry is synced. Partners that moved since their
    /// own last sync are still bucketed at their old position, so a caller
    /// driving colliders one by one sees partners in update order.
    pub fn update_collider(&mut self, id: ColliderId) -> Result<(), CollisionError> {
        let collider = self.colliders.get(id).ok_or(CollisionError::UnknownCollider(id))?;
        if collider.entry().is_none() {
            return Err(CollisionError::NotSetUp(id));
        }
        if !collider.is_participating() {
            log::trace!("Collider {:?} skipped: disabled or inactive owner", id);
            return Ok(());
        }

        self.sync_entry(id);
        self.dispatch(id)
    }

    /// Move the index entry of a set-up collider to its owner's position
    fn sync_entry(&mut self, id: ColliderId) {
        let Some(collider) = self.colliders.get(id) else {
            return;
        };
        if let (Some(owner), Some(entry)) = (collider.owner(), collider.entry()) {
            let position = owner.world_position();
            self.index.update_position(entry, position.x, position.y);
        }
    }

    /// Collision pass for one participating collider with a handler
    fn dispatch(&self, id: ColliderId) -> Result<(), CollisionError> {
        let collider = self.colliders.get(id).ok_or(CollisionError::UnknownCollider(id))?;
        match collider.handler() {
            Some(handler) if collider.is_participating() => self.check_collisions(id, handler),
            _ => Ok(()),
        }
    }

    /// Broad phase, filter, narrow phase and dispatch for one observer
    fn check_collisions(&self, id: ColliderId, handler: &SharedHandler) -> Result<(), CollisionError> {
        let collider = self.colliders.get(id).ok_or(CollisionError::UnknownCollider(id))?;
        let candidates = self.candidates(collider);

        let mut handler = handler
            .try_borrow_mut()
            .map_err(|_| CollisionError::HandlerBusy(id))?;

        for other in candidates.into_iter().filter_map(|other| self.colliders.get(other)) {
            if collider.test_collision(other) {
                handler.on_collision(other);
            }
        }

        Ok(())
    }

    fn candidates(&self, collider: &Collider) -> Vec<ColliderId> {
        match self.config.broad_phase {
            BroadPhase::Quadtree => collider
                .entry()
                .map(|entry| {
                    self.index
                        .query_overlapping(entry)
                        .into_iter()
                        .filter_map(|key| self.index.get(key).map(|e| e.owner))
                        .collect()
                })
                .unwrap_or_default(),
            // Same visibility rule as the quadtree: off-plane entries are never candidates
            BroadPhase::BruteForce => self
                .registry
                .iter()
                .filter(|&id| {
                    self.colliders
                        .get(id)
                        .and_then(Collider::entry)
                        .and_then(|entry| self.index.get(entry))
                        .is_some_and(|entry| entry.is_indexed())
                })
                .collect(),
        }
    }

    /// Run one frame over every registered collider
    ///
    /// All participating entries are synced with their owners first, then
    /// collision passes run in setup order, so every pass sees this frame's
    /// positions. A failing collider does not stop the frame; the first
    /// error is returned once every collider has been updated.
    pub fn step(&mut self) -> Result<(), CollisionError> {
        let order: Vec<ColliderId> = self.registry.iter().collect();

        for &id in &order {
            if self.colliders.get(id).is_some_and(Collider::is_participating) {
                self.sync_entry(id);
            }
        }

        let mut first_error = None;
        for id in order {
            if let Err(err) = self.dispatch(id) {
                log::error!("Collision update failed for {:?}: {}", id, err);
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Destroy a collider, freeing its index entry and registry slot
    pub fn remove_collider(&mut self, id: ColliderId) -> Result<(), CollisionError> {
        let collider = self
            .colliders
            .remove(id)
            .ok_or(CollisionError::UnknownCollider(id))?;

        if let Some(entry) = collider.entry() {
            self.index.remove(entry);
        }
        self.registry.unregister(id);

        log::debug!("Collider {:?} removed", id);
        Ok(())
    }

    /// Toggle the component-level enabled flag
    ///
    /// Enabling resyncs the index entry, which went stale while disabled.
    pub fn set_enabled(&mut self, id: ColliderId, enabled: bool) -> Result<(), CollisionError> {
        self.colliders
            .get_mut(id)
            .ok_or(CollisionError::UnknownCollider(id))?
            .set_enabled(enabled);
        if enabled {
            self.sync_entry(id);
        }
        Ok(())
    }

    /// Current collision area of a set-up collider
    pub fn area(&self, id: ColliderId) -> Result<Rectangle, CollisionError> {
        self.colliders
            .get(id)
            .ok_or(CollisionError::UnknownCollider(id))?
            .area()
            .ok_or(CollisionError::NotSetUp(id))
    }

    /// Look up a collider
    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    /// Registered colliders in setup order
    pub fn colliders(&self) -> impl Iterator<Item = &Collider> + '_ {
        self.registry.iter().filter_map(|id| self.colliders.get(id))
    }

    /// Number of live colliders, configured or active
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Number of entries held by the spatial index
    pub fn entry_count(&self) -> usize {
        self.index.entry_count()
    }

    /// Ordered registry of set-up colliders
    pub const fn registry(&self) -> &ColliderRegistry {
        &self.registry
    }

    /// Spatial index (for visualization)
    pub const fn index(&self) -> &Quadtree<ColliderId> {
        &self.index
    }

    /// Configuration in use
    pub const fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Drop every collider and index entry
    pub fn clear(&mut self) {
        self.index.clear();
        self.colliders.clear();
        self.registry.clear();
    }
}

impl Default for CollisionWorld {
    fn default() -> Self {
        Self::new(CollisionConfig::default())
    }
}
