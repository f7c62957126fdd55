//! Collider component
//!
//! A collider is the per-object collision participant. It is created from a
//! static [`ColliderDescriptor`], then set up once its owner exists, after
//! which it is repositioned and queried every frame by
//! [`super::CollisionWorld`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::foundation::collections::{ColliderId, EntryKey};
use crate::foundation::math::{Rectangle, Vec2};
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::error::CollisionError;

/// Receives confirmed collisions for the collider it is attached to
pub trait CollisionHandler {
    /// Called once per frame for every partner that passed the filter and
    /// overlaps this collider
    fn on_collision(&mut self, other: &Collider);
}

/// Handler shared between its owner and the collider that dispatches to it
pub type SharedHandler = Rc<RefCell<dyn CollisionHandler>>;

/// The object a collider is attached to
///
/// Implemented by the entity framework; read-only from the collision side.
pub trait ColliderOwner {
    /// Current world position of the top-left corner
    fn world_position(&self) -> Vec2;

    /// Whether the object currently takes part in the scene
    fn is_active(&self) -> bool {
        true
    }

    /// Resolve a named collision handler capability
    fn collision_handler(&self, _name: &str) -> Option<SharedHandler> {
        None
    }
}

/// Collider extent, fixed at creation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Width in world units
    pub w: f32,
    /// Height in world units
    pub h: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(w: f32, h: f32) -> Self {
        Self { w, h }
    }
}

/// Static collider configuration, as declared in scene descriptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColliderDescriptor {
    /// Categories this collider belongs to
    pub flag: u32,
    /// Categories this collider reacts to
    pub mask: u32,
    /// Collider extent
    pub size: Size,
    /// Name of the handler capability to resolve on the owner
    #[serde(default)]
    pub handler: Option<String>,
}

impl ColliderDescriptor {
    /// Create a passive descriptor (no handler)
    pub const fn new(flag: u32, mask: u32, size: Size) -> Self {
        Self {
            flag,
            mask,
            size,
            handler: None,
        }
    }

    /// Name the handler capability to resolve at setup
    pub fn with_handler(mut self, name: impl Into<String>) -> Self {
        self.handler = Some(name.into());
        self
    }

    /// Reject sizes that are not strictly positive on both axes
    pub fn validate(&self) -> Result<(), CollisionError> {
        let Size { w, h } = self.size;
        if w > 0.0 && h > 0.0 {
            Ok(())
        } else {
            Err(CollisionError::InvalidSize { w, h })
        }
    }
}

/// Lifecycle stage of a collider
///
/// Removal destroys the collider, so there is no removed state to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColliderState {
    /// Created, waiting for setup
    Configured,
    /// Set up, registered and indexed
    Active,
}

/// Per-object collision participant
pub struct Collider {
    id: ColliderId,
    flag: u32,
    mask: u32,
    size: Size,
    handler_name: Option<String>,
    handler: Option<SharedHandler>,
    owner: Option<Rc<dyn ColliderOwner>>,
    entry: Option<EntryKey>,
    enabled: bool,
}

impl Collider {
    /// Build a configured collider from an already validated descriptor
    pub(crate) fn configured(id: ColliderId, descr: ColliderDescriptor) -> Self {
        Self {
            id,
            flag: descr.flag,
            mask: descr.mask,
            size: descr.size,
            handler_name: descr.handler,
            handler: None,
            owner: None,
            entry: None,
            enabled: true,
        }
    }

    /// Bind the collider to its owner, handler and index entry
    pub(crate) fn attach(
        &mut self,
        owner: Rc<dyn ColliderOwner>,
        handler: Option<SharedHandler>,
        entry: EntryKey,
    ) {
        self.owner = Some(owner);
        self.handler = handler;
        self.entry = Some(entry);
    }

    /// Identifier inside the owning world
    pub const fn id(&self) -> ColliderId {
        self.id
    }

    /// Categories this collider belongs to
    pub const fn flag(&self) -> u32 {
        self.flag
    }

    /// Categories this collider reacts to
    pub const fn mask(&self) -> u32 {
        self.mask
    }

    /// Fixed extent
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Declared handler name, if any
    pub fn handler_name(&self) -> Option<&str> {
        self.handler_name.as_deref()
    }

    /// Resolved handler; `None` for passive colliders or before setup
    pub const fn handler(&self) -> Option<&SharedHandler> {
        self.handler.as_ref()
    }

    /// Whether this collider initiates collision queries
    pub const fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Owning object, available after setup
    pub const fn owner(&self) -> Option<&Rc<dyn ColliderOwner>> {
        self.owner.as_ref()
    }

    /// Spatial index handle, available after setup
    pub const fn entry(&self) -> Option<EntryKey> {
        self.entry
    }

    /// Component-level enabled flag
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Lifecycle stage
    pub const fn state(&self) -> ColliderState {
        if self.entry.is_some() {
            ColliderState::Active
        } else {
            ColliderState::Configured
        }
    }

    /// Enabled, set up, and owned by an active object
    pub fn is_participating(&self) -> bool {
        self.enabled && self.owner.as_ref().is_some_and(|owner| owner.is_active())
    }

    /// Current collision area from the owner's live position
    ///
    /// Recomputed on every call; `None` before setup.
    pub fn area(&self) -> Option<Rectangle> {
        self.owner
            .as_ref()
            .map(|owner| Rectangle::from_position(owner.world_position(), self.size.w, self.size.h))
    }

    /// Whether this collider's mask selects `other`'s categories
    pub const fn reacts_to(&self, other: &Self) -> bool {
        CollisionLayers::reacts_to(self.mask, other.flag)
    }

    /// Filter and narrow phase for one broad-phase candidate
    ///
    /// Only this collider's mask is consulted; `other` runs its own test on
    /// its own pass.
    pub fn test_collision(&self, other: &Self) -> bool {
        if other.id == self.id || !other.is_participating() || !self.reacts_to(other) {
            return false;
        }

        match (self.area(), other.area()) {
            (Some(mine), Some(theirs)) => mine.intersects_with(&theirs),
            _ => false,
        }
    }
}

impl fmt::Debug for Collider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collider")
            .field("id", &self.id)
            .field("flag", &self.flag)
            .field("mask", &self.mask)
            .field("size", &self.size)
            .field("handler", &self.handler_name)
            .field("state", &self.state())
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;
    use std::cell::Cell;

    struct Marker {
        position: Cell<Vec2>,
        active: Cell<bool>,
    }

    impl Marker {
        fn at(x: f32, y: f32) -> Rc<Self> {
            Rc::new(Self {
                position: Cell::new(Vec2::new(x, y)),
                active: Cell::new(true),
            })
        }
    }

    impl ColliderOwner for Marker {
        fn world_position(&self) -> Vec2 {
            self.position.get()
        }

        fn is_active(&self) -> bool {
            self.active.get()
        }
    }

    fn attached(
        ids: &mut SlotMap<ColliderId, ()>,
        entries: &mut SlotMap<EntryKey, ()>,
        descr: ColliderDescriptor,
        owner: Rc<Marker>,
    ) -> Collider {
        descr.validate().unwrap();
        let mut collider = Collider::configured(ids.insert(()), descr);
        collider.attach(owner, None, entries.insert(()));
        collider
    }

    #[test]
    fn test_descriptor_rejects_non_positive_size() {
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (f32::NAN, 4.0)] {
            let result = ColliderDescriptor::new(1, 1, Size::new(w, h)).validate();
            assert!(matches!(result, Err(CollisionError::InvalidSize { .. })));
        }
        assert!(ColliderDescriptor::new(1, 1, Size::new(0.5, 0.5)).validate().is_ok());
    }

    #[test]
    fn test_area_follows_owner() {
        let mut ids = SlotMap::with_key();
        let mut entries = SlotMap::with_key();
        let owner = Marker::at(3.0, 4.0);
        let collider = attached(
            &mut ids,
            &mut entries,
            ColliderDescriptor::new(1, 1, Size::new(10.0, 20.0)),
            owner.clone(),
        );

        assert_eq!(collider.area(), Some(Rectangle::new(3.0, 4.0, 10.0, 20.0)));
        owner.position.set(Vec2::new(30.0, 40.0));
        assert_eq!(collider.area(), Some(Rectangle::new(30.0, 40.0, 10.0, 20.0)));
        assert_eq!(collider.state(), ColliderState::Active);
    }

    #[test]
    fn test_configured_collider_has_no_area() {
        let mut ids: SlotMap<ColliderId, ()> = SlotMap::with_key();
        let collider = Collider::configured(ids.insert(()), ColliderDescriptor::new(1, 1, Size::new(1.0, 1.0)));

        assert_eq!(collider.state(), ColliderState::Configured);
        assert!(collider.area().is_none());
        assert!(!collider.is_participating());
    }

    #[test]
    fn test_collision_filter_is_one_way() {
        let mut ids = SlotMap::with_key();
        let mut entries = SlotMap::with_key();
        let a = attached(
            &mut ids,
            &mut entries,
            ColliderDescriptor::new(1, 2, Size::new(10.0, 10.0)),
            Marker::at(0.0, 0.0),
        );
        let b = attached(
            &mut ids,
            &mut entries,
            ColliderDescriptor::new(4, 1, Size::new(10.0, 10.0)),
            Marker::at(5.0, 5.0),
        );

        assert!(!a.test_collision(&b));
        assert!(b.test_collision(&a));
        assert!(!a.test_collision(&a));
    }

    #[test]
    fn test_collision_skips_inactive_and_disabled() {
        let mut ids = SlotMap::with_key();
        let mut entries = SlotMap::with_key();
        let b_owner = Marker::at(5.0, 5.0);
        let a = attached(
            &mut ids,
            &mut entries,
            ColliderDescriptor::new(1, 2, Size::new(10.0, 10.0)),
            Marker::at(0.0, 0.0),
        );
        let mut b = attached(
            &mut ids,
            &mut entries,
            ColliderDescriptor::new(2, 1, Size::new(10.0, 10.0)),
            b_owner.clone(),
        );
        assert!(a.test_collision(&b));

        b_owner.active.set(false);
        assert!(!a.test_collision(&b));

        b_owner.active.set(true);
        b.set_enabled(false);
        assert!(!a.test_collision(&b));
    }

    #[test]
    fn test_descriptor_from_ron() {
        let descr: ColliderDescriptor =
            ron::from_str(r#"(flag: 2, mask: 1, size: (w: 32.0, h: 24.0), handler: Some("Chicken"))"#)
                .unwrap();

        assert_eq!(
            descr,
            ColliderDescriptor::new(2, 1, Size::new(32.0, 24.0)).with_handler("Chicken")
        );

        let passive: ColliderDescriptor =
            ron::from_str("(flag: 4, mask: 0, size: (w: 8.0, h: 8.0))").unwrap();
        assert!(passive.handler.is_none());
    }
}
