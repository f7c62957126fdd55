//! Collision world tests
//!
//! Shared fixtures: an owner whose position and active flag can be changed
//! between frames, and a handler that records every partner it is given.

mod lifecycle;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::foundation::math::Vec2;
use crate::physics::{
    Collider, ColliderDescriptor, ColliderId, ColliderOwner, CollisionHandler, CollisionWorld,
    SharedHandler, Size,
};

pub(super) const HANDLER: &str = "Recorder";

#[derive(Default)]
pub(super) struct Recorder {
    pub hits: Vec<ColliderId>,
}

impl Recorder {
    pub fn take(&mut self) -> Vec<ColliderId> {
        std::mem::take(&mut self.hits)
    }
}

impl CollisionHandler for Recorder {
    fn on_collision(&mut self, other: &Collider) {
        self.hits.push(other.id());
    }
}

pub(super) struct TestOwner {
    pub position: Cell<Vec2>,
    pub active: Cell<bool>,
    pub handler: Option<SharedHandler>,
}

impl TestOwner {
    pub fn move_to(&self, x: f32, y: f32) {
        self.position.set(Vec2::new(x, y));
    }
}

impl ColliderOwner for TestOwner {
    fn world_position(&self) -> Vec2 {
        self.position.get()
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn collision_handler(&self, name: &str) -> Option<SharedHandler> {
        if name == HANDLER {
            self.handler.clone()
        } else {
            None
        }
    }
}

pub(super) struct Spawned {
    pub id: ColliderId,
    pub owner: Rc<TestOwner>,
    pub recorder: Option<Rc<RefCell<Recorder>>>,
}

impl Spawned {
    /// Partners reported since the last call
    pub fn take_hits(&self) -> Vec<ColliderId> {
        self.recorder
            .as_ref()
            .map(|recorder| recorder.borrow_mut().take())
            .unwrap_or_default()
    }
}

/// Create and set up a collider at `(x, y)`
pub(super) fn spawn(
    world: &mut CollisionWorld,
    flag: u32,
    mask: u32,
    position: (f32, f32),
    size: (f32, f32),
    with_handler: bool,
) -> Spawned {
    let mut descr = ColliderDescriptor::new(flag, mask, Size::new(size.0, size.1));
    let recorder = with_handler.then(|| Rc::new(RefCell::new(Recorder::default())));
    if with_handler {
        descr = descr.with_handler(HANDLER);
    }

    let owner = Rc::new(TestOwner {
        position: Cell::new(Vec2::new(position.0, position.1)),
        active: Cell::new(true),
        handler: recorder.clone().map(|recorder| recorder as SharedHandler),
    });

    let id = world.create_collider(descr).unwrap();
    world.setup_collider(id, owner.clone()).unwrap();

    Spawned { id, owner, recorder }
}
