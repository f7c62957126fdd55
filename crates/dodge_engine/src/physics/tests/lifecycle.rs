//! Create / setup / remove transitions and index bookkeeping

use std::cell::Cell;
use std::rc::Rc;

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{spawn, TestOwner};
use crate::config::{CollisionConfig, ConfigError};
use crate::foundation::math::Vec2;
use crate::physics::{ColliderDescriptor, ColliderState, CollisionError, CollisionWorld, Size};

fn owner_at(x: f32, y: f32) -> Rc<TestOwner> {
    Rc::new(TestOwner {
        position: Cell::new(Vec2::new(x, y)),
        active: Cell::new(true),
        handler: None,
    })
}

#[test]
fn test_create_rejects_invalid_size() {
    let mut world = CollisionWorld::default();
    let result = world.create_collider(ColliderDescriptor::new(1, 1, Size::new(0.0, 5.0)));

    assert_eq!(result, Err(CollisionError::InvalidSize { w: 0.0, h: 5.0 }));
    assert_eq!(world.collider_count(), 0);
}

#[test]
fn test_missing_handler_is_a_configuration_error() {
    let mut world = CollisionWorld::default();
    let id = world
        .create_collider(ColliderDescriptor::new(1, 1, Size::new(5.0, 5.0)).with_handler("Player"))
        .unwrap();

    let result = world.setup_collider(id, owner_at(0.0, 0.0));

    assert_eq!(result, Err(CollisionError::MissingHandler("Player".to_string())));
    assert_eq!(world.collider(id).map(|c| c.state()), Some(ColliderState::Configured));
    assert_eq!(world.entry_count(), 0);
    assert!(world.registry().is_empty());

    // The rest of the scene is unaffected
    let other = spawn(&mut world, 1, 1, (0.0, 0.0), (5.0, 5.0), false);
    assert!(world.registry().contains(other.id));
}

#[test]
fn test_setup_registers_and_indexes_once() {
    let mut world = CollisionWorld::default();
    let id = world
        .create_collider(ColliderDescriptor::new(1, 1, Size::new(16.0, 8.0)))
        .unwrap();
    assert_eq!(world.collider(id).map(|c| c.state()), Some(ColliderState::Configured));
    assert_eq!(world.area(id), Err(CollisionError::NotSetUp(id)));
    assert_eq!(world.update_collider(id), Err(CollisionError::NotSetUp(id)));

    let owner = owner_at(40.0, 60.0);
    world.setup_collider(id, owner.clone()).unwrap();
    assert_eq!(
        world.setup_collider(id, owner.clone()),
        Err(CollisionError::AlreadySetUp(id))
    );

    assert_eq!(world.collider(id).map(|c| c.state()), Some(ColliderState::Active));
    assert_eq!(world.entry_count(), 1);
    assert_eq!(world.registry().len(), 1);

    let area = world.area(id).unwrap();
    assert_relative_eq!(area.x, 40.0);
    assert_relative_eq!(area.y, 60.0);
    assert_relative_eq!(area.width, 16.0);
    assert_relative_eq!(area.height, 8.0);

    // Area is live, not cached
    owner.move_to(41.5, 60.0);
    assert_relative_eq!(world.area(id).unwrap().x, 41.5);
}

#[test]
fn test_update_syncs_index_entry() {
    let mut world = CollisionWorld::default();
    let spawned = spawn(&mut world, 1, 1, (10.0, 10.0), (4.0, 4.0), false);
    spawned.owner.move_to(400.0, 700.0);

    world.update_collider(spawned.id).unwrap();

    let entry = world.collider(spawned.id).and_then(|c| c.entry()).unwrap();
    let stored = world.index().get(entry).unwrap();
    assert_relative_eq!(stored.rect.x, 400.0);
    assert_relative_eq!(stored.rect.y, 700.0);
    assert_eq!(stored.owner, spawned.id);
}

#[test]
fn test_remove_unknown_collider() {
    let mut world = CollisionWorld::default();
    let spawned = spawn(&mut world, 1, 1, (0.0, 0.0), (4.0, 4.0), false);

    world.remove_collider(spawned.id).unwrap();

    assert_eq!(
        world.remove_collider(spawned.id),
        Err(CollisionError::UnknownCollider(spawned.id))
    );
    assert_eq!(
        world.update_collider(spawned.id),
        Err(CollisionError::UnknownCollider(spawned.id))
    );
    assert_eq!(
        world.set_enabled(spawned.id, false),
        Err(CollisionError::UnknownCollider(spawned.id))
    );
}

#[test]
fn test_entry_count_tracks_live_colliders() {
    let mut world = CollisionWorld::default();
    let mut rng = StdRng::seed_from_u64(99);
    let mut live = Vec::new();
    let mut configured_only = 0usize;

    for _ in 0..400 {
        match rng.gen_range(0..4) {
            0 | 1 => {
                // Positions may fall outside the plane; the entry still exists
                let x = rng.gen_range(-50.0..620.0);
                let y = rng.gen_range(-50.0..800.0);
                live.push(spawn(&mut world, 1, 1, (x, y), (8.0, 8.0), rng.gen_bool(0.5)));
            }
            2 if !live.is_empty() => {
                let index = rng.gen_range(0..live.len());
                let removed = live.swap_remove(index);
                world.remove_collider(removed.id).unwrap();
            }
            2 => {}
            _ => {
                world
                    .create_collider(ColliderDescriptor::new(1, 1, Size::new(2.0, 2.0)))
                    .unwrap();
                configured_only += 1;
            }
        }

        world.step().unwrap();
        assert_eq!(world.entry_count(), live.len());
        assert_eq!(world.registry().len(), live.len());
        assert_eq!(world.collider_count(), live.len() + configured_only);
    }

    let in_plane = live
        .iter()
        .filter(|spawned| {
            let p = spawned.owner.position.get();
            world.index().bounds().contains_point(p)
        })
        .count();
    assert_eq!(world.index().indexed_count(), in_plane);
}

#[test]
fn test_from_config_validates() {
    let bad = CollisionConfig::default().with_world(-1.0, 10.0);
    assert!(matches!(CollisionWorld::from_config(bad), Err(ConfigError::Invalid(_))));

    let world = CollisionWorld::from_config(CollisionConfig::default()).unwrap();
    assert_eq!(world.config().quadtree.max_entries_per_node, 3);
}

#[test]
fn test_clear_drops_everything() {
    let mut world = CollisionWorld::default();
    for i in 0..10 {
        spawn(&mut world, 1, 1, (i as f32 * 20.0, 0.0), (8.0, 8.0), true);
    }

    world.clear();

    assert_eq!(world.collider_count(), 0);
    assert_eq!(world.entry_count(), 0);
    assert!(world.registry().is_empty());
    assert_eq!(world.colliders().count(), 0);
}
