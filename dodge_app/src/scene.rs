//! Headless ChickenDodge scene
//!
//! Chickens fall from the top of the playfield and peck the player; rupees
//! sit still until the player picks them up. Everything is driven through a
//! single [`CollisionWorld`].

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dodge_engine::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

const PLAYER_SIZE: Size = Size::new(28.0, 40.0);
const CHICKEN_SIZE: Size = Size::new(24.0, 24.0);
const RUPEE_SIZE: Size = Size::new(12.0, 18.0);

const PLAYER_MARGIN: f32 = 8.0;
const PLAYER_SPEED: f32 = 4.0;
const CHICKEN_SPEED: f32 = 3.0;
const CHICKEN_SPAWN_INTERVAL: u32 = 20;
const RUPEE_COUNT: usize = 12;

/// Scene construction errors
#[derive(Debug, Error)]
pub enum SceneError {
    /// The playfield cannot hold the sprites
    #[error("Playfield {width}x{height} is too small, need more than {min_width}x{min_height}")]
    PlayfieldTooSmall {
        /// Configured width
        width: f32,
        /// Configured height
        height: f32,
        /// Smallest usable width (exclusive)
        min_width: f32,
        /// Smallest usable height (exclusive)
        min_height: f32,
    },

    /// Collider creation or setup failed
    #[error(transparent)]
    Collision(#[from] CollisionError),
}

/// What an actor is in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    /// The controllable character
    Player,
    /// Falling hazard
    Chicken,
    /// Static collectible
    Rupee,
}

/// Scene object owning a collider
pub struct Actor {
    kind: ActorKind,
    position: Cell<Vec2>,
    velocity: Cell<Vec2>,
    active: Cell<bool>,
    handler: Option<SharedHandler>,
}

impl Actor {
    fn new(kind: ActorKind, position: Vec2, velocity: Vec2, handler: Option<SharedHandler>) -> Rc<Self> {
        Rc::new(Self {
            kind,
            position: Cell::new(position),
            velocity: Cell::new(velocity),
            active: Cell::new(true),
            handler,
        })
    }

    fn advance(&self) {
        self.position.set(self.position.get() + self.velocity.get());
    }
}

impl ColliderOwner for Actor {
    fn world_position(&self) -> Vec2 {
        self.position.get()
    }

    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn collision_handler(&self, name: &str) -> Option<SharedHandler> {
        match (self.kind, name) {
            (ActorKind::Player, "Player") | (ActorKind::Chicken, "Chicken") => self.handler.clone(),
            _ => None,
        }
    }
}

/// Player side of collisions: collect rupees, lose lives to chickens
#[derive(Debug, Default)]
pub struct PlayerHandler {
    /// Rupees collected
    pub score: u32,
    /// Chicken contacts
    pub hits: u32,
    picked: Vec<ColliderId>,
}

impl CollisionHandler for PlayerHandler {
    fn on_collision(&mut self, other: &Collider) {
        if other.flag() & CollisionLayers::PICKUP != 0 {
            self.score += 1;
            self.picked.push(other.id());
            log::info!("Rupee {:?} collected, score {}", other.id(), self.score);
        } else if other.flag() & CollisionLayers::ENEMY != 0 {
            self.hits += 1;
            log::debug!("Player touched chicken {:?}", other.id());
        }
    }
}

/// Chicken side of collisions
#[derive(Debug, Default)]
pub struct ChickenHandler {
    /// Frames spent pecking the player
    pub pecks: u32,
}

impl CollisionHandler for ChickenHandler {
    fn on_collision(&mut self, other: &Collider) {
        self.pecks += 1;
        log::trace!("Chicken pecked {:?}", other.id());
    }
}

/// End-of-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Frames simulated
    pub frames: u32,
    /// Rupees collected by the player
    pub score: u32,
    /// Player-side chicken contacts
    pub player_hits: u32,
    /// Chicken-side contacts
    pub pecks: u32,
    /// Chickens spawned
    pub chickens_spawned: u32,
    /// Chickens removed after leaving the playfield
    pub chickens_removed: u32,
}

/// Headless game scene
pub struct DodgeScene {
    world: CollisionWorld,
    actors: Vec<(ColliderId, Rc<Actor>)>,
    player: Rc<Actor>,
    player_handler: Rc<RefCell<PlayerHandler>>,
    chicken_handler: Rc<RefCell<ChickenHandler>>,
    rng: StdRng,
    stats: SceneStats,
}

impl DodgeScene {
    /// Build the scene: player at the bottom center, rupees scattered around
    ///
    /// Fails if the playfield is not wider than every sprite or not tall
    /// enough for the player's row.
    pub fn new(config: CollisionConfig, seed: u64) -> Result<Self, SceneError> {
        let bounds = config.world;
        let min_width = PLAYER_SIZE.w.max(CHICKEN_SIZE.w).max(RUPEE_SIZE.w);
        let min_height = PLAYER_SIZE.h + PLAYER_MARGIN;
        if !(bounds.width > min_width && bounds.height > min_height) {
            return Err(SceneError::PlayfieldTooSmall {
                width: bounds.width,
                height: bounds.height,
                min_width,
                min_height,
            });
        }

        let mut world = CollisionWorld::new(config);
        let player_handler = Rc::new(RefCell::new(PlayerHandler::default()));
        let chicken_handler = Rc::new(RefCell::new(ChickenHandler::default()));

        let player = Actor::new(
            ActorKind::Player,
            Vec2::new((bounds.width - PLAYER_SIZE.w) * 0.5, bounds.height - PLAYER_SIZE.h - PLAYER_MARGIN),
            Vec2::new(PLAYER_SPEED, 0.0),
            Some(player_handler.clone() as SharedHandler),
        );
        let player_id = world.create_collider(
            ColliderDescriptor::new(
                CollisionLayers::PLAYER,
                CollisionLayers::ENEMY | CollisionLayers::PICKUP,
                PLAYER_SIZE,
            )
            .with_handler("Player"),
        )?;
        world.setup_collider(player_id, player.clone())?;

        let mut scene = Self {
            world,
            actors: vec![(player_id, player.clone())],
            player,
            player_handler,
            chicken_handler,
            rng: StdRng::seed_from_u64(seed),
            stats: SceneStats::default(),
        };

        for _ in 0..RUPEE_COUNT {
            scene.spawn_rupee()?;
        }

        log::info!(
            "Scene ready: {} colliders on a {}x{} playfield",
            scene.world.collider_count(),
            bounds.width,
            bounds.height
        );
        Ok(scene)
    }

    fn spawn_rupee(&mut self) -> Result<(), CollisionError> {
        let bounds = self.world.config().world;
        // Rupees sit on the player's row so the patrol can reach them
        let x = self.rng.gen_range(0.0..bounds.width - RUPEE_SIZE.w);
        let y = self.player.world_position().y + self.rng.gen_range(0.0..PLAYER_SIZE.h - RUPEE_SIZE.h);
        let rupee = Actor::new(ActorKind::Rupee, Vec2::new(x, y), Vec2::zeros(), None);

        let id = self.world.create_collider(ColliderDescriptor::new(
            CollisionLayers::PICKUP,
            CollisionLayers::NONE,
            RUPEE_SIZE,
        ))?;
        self.world.setup_collider(id, rupee.clone())?;
        self.actors.push((id, rupee));
        Ok(())
    }

    fn spawn_chicken(&mut self) -> Result<(), CollisionError> {
        let bounds = self.world.config().world;
        let x = self.rng.gen_range(0.0..bounds.width - CHICKEN_SIZE.w);
        let drift = self.rng.gen_range(-1.0..1.0);
        let chicken: SharedHandler = self.chicken_handler.clone();
        let actor = Actor::new(
            ActorKind::Chicken,
            Vec2::new(x, 0.0),
            Vec2::new(drift, CHICKEN_SPEED),
            Some(chicken),
        );

        let id = self.world.create_collider(
            ColliderDescriptor::new(CollisionLayers::ENEMY, CollisionLayers::PLAYER, CHICKEN_SIZE)
                .with_handler("Chicken"),
        )?;
        self.world.setup_collider(id, actor.clone())?;
        self.actors.push((id, actor));
        self.stats.chickens_spawned += 1;
        Ok(())
    }

    /// Simulate one frame
    pub fn tick(&mut self) -> Result<(), CollisionError> {
        if self.stats.frames % CHICKEN_SPAWN_INTERVAL == 0 {
            self.spawn_chicken()?;
        }

        self.move_actors();
        self.world.step()?;
        self.collect_picked_rupees()?;
        self.stats.frames += 1;
        Ok(())
    }

    fn move_actors(&mut self) {
        let bounds = *self.world.index().bounds();

        // Player patrols left and right along the bottom
        let velocity = self.player.velocity.get();
        let next = self.player.world_position() + velocity;
        if next.x < 0.0 || next.x + PLAYER_SIZE.w > bounds.right() {
            self.player.velocity.set(-velocity);
        }

        let mut gone = Vec::new();
        for (id, actor) in &self.actors {
            actor.advance();
            if actor.kind == ActorKind::Chicken && actor.world_position().y > bounds.bottom() {
                actor.active.set(false);
                gone.push(*id);
            }
        }

        for id in gone {
            if self.world.remove_collider(id).is_ok() {
                self.actors.retain(|(actor_id, _)| *actor_id != id);
                self.stats.chickens_removed += 1;
            }
        }
    }

    fn collect_picked_rupees(&mut self) -> Result<(), CollisionError> {
        let picked = std::mem::take(&mut self.player_handler.borrow_mut().picked);
        for id in picked {
            self.world.set_enabled(id, false)?;
            if let Some((_, actor)) = self.actors.iter().find(|(actor_id, _)| *actor_id == id) {
                actor.active.set(false);
            }
        }
        Ok(())
    }

    /// Counters so far
    pub fn stats(&self) -> SceneStats {
        let player = self.player_handler.borrow();
        SceneStats {
            score: player.score,
            player_hits: player.hits,
            pecks: self.chicken_handler.borrow().pecks,
            ..self.stats
        }
    }

    /// Collision world backing the scene
    pub const fn world(&self) -> &CollisionWorld {
        &self.world
    }
}
