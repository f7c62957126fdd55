//! Collision category filtering
//!
//! Each collider carries a `flag` (the categories it belongs to) and a `mask`
//! (the categories it reacts to). Filtering is one-way: A reacting to B says
//! nothing about B reacting to A, which allows hazards that only the player
//! notices.

/// Collision category definitions for flag/mask filtering
pub struct CollisionLayers;

impl CollisionLayers {
    /// No collision category
    pub const NONE: u32 = 0;

    /// All collision categories
    pub const ALL: u32 = 0xFFFF_FFFF;

    /// Player character
    pub const PLAYER: u32 = 1 << 0;

    /// Enemies and hazards (chickens)
    pub const ENEMY: u32 = 1 << 1;

    /// Pickups and collectibles (rupees, hearts)
    pub const PICKUP: u32 = 1 << 2;

    /// Static environment geometry
    pub const ENVIRONMENT: u32 = 1 << 3;

    /// Trigger volumes
    pub const TRIGGER: u32 = 1 << 4;

    /// Check whether an observer with `mask` reacts to a collider with `flag`
    ///
    /// # Example
    /// ```
    /// use dodge_engine::physics::CollisionLayers;
    ///
    /// let player_mask = CollisionLayers::ENEMY | CollisionLayers::PICKUP;
    /// assert!(CollisionLayers::reacts_to(player_mask, CollisionLayers::PICKUP));
    ///
    /// // Pickups react to nothing, the player still sees them
    /// assert!(!CollisionLayers::reacts_to(CollisionLayers::NONE, CollisionLayers::PLAYER));
    /// ```
    pub const fn reacts_to(mask: u32, flag: u32) -> bool {
        mask & flag != 0
    }

    /// Helper to create a mask from multiple categories
    ///
    /// # Example
    /// ```
    /// use dodge_engine::physics::CollisionLayers;
    ///
    /// let mask = CollisionLayers::mask(&[CollisionLayers::ENEMY, CollisionLayers::PICKUP]);
    /// assert_eq!(mask, CollisionLayers::ENEMY | CollisionLayers::PICKUP);
    /// ```
    pub fn mask(layers: &[u32]) -> u32 {
        layers.iter().fold(0, |acc, &layer| acc | layer)
    }
}
