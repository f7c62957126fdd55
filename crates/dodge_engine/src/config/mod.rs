//! Configuration system
//!
//! Collision settings can be declared in TOML or RON scene files and loaded
//! through the [`Config`] trait.

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Rectangle;
use crate::spatial::QuadtreeConfig;

/// Settings that can be read from and written to scene files
///
/// The format is picked from the file extension (`.toml` or `.ron`).
/// Loaded values are checked with [`Config::validate`] before they are
/// handed out.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Reject values that parse but cannot be used
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    /// Load and validate configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;

        let config: Self = if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Size of the playfield covered by the spatial index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// Playfield width in world units
    pub width: f32,
    /// Playfield height in world units
    pub height: f32,
}

impl WorldBounds {
    /// Create new bounds
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Bounds as a rectangle anchored at the origin
    pub const fn as_rectangle(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        // ChickenDodge playfield
        Self::new(576.0, 768.0)
    }
}

/// Where collision candidates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BroadPhase {
    /// Query the quadtree
    #[default]
    Quadtree,
    /// Enumerate every registered collider
    BruteForce,
}

/// # Collision Configuration
///
/// Settings for one [`crate::physics::CollisionWorld`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Playfield covered by the quadtree
    pub world: WorldBounds,
    /// Quadtree subdivision tuning
    pub quadtree: QuadtreeConfig,
    /// Candidate source for collision passes
    pub broad_phase: BroadPhase,
}

impl CollisionConfig {
    /// Set the playfield size
    pub fn with_world(mut self, width: f32, height: f32) -> Self {
        self.world = WorldBounds::new(width, height);
        self
    }

    /// Set the quadtree tuning
    pub fn with_quadtree(mut self, quadtree: QuadtreeConfig) -> Self {
        self.quadtree = quadtree;
        self
    }

    /// Set the candidate source
    pub fn with_broad_phase(mut self, broad_phase: BroadPhase) -> Self {
        self.broad_phase = broad_phase;
        self
    }
}

impl Config for CollisionConfig {
    /// Positive bounds, a non-empty bucket and a positive minimum node size
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.world.width > 0.0 && self.world.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "world bounds must be positive, got {}x{}",
                self.world.width, self.world.height
            )));
        }

        if self.quadtree.max_entries_per_node == 0 {
            return Err(ConfigError::Invalid(
                "max_entries_per_node must be at least 1".to_string(),
            ));
        }

        if !(self.quadtree.min_node_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_node_size must be positive, got {}",
                self.quadtree.min_node_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("dodge_engine_config_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir.join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_match_playfield() {
        let config = CollisionConfig::default();
        assert_eq!(config.world, WorldBounds::new(576.0, 768.0));
        assert_eq!(config.quadtree.max_entries_per_node, 3);
        assert_eq!(config.broad_phase, BroadPhase::Quadtree);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CollisionConfig::default().with_world(0.0, 100.0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CollisionConfig::default().with_quadtree(QuadtreeConfig {
            max_entries_per_node: 0,
            ..QuadtreeConfig::default()
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = CollisionConfig::default().with_quadtree(QuadtreeConfig {
            min_node_size: f32::NAN,
            ..QuadtreeConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: CollisionConfig = toml::from_str(
            r#"
            broad_phase = "brute_force"

            [quadtree]
            max_entries_per_node = 6
            "#,
        )
        .unwrap();

        assert_eq!(config.broad_phase, BroadPhase::BruteForce);
        assert_eq!(config.quadtree.max_entries_per_node, 6);
        assert_eq!(config.quadtree.max_depth, QuadtreeConfig::default().max_depth);
        assert_eq!(config.world, WorldBounds::default());
    }

    #[test]
    fn test_save_and_load_toml_and_ron() {
        let config = CollisionConfig::default()
            .with_world(320.0, 240.0)
            .with_broad_phase(BroadPhase::BruteForce);

        for name in ["collision.toml", "collision.ron"] {
            let path = temp_path(name);
            config.save_to_file(&path).unwrap();
            let loaded = CollisionConfig::load_from_file(&path).unwrap();
            assert_eq!(loaded, config);
            std::fs::remove_file(&path).ok();
        }
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let path = temp_path("zero_bucket.toml");
        std::fs::write(&path, "[quadtree]\nmax_entries_per_node = 0\n").unwrap();

        let result = CollisionConfig::load_from_file(&path);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        let result = CollisionConfig::default().save_to_file("collision.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
