//! Arena construction parameters
//!
//! A plain configuration record. Every field has a default so partial JSON
//! documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// How the mobile side of an entity-entity overlap is displaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlapResolution {
    /// `atan(dy / dx)` with no quadrant correction. Pushes the mobile entity
    /// toward the other one when the other lies to its right, away when it
    /// lies to its left, and is undefined for coincident centers.
    #[default]
    QuadrantNaive,
    /// Push the mobile entity directly away from the other so the circles
    /// end up exactly touching.
    Separating,
}

impl OverlapResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverlapResolution::QuadrantNaive => "quadrant_naive",
            OverlapResolution::Separating => "separating",
        }
    }
}

/// Per-variant numbers used by the default entity factory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityTuning {
    // === Robot ===
    pub robot_radius: f32,
    pub robot_lives: u32,
    pub robot_speed_step: f32,
    pub robot_max_speed: f32,
    /// Heading change per turn command (radians)
    pub robot_turn_step: f32,
    pub robot_hit_cooldown_ticks: u32,

    // === Bases ===
    pub base_radius: f32,

    // === Obstacles ===
    pub obstacle_min_radius: f32,
    pub obstacle_max_radius: f32,
    pub obstacle_speed: f32,
    /// Lives the robot loses on contact
    pub obstacle_damage: u32,
}

impl Default for EntityTuning {
    fn default() -> Self {
        Self {
            robot_radius: ROBOT_RADIUS,
            robot_lives: ROBOT_LIVES,
            robot_speed_step: ROBOT_SPEED_STEP,
            robot_max_speed: ROBOT_MAX_SPEED,
            robot_turn_step: ROBOT_TURN_STEP,
            robot_hit_cooldown_ticks: ROBOT_HIT_COOLDOWN_TICKS,

            base_radius: BASE_RADIUS,

            obstacle_min_radius: OBSTACLE_MIN_RADIUS,
            obstacle_max_radius: OBSTACLE_MAX_RADIUS,
            obstacle_speed: OBSTACLE_SPEED,
            obstacle_damage: OBSTACLE_DAMAGE,
        }
    }
}

/// Errors raised while loading or validating parameters
#[derive(Debug, thiserror::Error)]
pub enum ParamsError {
    #[error("failed to read params file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse params: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid params: {0}")]
    Invalid(String),
}

/// Arena construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaParams {
    pub width: f32,
    pub height: f32,
    pub n_bases: u32,
    pub n_obstacles: u32,
    /// Captured-base count that wins the game. Defaults to `n_bases` when unset;
    /// `Some(u32::MAX)` leaves the game without a win condition.
    pub win_threshold: Option<u32>,
    pub overlap_resolution: OverlapResolution,
    /// Seed for the default factory's placement RNG
    pub seed: u64,
    pub tuning: EntityTuning,
}

impl Default for ArenaParams {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
            n_bases: DEFAULT_N_BASES,
            n_obstacles: DEFAULT_N_OBSTACLES,
            win_threshold: None,
            overlap_resolution: OverlapResolution::default(),
            seed: 0,
            tuning: EntityTuning::default(),
        }
    }
}

impl ArenaParams {
    /// Parameters for a `width` x `height` arena with the given population
    pub fn new(width: f32, height: f32, n_bases: u32, n_obstacles: u32) -> Self {
        Self {
            width,
            height,
            n_bases,
            n_obstacles,
            ..Default::default()
        }
    }

    /// Captured-base count that ends the game in a win
    pub fn win_threshold(&self) -> u32 {
        self.win_threshold.unwrap_or(self.n_bases)
    }

    /// Parse parameters from a JSON document
    pub fn from_json(json: &str) -> Result<Self, ParamsError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    /// Load parameters from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let params = Self::from_json(&json)?;
        log::info!("Loaded arena params from {}", path.display());
        Ok(params)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ParamsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject dimensions and radii the arena invariants forbid.
    ///
    /// The arena itself accepts whatever it is handed; this is for loaders.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ParamsError::Invalid(format!(
                "arena dimensions must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        let t = &self.tuning;
        let radii = [
            ("robot_radius", t.robot_radius),
            ("base_radius", t.base_radius),
            ("obstacle_min_radius", t.obstacle_min_radius),
            ("obstacle_max_radius", t.obstacle_max_radius),
        ];
        for (name, radius) in radii {
            if !(radius >= 0.0) {
                return Err(ParamsError::Invalid(format!(
                    "{name} must be non-negative, got {radius}"
                )));
            }
        }
        if t.obstacle_min_radius > t.obstacle_max_radius {
            return Err(ParamsError::Invalid(format!(
                "obstacle_min_radius {} exceeds obstacle_max_radius {}",
                t.obstacle_min_radius, t.obstacle_max_radius
            )));
        }
        Ok(())
    }
}
