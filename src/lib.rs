//! Robot Arena - simulation core for a 2D arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game status)
//! - `params`: Construction parameters and entity tuning

pub mod params;
pub mod sim;

pub use params::{ArenaParams, EntityTuning, OverlapResolution, ParamsError};
pub use sim::{Arena, ArenaError, Command, GameStatus};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame time a driver passes to `advance_time` (60 Hz).
    /// Only its sign matters to the arena.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Ticks handed to every entity update per `advance_time` call
    pub const TICKS_PER_STEP: u32 = 1;

    /// Distance an entity edge is placed inside a wall it overlapped
    pub const WALL_MARGIN: f32 = 5.0;

    /// Arena dimensions
    pub const DEFAULT_ARENA_WIDTH: f32 = 1024.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 768.0;

    /// Population defaults
    pub const DEFAULT_N_BASES: u32 = 3;
    pub const DEFAULT_N_OBSTACLES: u32 = 4;

    /// Robot defaults
    pub const ROBOT_RADIUS: f32 = 20.0;
    pub const ROBOT_LIVES: u32 = 9;
    pub const ROBOT_SPEED_STEP: f32 = 1.0;
    pub const ROBOT_MAX_SPEED: f32 = 10.0;
    /// Heading change per turn command (radians, ~10 degrees)
    pub const ROBOT_TURN_STEP: f32 = 0.174_532_92;
    /// Ticks after a damaging hit during which further hits are ignored
    pub const ROBOT_HIT_COOLDOWN_TICKS: u32 = 30;

    /// Base defaults
    pub const BASE_RADIUS: f32 = 30.0;

    /// Obstacle defaults
    pub const OBSTACLE_MIN_RADIUS: f32 = 15.0;
    pub const OBSTACLE_MAX_RADIUS: f32 = 40.0;
    pub const OBSTACLE_SPEED: f32 = 2.0;
    pub const OBSTACLE_DAMAGE: u32 = 1;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Unit vector pointing along `heading` (radians)
#[inline]
pub fn heading_vector(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert!((normalize_angle(PI) - (-PI)).abs() < 1e-6);
        assert!((normalize_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-6);
        assert!((normalize_angle(2.0 * PI + 0.5) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_heading_vector() {
        let v = heading_vector(PI / 2.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }
}
