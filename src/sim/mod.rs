//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per step
//! - Seeded RNG only (entity placement)
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod arena;
pub mod collision;
pub mod entity;
pub mod factory;
pub mod state;
pub mod tick;

pub use arena::{Arena, ArenaError, ArenaSnapshot, EntitySnapshot, RobotSnapshot};
pub use collision::{
    adjust_wall_overlap, entity_overlap_displacement, is_colliding, reflect_heading,
    wall_collision,
};
pub use entity::{Entity, EntityKind, MobileEntity, Pose, RobotEntity, Spawned};
pub use factory::{DefaultFactory, EntityFactory, FactoryError};
pub use state::{Base, Command, GameStatus, Obstacle, Robot, StatusEvent};
