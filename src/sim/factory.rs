//! Entity creation
//!
//! The arena asks a factory for one robot, then bases, then obstacles. Each
//! constructor returns a box typed to exactly what the arena needs from that
//! variant, so nothing is downcast afterwards.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, MobileEntity, RobotEntity, Spawned};
use super::state::{Base, Obstacle, Robot};
use crate::consts::WALL_MARGIN;
use crate::params::{ArenaParams, EntityTuning};

/// Placement attempts before accepting an overlapping spot
const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

/// Errors a factory may report
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FactoryError {
    #[error("factory cannot build entities of kind {0:?}")]
    UnknownKind(EntityKind),
    #[error("factory has no {0} left to hand out")]
    Exhausted(EntityKind),
    #[error("cannot build {kind}: {reason}")]
    InvalidTuning { kind: EntityKind, reason: String },
}

/// Produces the arena's entities
pub trait EntityFactory {
    fn create_robot(&mut self) -> Result<Box<dyn RobotEntity>, FactoryError>;

    fn create_base(&mut self) -> Result<Box<dyn Entity>, FactoryError>;

    fn create_obstacle(&mut self) -> Result<Box<dyn MobileEntity>, FactoryError>;

    /// Build by type tag. Walls and `Undefined` are not buildable.
    fn create_entity(&mut self, kind: EntityKind) -> Result<Spawned, FactoryError> {
        match kind {
            EntityKind::Robot => self.create_robot().map(Spawned::Robot),
            EntityKind::Base => self.create_base().map(Spawned::Fixed),
            EntityKind::Obstacle => self.create_obstacle().map(Spawned::Mobile),
            other => Err(FactoryError::UnknownKind(other)),
        }
    }
}

/// Seeded factory for the default `Robot`, `Base` and `Obstacle` variants.
///
/// The robot starts at the arena center heading right. Bases and obstacles
/// are scattered at random inside the walls, avoiding overlap with anything
/// already placed when there is room.
#[derive(Debug, Clone)]
pub struct DefaultFactory {
    width: f32,
    height: f32,
    tuning: EntityTuning,
    rng: Pcg32,
    /// Circles handed out so far (center, radius)
    placed: Vec<(Vec2, f32)>,
}

impl DefaultFactory {
    pub fn new(params: &ArenaParams) -> Self {
        Self {
            width: params.width,
            height: params.height,
            tuning: params.tuning.clone(),
            rng: Pcg32::seed_from_u64(params.seed),
            placed: Vec::new(),
        }
    }

    /// Random coordinate keeping a circle of `radius` clear of both walls
    /// on one axis. Falls back to the midpoint when the axis is too short.
    fn coordinate(&mut self, extent: f32, radius: f32) -> f32 {
        let lo = radius + WALL_MARGIN;
        let hi = extent - radius - WALL_MARGIN;
        if lo < hi && lo.is_finite() && hi.is_finite() {
            self.rng.random_range(lo..hi)
        } else {
            extent / 2.0
        }
    }

    fn place(&mut self, radius: f32, kind: EntityKind) -> Vec2 {
        let mut candidate = Vec2::new(self.width / 2.0, self.height / 2.0);
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = Vec2::new(
                self.coordinate(self.width, radius),
                self.coordinate(self.height, radius),
            );
            let clear = self
                .placed
                .iter()
                .all(|&(pos, r)| pos.distance(candidate) > r + radius);
            if clear {
                self.placed.push((candidate, radius));
                return candidate;
            }
        }
        log::warn!(
            "No free spot for {} after {} attempts, placing at ({:.1}, {:.1})",
            kind,
            MAX_PLACEMENT_ATTEMPTS,
            candidate.x,
            candidate.y
        );
        self.placed.push((candidate, radius));
        candidate
    }
}

impl EntityFactory for DefaultFactory {
    fn create_robot(&mut self) -> Result<Box<dyn RobotEntity>, FactoryError> {
        let pos = Vec2::new(self.width / 2.0, self.height / 2.0);
        self.placed.push((pos, self.tuning.robot_radius));
        Ok(Box::new(Robot::new(pos, 0.0, &self.tuning)))
    }

    fn create_base(&mut self) -> Result<Box<dyn Entity>, FactoryError> {
        let radius = self.tuning.base_radius;
        let pos = self.place(radius, EntityKind::Base);
        Ok(Box::new(Base::new(pos, &self.tuning)))
    }

    fn create_obstacle(&mut self) -> Result<Box<dyn MobileEntity>, FactoryError> {
        let (min, max) = (self.tuning.obstacle_min_radius, self.tuning.obstacle_max_radius);
        if !(min.is_finite() && max.is_finite() && min <= max) {
            return Err(FactoryError::InvalidTuning {
                kind: EntityKind::Obstacle,
                reason: format!("obstacle radius range {}..={} is empty", min, max),
            });
        }
        let radius = self.rng.random_range(min..=max);
        let heading = self
            .rng
            .random_range(-std::f32::consts::PI..std::f32::consts::PI);
        let pos = self.place(radius, EntityKind::Obstacle);
        Ok(Box::new(Obstacle::new(pos, radius, heading, &self.tuning)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{is_colliding, wall_collision};

    #[test]
    fn test_robot_starts_at_center() {
        let params = ArenaParams::new(400.0, 300.0, 2, 2);
        let mut factory = DefaultFactory::new(&params);
        let robot = factory.create_robot().unwrap();
        assert_eq!(robot.pose(), Vec2::new(200.0, 150.0));
        assert_eq!(robot.kind(), EntityKind::Robot);
        assert_eq!(robot.lives(), params.tuning.robot_lives);
    }

    #[test]
    fn test_create_entity_by_tag() {
        let params = ArenaParams::default();
        let mut factory = DefaultFactory::new(&params);
        assert!(matches!(
            factory.create_entity(EntityKind::Robot),
            Ok(Spawned::Robot(_))
        ));
        assert!(matches!(
            factory.create_entity(EntityKind::Base),
            Ok(Spawned::Fixed(_))
        ));
        assert!(matches!(
            factory.create_entity(EntityKind::Obstacle),
            Ok(Spawned::Mobile(_))
        ));
        assert_eq!(
            factory.create_entity(EntityKind::LeftWall).unwrap_err(),
            FactoryError::UnknownKind(EntityKind::LeftWall)
        );
    }

    #[test]
    fn test_placement_is_clear_of_walls_and_each_other() {
        let params = ArenaParams::new(1024.0, 768.0, 3, 4);
        let mut factory = DefaultFactory::new(&params);
        let mut circles = vec![];
        let robot = factory.create_robot().unwrap();
        circles.push((robot.pose(), robot.radius()));
        for _ in 0..3 {
            let base = factory.create_base().unwrap();
            circles.push((base.pose(), base.radius()));
        }
        for _ in 0..4 {
            let obstacle = factory.create_obstacle().unwrap();
            let r = obstacle.radius();
            assert!(r >= params.tuning.obstacle_min_radius && r <= params.tuning.obstacle_max_radius);
            circles.push((obstacle.pose(), r));
        }

        for (i, &(pos, r)) in circles.iter().enumerate() {
            assert_eq!(wall_collision(pos, r, params.width, params.height), EntityKind::Undefined);
            for &(other, other_r) in &circles[i + 1..] {
                assert!(!is_colliding(pos, r, other, other_r));
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let params = ArenaParams {
            seed: 42,
            ..ArenaParams::default()
        };
        let mut a = DefaultFactory::new(&params);
        let mut b = DefaultFactory::new(&params);
        for _ in 0..3 {
            assert_eq!(a.create_base().unwrap().pose(), b.create_base().unwrap().pose());
            assert_eq!(
                a.create_obstacle().unwrap().pose(),
                b.create_obstacle().unwrap().pose()
            );
        }
    }

    #[test]
    fn test_bad_obstacle_radius_range_is_an_error() {
        for (min, max) in [(40.0, 15.0), (f32::NAN, 15.0), (15.0, f32::INFINITY)] {
            let mut params = ArenaParams::default();
            params.tuning.obstacle_min_radius = min;
            params.tuning.obstacle_max_radius = max;
            let mut factory = DefaultFactory::new(&params);
            assert!(matches!(
                factory.create_obstacle(),
                Err(FactoryError::InvalidTuning {
                    kind: EntityKind::Obstacle,
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_unbounded_arena_falls_back_to_center() {
        let params = ArenaParams::new(f32::INFINITY, 100.0, 1, 0);
        let mut factory = DefaultFactory::new(&params);
        let base = factory.create_base().unwrap();
        assert_eq!(base.pose().x, f32::INFINITY);
    }

    #[test]
    fn test_tiny_arena_falls_back_to_center() {
        let params = ArenaParams::new(10.0, 10.0, 1, 0);
        let mut factory = DefaultFactory::new(&params);
        let base = factory.create_base().unwrap();
        assert_eq!(base.pose(), Vec2::new(5.0, 5.0));
    }
}
