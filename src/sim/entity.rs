//! Entity contract consumed by the arena
//!
//! The arena never needs to know which concrete type sits behind an entity.
//! It only relies on the capability set below, and the factory hands back
//! values already typed to the capabilities the arena needs (`Spawned`).

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Entity center in arena coordinates (x grows right, y grows down)
pub type Pose = Vec2;

/// Type tag for entities and the four walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Robot,
    Base,
    Obstacle,
    /// Wall at x = width
    RightWall,
    /// Wall at x = 0
    LeftWall,
    /// Wall at y = 0
    TopWall,
    /// Wall at y = height
    BottomWall,
    /// No wall / unknown
    Undefined,
}

impl EntityKind {
    pub fn is_wall(self) -> bool {
        matches!(
            self,
            EntityKind::RightWall | EntityKind::LeftWall | EntityKind::TopWall | EntityKind::BottomWall
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Robot => "robot",
            EntityKind::Base => "base",
            EntityKind::Obstacle => "obstacle",
            EntityKind::RightWall => "right wall",
            EntityKind::LeftWall => "left wall",
            EntityKind::TopWall => "top wall",
            EntityKind::BottomWall => "bottom wall",
            EntityKind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Anything with a position and a radius that takes part in the simulation
pub trait Entity: fmt::Debug {
    fn kind(&self) -> EntityKind;

    fn pose(&self) -> Pose;

    /// Radius of the entity's circular bound (never negative)
    fn radius(&self) -> f32;

    /// Advance internal state by `ticks` fixed ticks
    fn update(&mut self, ticks: u32);

    /// Restore the state the entity had right after construction
    fn reset(&mut self);

    /// React to a collision the arena has already resolved.
    ///
    /// `other_entity` is `None` for walls. The borrow only lives for the
    /// duration of the call.
    fn handle_collision(&mut self, other: EntityKind, other_entity: Option<&mut dyn Entity>);

    /// Lives the robot loses when it touches this entity
    fn contact_damage(&self) -> u32 {
        0
    }

    /// Mark this entity captured. Returns true only for the contact that
    /// captured it, so each entity counts once.
    fn capture(&mut self) -> bool {
        false
    }

    fn is_captured(&self) -> bool {
        false
    }
}

/// An entity whose position the simulation may change
pub trait MobileEntity: Entity {
    fn set_position(&mut self, x: f32, y: f32);
}

/// The player-controlled robot
pub trait RobotEntity: MobileEntity {
    fn lives(&self) -> u32;

    fn bases_captured(&self) -> u32;

    fn increase_speed(&mut self);

    fn decrease_speed(&mut self);

    fn turn_left(&mut self);

    fn turn_right(&mut self);
}

/// A factory product, typed by the capabilities the arena needs from it
#[derive(Debug)]
pub enum Spawned {
    Robot(Box<dyn RobotEntity>),
    Mobile(Box<dyn MobileEntity>),
    Fixed(Box<dyn Entity>),
}

impl Spawned {
    pub fn entity(&self) -> &dyn Entity {
        match self {
            Spawned::Robot(robot) => &**robot,
            Spawned::Mobile(mobile) => &**mobile,
            Spawned::Fixed(entity) => &**entity,
        }
    }

    pub fn entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            Spawned::Robot(robot) => &mut **robot,
            Spawned::Mobile(mobile) => &mut **mobile,
            Spawned::Fixed(entity) => &mut **entity,
        }
    }

    pub fn mobile(&self) -> Option<&dyn MobileEntity> {
        match self {
            Spawned::Robot(robot) => Some(&**robot as &dyn MobileEntity),
            Spawned::Mobile(mobile) => Some(&**mobile),
            Spawned::Fixed(_) => None,
        }
    }

    pub fn mobile_mut(&mut self) -> Option<&mut dyn MobileEntity> {
        match self {
            Spawned::Robot(robot) => Some(&mut **robot as &mut dyn MobileEntity),
            Spawned::Mobile(mobile) => Some(&mut **mobile),
            Spawned::Fixed(_) => None,
        }
    }

    pub fn robot(&self) -> Option<&dyn RobotEntity> {
        match self {
            Spawned::Robot(robot) => Some(&**robot),
            _ => None,
        }
    }

    pub fn robot_mut(&mut self) -> Option<&mut dyn RobotEntity> {
        match self {
            Spawned::Robot(robot) => Some(&mut **robot),
            _ => None,
        }
    }

    pub fn is_mobile(&self) -> bool {
        !matches!(self, Spawned::Fixed(_))
    }
}

/// Borrow two distinct slots of a slice, the first mutably for the mover
pub(crate) fn pair_mut<T>(items: &mut [T], first: usize, second: usize) -> (&mut T, &mut T) {
    debug_assert_ne!(first, second);
    if first < second {
        let (head, tail) = items.split_at_mut(second);
        (&mut head[first], &mut tail[0])
    } else {
        let (head, tail) = items.split_at_mut(first);
        (&mut tail[0], &mut head[second])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wall_kinds() {
        assert!(EntityKind::LeftWall.is_wall());
        assert!(EntityKind::BottomWall.is_wall());
        assert!(!EntityKind::Robot.is_wall());
        assert!(!EntityKind::Undefined.is_wall());
        assert_eq!(EntityKind::TopWall.to_string(), "top wall");
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut items = [1, 2, 3, 4];
        {
            let (a, b) = pair_mut(&mut items, 0, 3);
            *a += 10;
            *b += 20;
        }
        {
            let (a, b) = pair_mut(&mut items, 2, 1);
            *a += 100;
            *b += 200;
        }
        assert_eq!(items, [11, 202, 103, 24]);
    }
}
