//! The arena: owner of every entity and of the game status
//!
//! Entities live in creation order (robot, bases, obstacles) for the whole
//! life of the arena. The mobile subset and the robot are tracked by index
//! into that one collection.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityKind, MobileEntity, RobotEntity, Spawned};
use super::factory::{DefaultFactory, EntityFactory, FactoryError};
use super::state::{Command, GameStatus, StatusEvent};
use crate::params::{ArenaParams, OverlapResolution};

/// Slot the robot always occupies
const ROBOT_INDEX: usize = 0;

/// Errors raised while building an arena
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("failed to create {kind} #{index}: {source}")]
    Factory {
        kind: EntityKind,
        index: u32,
        #[source]
        source: FactoryError,
    },
}

/// Rendering view of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub captured: bool,
}

/// Robot counters for a HUD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub lives: u32,
    pub bases_captured: u32,
}

/// Read-only copy of the arena at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaSnapshot {
    pub width: f32,
    pub height: f32,
    pub status: GameStatus,
    pub ticks: u64,
    pub robot: RobotSnapshot,
    pub entities: Vec<EntitySnapshot>,
}

/// Rectangular play area and the entities inside it
#[derive(Debug)]
pub struct Arena {
    pub(super) width: f32,
    pub(super) height: f32,
    /// Every entity, in creation order. Never resized after construction.
    pub(super) entities: Vec<Spawned>,
    /// Indices into `entities` of the mobile ones, in creation order
    pub(super) mobile_entities: Vec<usize>,
    pub(super) robot: usize,
    status: GameStatus,
    pub(super) win_threshold: u32,
    pub(super) overlap_resolution: OverlapResolution,
    /// Ticks run since construction or the last reset
    pub(super) ticks: u64,
}

impl Arena {
    /// Build an arena, asking `factory` for one robot, `n_bases` bases and
    /// `n_obstacles` obstacles, in that order.
    pub fn new(params: &ArenaParams, factory: &mut dyn EntityFactory) -> Result<Self, ArenaError> {
        let capacity = 1 + params.n_bases as usize + params.n_obstacles as usize;
        let mut entities = Vec::with_capacity(capacity);
        let mut mobile_entities = Vec::with_capacity(1 + params.n_obstacles as usize);

        let robot = factory
            .create_robot()
            .map_err(|source| Self::factory_error(EntityKind::Robot, 0, source))?;
        mobile_entities.push(entities.len());
        entities.push(Spawned::Robot(robot));

        for index in 0..params.n_bases {
            let base = factory
                .create_base()
                .map_err(|source| Self::factory_error(EntityKind::Base, index, source))?;
            entities.push(Spawned::Fixed(base));
        }

        for index in 0..params.n_obstacles {
            let obstacle = factory
                .create_obstacle()
                .map_err(|source| Self::factory_error(EntityKind::Obstacle, index, source))?;
            mobile_entities.push(entities.len());
            entities.push(Spawned::Mobile(obstacle));
        }

        log::info!(
            "Arena {}x{} created: {} bases, {} obstacles, {} overlap resolution",
            params.width,
            params.height,
            params.n_bases,
            params.n_obstacles,
            params.overlap_resolution.as_str()
        );

        Ok(Self {
            width: params.width,
            height: params.height,
            entities,
            mobile_entities,
            robot: ROBOT_INDEX,
            status: GameStatus::Paused,
            win_threshold: params.win_threshold(),
            overlap_resolution: params.overlap_resolution,
            ticks: 0,
        })
    }

    /// Build an arena populated by the seeded [`DefaultFactory`]
    pub fn with_default_factory(params: &ArenaParams) -> Result<Self, ArenaError> {
        let mut factory = DefaultFactory::new(params);
        Self::new(params, &mut factory)
    }

    fn factory_error(kind: EntityKind, index: u32, source: FactoryError) -> ArenaError {
        log::error!("Arena construction failed on {} #{}: {}", kind, index, source);
        ArenaError::Factory {
            kind,
            index,
            source,
        }
    }

    /// Start a fresh game: status becomes Playing and every entity restores
    /// its own initial state. No entity is recreated.
    pub fn reset(&mut self) {
        self.transition(StatusEvent::Reset);
        for slot in &mut self.entities {
            slot.entity_mut().reset();
        }
        self.ticks = 0;
    }

    /// Apply a driver command immediately. Never fails.
    pub fn accept_command(&mut self, command: Command) {
        match command {
            Command::IncreaseSpeed => self.robot_mut().increase_speed(),
            Command::DecreaseSpeed => self.robot_mut().decrease_speed(),
            Command::TurnLeft => self.robot_mut().turn_left(),
            Command::TurnRight => self.robot_mut().turn_right(),
            Command::Play => self.transition(StatusEvent::Play),
            Command::Pause => self.transition(StatusEvent::Pause),
            Command::Reset => self.reset(),
            Command::None => {}
        }
    }

    /// The only place `status` changes
    pub(super) fn transition(&mut self, event: StatusEvent) {
        let next = self.status.on(event);
        if next != self.status {
            log::info!("Game status {} -> {} ({:?})", self.status.as_str(), next.as_str(), event);
        }
        self.status = next;
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn win_threshold(&self) -> u32 {
        self.win_threshold
    }

    pub fn overlap_resolution(&self) -> OverlapResolution {
        self.overlap_resolution
    }

    /// Number of entities, robot included
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Every entity in creation order
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> + '_ {
        self.entities.iter().map(Spawned::entity)
    }

    /// The mobile entities (robot first, then obstacles)
    pub fn mobile_entities(&self) -> impl Iterator<Item = &dyn MobileEntity> + '_ {
        self.mobile_entities
            .iter()
            .filter_map(|&index| self.entities[index].mobile())
    }

    pub fn entity(&self, index: usize) -> Option<&dyn Entity> {
        self.entities.get(index).map(Spawned::entity)
    }

    pub fn robot(&self) -> &dyn RobotEntity {
        match self.entities[self.robot].robot() {
            Some(robot) => robot,
            None => unreachable!("slot {} always holds the robot", self.robot),
        }
    }

    pub(super) fn robot_mut(&mut self) -> &mut dyn RobotEntity {
        let index = self.robot;
        match self.entities[index].robot_mut() {
            Some(robot) => robot,
            None => unreachable!("slot {} always holds the robot", index),
        }
    }

    pub fn snapshot(&self) -> ArenaSnapshot {
        let robot = self.robot();
        ArenaSnapshot {
            width: self.width,
            height: self.height,
            status: self.status,
            ticks: self.ticks,
            robot: RobotSnapshot {
                lives: robot.lives(),
                bases_captured: robot.bases_captured(),
            },
            entities: self
                .entities()
                .map(|e| {
                    let pose = e.pose();
                    EntitySnapshot {
                        kind: e.kind(),
                        x: pose.x,
                        y: pose.y,
                        radius: e.radius(),
                        captured: e.is_captured(),
                    }
                })
                .collect(),
        }
    }
}
