//! Game status and the default entity variants
//!
//! `GameStatus` only changes through `GameStatus::on`, driven by driver
//! commands and the arena's end-of-game checks.

use std::f32::consts::PI;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::reflect_heading;
use super::entity::{Entity, EntityKind, MobileEntity, Pose, RobotEntity};
use crate::params::EntityTuning;
use crate::{heading_vector, normalize_angle};

/// Overall state of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the driver (initial state)
    #[default]
    Paused,
    /// Active gameplay
    Playing,
    /// Robot captured enough bases
    Won,
    /// Robot ran out of lives
    Lost,
}

/// Something that may move the game to another status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    Play,
    Pause,
    Reset,
    RobotDestroyed,
    AllBasesCaptured,
}

impl GameStatus {
    /// Status after `event`.
    ///
    /// Every event is accepted from every status, including the terminal
    /// ones: a forced `Play` resumes a finished game, and the end-of-game
    /// checks run every tick.
    pub fn on(self, event: StatusEvent) -> GameStatus {
        match event {
            StatusEvent::Play | StatusEvent::Reset => GameStatus::Playing,
            StatusEvent::Pause => GameStatus::Paused,
            StatusEvent::RobotDestroyed => GameStatus::Lost,
            StatusEvent::AllBasesCaptured => GameStatus::Won,
        }
    }

    /// Whether a driver should keep stepping the arena
    pub fn is_running(self) -> bool {
        self == GameStatus::Playing
    }

    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Won | GameStatus::Lost)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameStatus::Paused => "Paused",
            GameStatus::Playing => "Playing",
            GameStatus::Won => "Won",
            GameStatus::Lost => "Lost",
        }
    }
}

/// External command accepted between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Command {
    IncreaseSpeed,
    DecreaseSpeed,
    TurnLeft,
    TurnRight,
    Play,
    Pause,
    Reset,
    #[default]
    None,
}

impl FromStr for Command {
    type Err = std::convert::Infallible;

    /// Unknown names parse to `Command::None`, which the arena ignores
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase().replace(['-', '_', ' '], "");
        Ok(match name.as_str() {
            "increasespeed" | "faster" => Command::IncreaseSpeed,
            "decreasespeed" | "slower" => Command::DecreaseSpeed,
            "turnleft" | "left" => Command::TurnLeft,
            "turnright" | "right" => Command::TurnRight,
            "play" => Command::Play,
            "pause" => Command::Pause,
            "reset" => Command::Reset,
            _ => Command::None,
        })
    }
}

/// The player's robot
#[derive(Debug, Clone, PartialEq)]
pub struct Robot {
    pub pos: Vec2,
    pub radius: f32,
    /// Direction of travel (radians, 0 = +x, π/2 = +y)
    pub heading: f32,
    pub speed: f32,
    pub lives: u32,
    pub bases_captured: u32,
    /// Ticks left during which contact damage is ignored
    pub hit_cooldown: u32,

    pub speed_step: f32,
    pub max_speed: f32,
    pub turn_step: f32,
    pub cooldown_ticks: u32,

    initial_pos: Vec2,
    initial_heading: f32,
    initial_lives: u32,
}

impl Robot {
    pub fn new(pos: Vec2, heading: f32, tuning: &EntityTuning) -> Self {
        let heading = normalize_angle(heading);
        Self {
            pos,
            radius: tuning.robot_radius,
            heading,
            speed: 0.0,
            lives: tuning.robot_lives,
            bases_captured: 0,
            hit_cooldown: 0,
            speed_step: tuning.robot_speed_step,
            max_speed: tuning.robot_max_speed,
            turn_step: tuning.robot_turn_step,
            cooldown_ticks: tuning.robot_hit_cooldown_ticks,
            initial_pos: pos,
            initial_heading: heading,
            initial_lives: tuning.robot_lives,
        }
    }

    fn take_hit(&mut self, damage: u32) {
        if self.hit_cooldown > 0 {
            return;
        }
        self.lives = self.lives.saturating_sub(damage);
        self.hit_cooldown = self.cooldown_ticks;
        log::debug!("Robot hit for {} ({} lives left)", damage, self.lives);
    }
}

impl Entity for Robot {
    fn kind(&self) -> EntityKind {
        EntityKind::Robot
    }

    fn pose(&self) -> Pose {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn update(&mut self, ticks: u32) {
        self.pos += heading_vector(self.heading) * self.speed * ticks as f32;
        self.hit_cooldown = self.hit_cooldown.saturating_sub(ticks);
    }

    fn reset(&mut self) {
        self.pos = self.initial_pos;
        self.heading = self.initial_heading;
        self.speed = 0.0;
        self.lives = self.initial_lives;
        self.bases_captured = 0;
        self.hit_cooldown = 0;
    }

    fn handle_collision(&mut self, other: EntityKind, other_entity: Option<&mut dyn Entity>) {
        match other {
            kind if kind.is_wall() => self.heading = reflect_heading(self.heading, kind),
            EntityKind::Base => {
                let captured = other_entity.is_some_and(|base| base.capture());
                if captured {
                    self.bases_captured += 1;
                    log::info!("Base captured ({} total)", self.bases_captured);
                }
            }
            EntityKind::Robot | EntityKind::Obstacle => {
                let damage = other_entity.map_or(0, |e| e.contact_damage());
                if damage > 0 {
                    self.take_hit(damage);
                }
                self.heading = normalize_angle(self.heading + PI);
            }
            _ => {}
        }
    }
}

impl MobileEntity for Robot {
    fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}

impl RobotEntity for Robot {
    fn lives(&self) -> u32 {
        self.lives
    }

    fn bases_captured(&self) -> u32 {
        self.bases_captured
    }

    fn increase_speed(&mut self) {
        self.speed = (self.speed + self.speed_step).min(self.max_speed);
    }

    fn decrease_speed(&mut self) {
        self.speed = (self.speed - self.speed_step).max(0.0);
    }

    // y grows downward, so a left turn is a negative rotation
    fn turn_left(&mut self) {
        self.heading = normalize_angle(self.heading - self.turn_step);
    }

    fn turn_right(&mut self) {
        self.heading = normalize_angle(self.heading + self.turn_step);
    }
}

/// A stationary base the robot captures by touching it
#[derive(Debug, Clone, PartialEq)]
pub struct Base {
    pub pos: Vec2,
    pub radius: f32,
    pub captured: bool,
}

impl Base {
    pub fn new(pos: Vec2, tuning: &EntityTuning) -> Self {
        Self {
            pos,
            radius: tuning.base_radius,
            captured: false,
        }
    }
}

impl Entity for Base {
    fn kind(&self) -> EntityKind {
        EntityKind::Base
    }

    fn pose(&self) -> Pose {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn update(&mut self, _ticks: u32) {}

    fn reset(&mut self) {
        self.captured = false;
    }

    fn handle_collision(&mut self, _other: EntityKind, _other_entity: Option<&mut dyn Entity>) {}

    fn capture(&mut self) -> bool {
        !std::mem::replace(&mut self.captured, true)
    }

    fn is_captured(&self) -> bool {
        self.captured
    }
}

/// A wandering obstacle that costs the robot lives on contact
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
    pub heading: f32,
    pub speed: f32,
    pub damage: u32,

    initial_pos: Vec2,
    initial_heading: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, radius: f32, heading: f32, tuning: &EntityTuning) -> Self {
        let heading = normalize_angle(heading);
        Self {
            pos,
            radius,
            heading,
            speed: tuning.obstacle_speed,
            damage: tuning.obstacle_damage,
            initial_pos: pos,
            initial_heading: heading,
        }
    }
}

impl Entity for Obstacle {
    fn kind(&self) -> EntityKind {
        EntityKind::Obstacle
    }

    fn pose(&self) -> Pose {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn update(&mut self, ticks: u32) {
        self.pos += heading_vector(self.heading) * self.speed * ticks as f32;
    }

    fn reset(&mut self) {
        self.pos = self.initial_pos;
        self.heading = self.initial_heading;
    }

    fn handle_collision(&mut self, other: EntityKind, _other_entity: Option<&mut dyn Entity>) {
        self.heading = if other.is_wall() {
            reflect_heading(self.heading, other)
        } else {
            normalize_angle(self.heading + PI)
        };
    }

    fn contact_damage(&self) -> u32 {
        self.damage
    }
}

impl MobileEntity for Obstacle {
    fn set_position(&mut self, x: f32, y: f32) {
        self.pos = Vec2::new(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuning() -> EntityTuning {
        EntityTuning::default()
    }

    #[test]
    fn test_status_transitions() {
        use GameStatus::*;
        for status in [Paused, Playing, Won, Lost] {
            assert_eq!(status.on(StatusEvent::Play), Playing);
            assert_eq!(status.on(StatusEvent::Pause), Paused);
            assert_eq!(status.on(StatusEvent::Reset), Playing);
            assert_eq!(status.on(StatusEvent::RobotDestroyed), Lost);
            assert_eq!(status.on(StatusEvent::AllBasesCaptured), Won);
        }
        assert!(Playing.is_running());
        assert!(!Paused.is_running());
        assert!(Won.is_over() && Lost.is_over());
        assert_eq!(GameStatus::default(), Paused);
    }

    #[test]
    fn test_command_parsing() {
        assert_eq!("play".parse::<Command>().unwrap(), Command::Play);
        assert_eq!("Turn-Left".parse::<Command>().unwrap(), Command::TurnLeft);
        assert_eq!("increase_speed".parse::<Command>().unwrap(), Command::IncreaseSpeed);
        assert_eq!(" RESET ".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!("jump".parse::<Command>().unwrap(), Command::None);
    }

    #[test]
    fn test_robot_controls_clamp() {
        let mut robot = Robot::new(Vec2::new(50.0, 50.0), 0.0, &tuning());
        robot.decrease_speed();
        assert_eq!(robot.speed, 0.0);
        for _ in 0..100 {
            robot.increase_speed();
        }
        assert_eq!(robot.speed, robot.max_speed);

        robot.turn_right();
        assert!((robot.heading - robot.turn_step).abs() < 1e-6);
        robot.turn_left();
        robot.turn_left();
        assert!((robot.heading + robot.turn_step).abs() < 1e-6);
    }

    #[test]
    fn test_robot_moves_along_heading() {
        let mut robot = Robot::new(Vec2::new(50.0, 50.0), PI / 2.0, &tuning());
        robot.increase_speed();
        robot.increase_speed();
        robot.update(1);
        assert!((robot.pos - Vec2::new(50.0, 52.0)).length() < 1e-4);
    }

    #[test]
    fn test_robot_captures_each_base_once() {
        let mut robot = Robot::new(Vec2::ZERO, 0.0, &tuning());
        let mut base = Base::new(Vec2::new(10.0, 0.0), &tuning());

        robot.handle_collision(EntityKind::Base, Some(&mut base));
        robot.handle_collision(EntityKind::Base, Some(&mut base));
        assert_eq!(robot.bases_captured, 1);
        assert!(base.is_captured());

        base.reset();
        assert!(!base.is_captured());
    }

    #[test]
    fn test_robot_obstacle_damage_and_cooldown() {
        let t = tuning();
        let mut robot = Robot::new(Vec2::ZERO, 0.0, &t);
        let mut obstacle = Obstacle::new(Vec2::new(10.0, 0.0), 10.0, 0.0, &t);
        obstacle.damage = 2;

        robot.handle_collision(EntityKind::Obstacle, Some(&mut obstacle));
        assert_eq!(robot.lives, t.robot_lives - 2);
        assert!((robot.heading.abs() - PI).abs() < 1e-5);

        // Still cooling down
        robot.handle_collision(EntityKind::Obstacle, Some(&mut obstacle));
        assert_eq!(robot.lives, t.robot_lives - 2);

        robot.update(t.robot_hit_cooldown_ticks);
        robot.handle_collision(EntityKind::Obstacle, Some(&mut obstacle));
        assert_eq!(robot.lives, t.robot_lives - 4);
    }

    #[test]
    fn test_robot_lives_saturate() {
        let mut t = tuning();
        t.robot_lives = 1;
        let mut robot = Robot::new(Vec2::ZERO, 0.0, &t);
        let mut obstacle = Obstacle::new(Vec2::ZERO, 10.0, 0.0, &t);
        obstacle.damage = 5;
        robot.handle_collision(EntityKind::Obstacle, Some(&mut obstacle));
        assert_eq!(robot.lives, 0);
    }

    #[test]
    fn test_robot_reset_restores_construction_state() {
        let t = tuning();
        let mut robot = Robot::new(Vec2::new(30.0, 40.0), 1.0, &t);
        let fresh = robot.clone();

        robot.increase_speed();
        robot.turn_left();
        robot.update(5);
        robot.lives = 2;
        robot.bases_captured = 3;
        robot.hit_cooldown = 7;
        assert_ne!(robot, fresh);

        robot.reset();
        assert_eq!(robot, fresh);
    }

    #[test]
    fn test_obstacle_bounces() {
        let t = tuning();
        let mut obstacle = Obstacle::new(Vec2::new(50.0, 50.0), 10.0, 0.0, &t);
        obstacle.handle_collision(EntityKind::RightWall, None);
        assert!((obstacle.heading.abs() - PI).abs() < 1e-5);

        obstacle.handle_collision(EntityKind::Robot, None);
        assert!(obstacle.heading.abs() < 1e-5);

        obstacle.update(3);
        assert!((obstacle.pos - Vec2::new(50.0 + 3.0 * t.obstacle_speed, 50.0)).length() < 1e-4);
        obstacle.reset();
        assert_eq!(obstacle.pos, Vec2::new(50.0, 50.0));
        assert_eq!(obstacle.contact_damage(), t.obstacle_damage);
    }
}
