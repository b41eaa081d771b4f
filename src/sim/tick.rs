//! Fixed timestep simulation tick
//!
//! One `advance_time` call runs exactly one pass, in this order:
//! 1. every entity updates
//! 2. loss, then win, is evaluated
//! 3. each mobile entity resolves its wall overlap, then its overlaps with
//!    every other entity, seeing positions already adjusted earlier in the
//!    same pass

use super::arena::Arena;
use super::collision::{
    adjust_wall_overlap, entity_overlap_displacement, is_colliding, wall_collision,
};
use super::entity::{EntityKind, pair_mut};
use super::state::StatusEvent;
use crate::consts::TICKS_PER_STEP;
use crate::params::OverlapResolution;

impl Arena {
    /// Advance the simulation by one fixed tick.
    ///
    /// Only the sign of `dt` matters: anything not strictly positive
    /// (including NaN) is ignored, and any positive value runs one tick.
    pub fn advance_time(&mut self, dt: f32) {
        if !(dt > 0.0) {
            log::trace!("Ignoring non-positive timestep {}", dt);
            return;
        }
        self.update_entities_timestep();
    }

    fn update_entities_timestep(&mut self) {
        self.ticks += 1;

        for slot in &mut self.entities {
            slot.entity_mut().update(TICKS_PER_STEP);
        }

        self.check_game_over();

        for m in 0..self.mobile_entities.len() {
            let index = self.mobile_entities[m];
            self.resolve_wall_collision(index);
            self.resolve_entity_collisions(index);
        }
    }

    /// Both checks run every tick, whatever the current status
    fn check_game_over(&mut self) {
        let (lives, captured) = {
            let robot = self.robot();
            (robot.lives(), robot.bases_captured())
        };
        if lives == 0 {
            self.transition(StatusEvent::RobotDestroyed);
        }
        if captured >= self.win_threshold {
            self.transition(StatusEvent::AllBasesCaptured);
        }
    }

    fn resolve_wall_collision(&mut self, index: usize) {
        let (width, height) = (self.width, self.height);
        let Some(mobile) = self.entities[index].mobile_mut() else {
            return;
        };

        let wall = wall_collision(mobile.pose(), mobile.radius(), width, height);
        if wall == EntityKind::Undefined {
            return;
        }

        let fixed = adjust_wall_overlap(mobile.pose(), mobile.radius(), wall, width, height);
        mobile.set_position(fixed.x, fixed.y);
        log::debug!(
            "{} hit the {}, moved to ({:.1}, {:.1})",
            mobile.kind(),
            wall,
            fixed.x,
            fixed.y
        );
        mobile.handle_collision(wall, None);
    }

    fn resolve_entity_collisions(&mut self, index: usize) {
        let mode = self.overlap_resolution;

        for other_index in 0..self.entities.len() {
            if other_index == index {
                continue;
            }

            let (mobile_slot, other_slot) = pair_mut(&mut self.entities, index, other_index);
            let Some(mobile) = mobile_slot.mobile_mut() else {
                unreachable!("slot {} is registered as mobile", index);
            };
            let other = other_slot.entity_mut();

            let (pos, radius) = (mobile.pose(), mobile.radius());
            let (other_pos, other_radius) = (other.pose(), other.radius());
            if !is_colliding(pos, radius, other_pos, other_radius) {
                continue;
            }

            if pos == other_pos && mode == OverlapResolution::QuadrantNaive {
                log::warn!(
                    "{} and {} share a center at ({:.1}, {:.1}); overlap direction is undefined",
                    mobile.kind(),
                    other.kind(),
                    pos.x,
                    pos.y
                );
            }

            let moved = pos + entity_overlap_displacement(pos, radius, other_pos, other_radius, mode);
            mobile.set_position(moved.x, moved.y);

            let other_kind = other.kind();
            log::debug!("{} collided with {}", mobile.kind(), other_kind);
            mobile.handle_collision(other_kind, Some(other));
        }
    }
}
