//! Collision detection and response for circles in a rectangular arena
//!
//! Pure functions over positions and radii. The arena feeds them the current
//! poses and applies what they return.

use glam::Vec2;

use super::entity::EntityKind;
use crate::consts::WALL_MARGIN;
use crate::normalize_angle;
use crate::params::OverlapResolution;

/// Which wall (if any) a circle at `pos` overlaps.
///
/// Walls are tested right, left, bottom, top and only the first hit is
/// reported, so a circle in a corner reports a single wall.
pub fn wall_collision(pos: Vec2, radius: f32, width: f32, height: f32) -> EntityKind {
    if pos.x + radius >= width {
        EntityKind::RightWall
    } else if pos.x - radius <= 0.0 {
        EntityKind::LeftWall
    } else if pos.y + radius >= height {
        EntityKind::BottomWall
    } else if pos.y - radius <= 0.0 {
        EntityKind::TopWall
    } else {
        EntityKind::Undefined
    }
}

/// Position that puts the circle's edge `WALL_MARGIN` inside `wall`.
///
/// Only the axis of the offending wall changes. Non-wall kinds return `pos`.
pub fn adjust_wall_overlap(
    pos: Vec2,
    radius: f32,
    wall: EntityKind,
    width: f32,
    height: f32,
) -> Vec2 {
    match wall {
        EntityKind::RightWall => Vec2::new(width - (radius + WALL_MARGIN), pos.y),
        EntityKind::LeftWall => Vec2::new(radius + WALL_MARGIN, pos.y),
        EntityKind::TopWall => Vec2::new(pos.x, radius + WALL_MARGIN),
        EntityKind::BottomWall => Vec2::new(pos.x, height - (radius + WALL_MARGIN)),
        _ => pos,
    }
}

/// Circle-circle overlap test. Touching circles count as colliding.
#[inline]
pub fn is_colliding(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) <= a_radius + b_radius
}

/// Displacement to add to the mobile circle's position after it overlapped
/// `other`.
///
/// The magnitude is the penetration depth `(r1 + r2) - distance`. The
/// direction depends on `mode`, see [`OverlapResolution`].
pub fn entity_overlap_displacement(
    mobile_pos: Vec2,
    mobile_radius: f32,
    other_pos: Vec2,
    other_radius: f32,
    mode: OverlapResolution,
) -> Vec2 {
    let delta = other_pos - mobile_pos;
    let distance = delta.length();
    let penetration = mobile_radius + other_radius - distance;

    let angle = match mode {
        // Single-argument arctangent: no quadrant information
        OverlapResolution::QuadrantNaive => (delta.y / delta.x).atan(),
        OverlapResolution::Separating => {
            let away = mobile_pos - other_pos;
            away.y.atan2(away.x)
        }
    };

    Vec2::new(angle.cos(), angle.sin()) * penetration
}

/// Heading after bouncing off `wall`.
///
/// Vertical walls mirror the x component, horizontal walls the y component.
/// Any other kind leaves the heading unchanged.
pub fn reflect_heading(heading: f32, wall: EntityKind) -> f32 {
    use std::f32::consts::PI;
    match wall {
        EntityKind::RightWall | EntityKind::LeftWall => normalize_angle(PI - heading),
        EntityKind::TopWall | EntityKind::BottomWall => normalize_angle(-heading),
        _ => heading,
    }
}
