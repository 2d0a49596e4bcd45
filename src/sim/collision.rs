//! Narrow-phase collision response for the player
//!
//! The player circle is tested against each obstacle's Minkowski-sum
//! rectangle (obstacle grown by the player radius on every side). Overlaps
//! are corrected along the axis of least penetration only.

use glam::Vec2;

use super::body::Body;
use super::state::Player;
use crate::consts::WALL_RESTITUTION;

/// Axis a contact was resolved along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of resolving one obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub axis: Axis,
    /// Distance the player was pushed out
    pub penetration: f32,
    /// Unit push direction (away from the obstacle)
    pub normal: Vec2,
}

/// Resolve a single obstacle against the player
///
/// Returns `None` when the shapes do not overlap. Touching edges are not a
/// collision.
pub fn resolve_one(player: &mut Player, obstacle: &Body) -> Option<Contact> {
    let radius = player.radius();
    debug_assert!(radius >= 0.0, "negative player radius");

    let delta = obstacle.pos - player.body.pos;
    let min_distance = Vec2::splat(radius) + obstacle.size() * 0.5;

    if delta.x.abs() >= min_distance.x || delta.y.abs() >= min_distance.y {
        return None;
    }

    let overlap = min_distance - delta.abs();

    if overlap.x < overlap.y {
        let away = if delta.x > 0.0 { -1.0 } else { 1.0 };
        player.body.pos.x += overlap.x * away;
        player.impulse.x = away * player.impulse.x.abs() * WALL_RESTITUTION;
        Some(Contact {
            axis: Axis::X,
            penetration: overlap.x,
            normal: Vec2::new(away, 0.0),
        })
    } else {
        let away = if delta.y > 0.0 { -1.0 } else { 1.0 };
        player.body.pos.y += overlap.y * away;
        player.impulse.y = away * player.impulse.y.abs() * WALL_RESTITUTION;
        Some(Contact {
            axis: Axis::Y,
            penetration: overlap.y,
            normal: Vec2::new(0.0, away),
        })
    }
}

/// Resolve every candidate obstacle in order, returning the number of contacts
///
/// Inactive obstacles are skipped. Each obstacle sees the player position
/// left by the previous one, so simultaneous contacts are order-dependent.
pub fn resolve<'a, I>(player: &mut Player, obstacles: I) -> usize
where
    I: IntoIterator<Item = &'a Body>,
{
    obstacles
        .into_iter()
        .filter(|o| o.is_active())
        .filter_map(|o| resolve_one(player, o))
        .count()
}
