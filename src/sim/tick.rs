//! Per-frame simulation step
//!
//! One call to [`step`] runs, in order: background maze building, motion
//! integration, broad-phase wall query, narrow-phase resolution, light
//! pickups and bookkeeping, then the viewport queries for the renderer.

use glam::Vec2;

use super::body::{Body, Spatial};
use super::boundary::Boundary;
use super::collision;
use super::state::{GameStats, Light, LightKind, Player, World};
use super::tree::SpatialIndex;
use crate::consts::*;
use crate::error::MazeError;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (normalized before use)
    pub intent: Vec2,
    /// Drop a marker light at the player's position (one-shot)
    pub drop_hint: bool,
    /// Replace the maze with a fresh one of the same size (debug, one-shot)
    pub skip_maze: bool,
}

/// What the renderer needs after a tick
#[derive(Debug, Clone)]
pub struct WorldSnapshot<'a> {
    /// Visible area centered on the player
    pub view: Boundary,
    pub player: &'a Player,
    /// Visible walls and doors
    pub static_obstacles: Vec<&'a Body>,
    /// Visible light bodies (finish, hints, markers)
    pub dynamic_entities: Vec<&'a Light>,
    /// Lights close enough to affect the view
    pub active_lights: Vec<&'a Light>,
    pub stats: GameStats,
    /// A new maze is being built
    pub rebuilding: bool,
}

/// Advance the world by `dt` seconds
pub fn step<'a>(
    world: &'a mut World,
    input: &TickInput,
    dt: f32,
) -> Result<WorldSnapshot<'a>, MazeError> {
    world.advance_build()?;

    if input.skip_maze {
        let size = world.stats.maze_size;
        world.regenerate(size)?;
    }

    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_DT)
    } else {
        0.0
    };

    integrate(&mut world.player, input.intent, dt);
    let contacts = resolve_walls(world);
    if contacts > 0 {
        log::trace!("Resolved {contacts} wall contact(s)");
    }
    collect_pickups(world)?;

    if input.drop_hint {
        drop_marker(world);
    }

    world.stats.health = (world.stats.health - HEALTH_DRAIN_PER_SEC * dt).max(0.0);
    world.player.apply_health(world.stats.health);

    world.dynamic_index = SpatialIndex::build(
        &world.lights,
        world.settings.dynamic_branch_factor,
        world.settings.dynamic_leaf_capacity,
    );

    Ok(snapshot(world))
}

/// Accelerate toward the intent, apply drag, then move
fn integrate(player: &mut Player, intent: Vec2, dt: f32) {
    let intent = intent.normalize_or_zero();
    player.impulse += intent * PLAYER_ACCELERATION * dt;
    player.impulse *= PLAYER_DRAG;
    player.body.pos += player.impulse * dt;
}

fn resolve_walls(world: &mut World) -> usize {
    let index = world.static_index.get_or_insert_with(|| {
        let index = SpatialIndex::build(
            &world.obstacles,
            world.settings.static_branch_factor,
            world.settings.static_leaf_capacity,
        );
        log::debug!(
            "Built static index: {} bodies, {} nodes, depth {}",
            index.len(),
            index.node_count(),
            index.depth()
        );
        index
    });

    let candidates = index.overlapping(&world.player.body.boundary());
    collision::resolve(
        &mut world.player,
        candidates.iter().map(|&i| &world.obstacles[i]),
    )
}

fn collect_pickups(world: &mut World) -> Result<(), MazeError> {
    let pos = world.player.body.pos;
    let radius = world.player.radius();

    let mut picked = Vec::new();
    world.lights.retain(|light| {
        if light.touches(pos, radius) {
            picked.push((light.kind, light.body.color));
            false
        } else {
            true
        }
    });

    for (kind, color) in picked {
        let stats = &mut world.stats;
        stats.lights = stats.lights.saturating_sub(1);
        stats.score += stats.health * stats.health / 100.0;
        stats.health = (stats.health + PICKUP_HEALTH).min(MAX_HEALTH);
        world.player.body.color = color;

        if kind == LightKind::Finish {
            let size = stats.maze_size + world.settings.maze_growth;
            log::info!("Finish reached with score {:.0}", stats.score);
            world.regenerate(size)?;
        }
    }
    Ok(())
}

fn drop_marker(world: &mut World) {
    if world.stats.health < HINT_COST {
        log::debug!("Not enough health to drop a marker");
        return;
    }
    let player = &world.player.body;
    world.lights.push(Light::marker(player.pos, player.color));
    world.stats.health = (world.stats.health - HINT_COST).max(0.0);
    log::debug!("Dropped marker at {}", world.player.body.pos);
}

fn snapshot(world: &World) -> WorldSnapshot<'_> {
    let settings = &world.settings;
    let view = Boundary::from_center(
        world.player.body.pos,
        Vec2::new(settings.view_width, settings.view_height),
    );
    let clip = view.expanded(
        view.width() * settings.clip_margin,
        view.height() * settings.clip_margin,
    );
    let light_clip = view.expanded(
        view.width() * settings.light_margin,
        view.height() * settings.light_margin,
    );

    let static_obstacles: Vec<&Body> = world
        .static_index
        .as_ref()
        .map(|index| {
            index
                .query_items(&world.obstacles, &clip)
                .filter(|b| b.is_active())
                .collect()
        })
        .unwrap_or_default();

    let dynamic_entities: Vec<&Light> = world
        .dynamic_index
        .query_items(&world.lights, &clip)
        .filter(|l| l.body.is_active())
        .collect();

    let active_lights: Vec<&Light> = world
        .dynamic_index
        .query_items(&world.lights, &light_clip)
        .filter(|l| l.intensity > 0.0)
        .collect();

    WorldSnapshot {
        view,
        player: &world.player,
        static_obstacles,
        dynamic_entities,
        active_lights,
        stats: world.stats,
        rebuilding: world.is_rebuilding(),
    }
}
