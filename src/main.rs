//! Lumen Maze headless driver
//!
//! Runs the simulation without a renderer. An autopilot walks the solved
//! route through each maze while the stats are logged.
//!
//! Usage: `lumen-maze [settings.json] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
use lumen_maze::Settings;
#[cfg(not(target_arch = "wasm32"))]
use lumen_maze::sim::{TickInput, World, step};

/// Simulation timestep (60 Hz)
#[cfg(not(target_arch = "wasm32"))]
const SIM_DT: f32 = 1.0 / 60.0;
/// Two minutes of play
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u32 = 60 * 120;
/// Ticks between stat log lines
#[cfg(not(target_arch = "wasm32"))]
const LOG_INTERVAL: u32 = 600;

/// Follows the solution route chamber by chamber
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Autopilot {
    waypoint: usize,
    generation: u32,
}

#[cfg(not(target_arch = "wasm32"))]
impl Autopilot {
    /// Distance at which a waypoint counts as reached
    const ARRIVE_DISTANCE: f32 = 20.0;
    /// Cruise speed between chambers
    const MAX_SPEED: f32 = 300.0;
    /// Speed per unit of remaining distance when closing in
    const APPROACH_GAIN: f32 = 3.0;
    /// Leave a marker on arrival while health is at least this high
    const MARKER_HEALTH: f32 = 80.0;

    fn input(&mut self, world: &World) -> TickInput {
        if world.stats.generations != self.generation {
            self.generation = world.stats.generations;
            self.waypoint = 0;
        }

        let route = world.route();
        let pos = world.player.body.pos;

        let mut arrived = false;
        while self.waypoint + 1 < route.len()
            && pos.distance(route[self.waypoint]) < Self::ARRIVE_DISTANCE
        {
            self.waypoint += 1;
            arrived = true;
        }

        let Some(&target) = route.get(self.waypoint) else {
            return TickInput::default();
        };

        // Steer toward the velocity we want, not the target itself, so the
        // player slows down before each turn.
        let desired = ((target - pos) * Self::APPROACH_GAIN).clamp_length_max(Self::MAX_SPEED);
        TickInput {
            intent: desired - world.player.impulse,
            drop_hint: arrived && self.waypoint > 1 && world.stats.health >= Self::MARKER_HEALTH,
            ..Default::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(settings: Settings, ticks: u32) -> Result<(), Box<dyn std::error::Error>> {
    let mut world = World::new(settings)?;
    let mut pilot = Autopilot::default();

    for tick in 0..ticks {
        let input = pilot.input(&world);
        let snapshot = step(&mut world, &input, SIM_DT)?;

        if tick % LOG_INTERVAL == 0 {
            let stats = snapshot.stats;
            log::info!(
                "t={:>5.1}s maze #{} ({}x{}) score {:.0} health {:.0} lights {} | {} walls, {} lights in view",
                tick as f32 * SIM_DT,
                stats.generations,
                stats.maze_size,
                stats.maze_size,
                stats.score,
                stats.health,
                stats.lights,
                snapshot.static_obstacles.len(),
                snapshot.active_lights.len()
            );
        }
    }

    let stats = world.stats;
    println!(
        "Finished {} maze(s), reached size {}, score {:.0}",
        stats.generations - 1,
        stats.maze_size,
        stats.score
    );
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lumen Maze (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let ticks = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    if let Err(e) = run(settings, ticks) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is driven by a host page on the web; nothing to run here
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_autopilot_heads_for_next_chamber() {
        let world = World::new(Settings::default()).unwrap();
        let mut pilot = Autopilot::default();
        let input = pilot.input(&world);

        let route = world.route();
        assert_eq!(pilot.waypoint, 1);
        assert!(input.intent.dot(route[1] - route[0]) > 0.0);
        assert!(!input.drop_hint);
    }

    #[test]
    fn test_autopilot_completes_first_maze() {
        let mut world = World::new(Settings::default()).unwrap();
        let mut pilot = Autopilot::default();

        for _ in 0..DEFAULT_TICKS {
            let input = pilot.input(&world);
            step(&mut world, &input, SIM_DT).unwrap();
            if world.stats.generations > 1 {
                break;
            }
        }

        assert!(world.stats.generations > 1, "finish never reached");
        assert_eq!(world.stats.maze_size, 7);
        assert!(world.stats.score > 0.0);

        // New maze: the pilot starts over from the new route
        pilot.input(&world);
        assert_eq!(pilot.generation, world.stats.generations);
        assert_eq!(pilot.waypoint, 1);
    }
}
