//! World state and entity types
//!
//! A [`World`] owns everything the simulation mutates: the obstacle list,
//! lights, player, stats and the cached spatial indexes. Installing a maze
//! rebuilds all of it from a [`SolvedMaze`].

use glam::Vec2;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::{Body, Spatial};
use super::boundary::Boundary;
use super::chamber::{CHAMBER_SIZE, Chamber};
use super::tree::SpatialIndex;
use crate::Rgb;
use crate::consts::*;
use crate::error::MazeError;
use crate::maze::{Cell, CellState, Direction, MazeBuildTask, SolvedMaze, build_solvable};
use crate::settings::Settings;

pub const PLAYER_COLOR: Rgb = 0xff5100;
pub const PLAYER_START_INTENSITY: f32 = 0.4;
pub const PLAYER_LIGHT_RADIUS: f32 = 600.0;

pub const FINISH_COLOR: Rgb = 0xe905fc;
pub const FINISH_RADIUS: f32 = 40.0;
pub const FINISH_INTENSITY: f32 = 0.5;
pub const FINISH_LIGHT_RADIUS: f32 = 400.0;

pub const HINT_RADIUS: f32 = 20.0;
pub const HINT_INTENSITY: f32 = 0.3;
pub const HINT_LIGHT_RADIUS: f32 = 300.0;
pub const HINT_PALETTE: [Rgb; 5] = [0x5e26ea, 0xea266b, 0x26a5ea, 0x26ea6b, 0xb9ea26];

pub const MARKER_SIZE: f32 = 20.0;
pub const MARKER_INTENSITY: f32 = 0.5;
pub const MARKER_LIGHT_RADIUS: f32 = 400.0;

/// The player: a moving light with a circular body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Velocity-like accumulator, damped every tick
    pub impulse: Vec2,
    pub intensity: f32,
    pub light_radius: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::circle(pos, PLAYER_START_RADIUS).with_color(PLAYER_COLOR),
            impulse: Vec2::ZERO,
            intensity: PLAYER_START_INTENSITY,
            light_radius: PLAYER_LIGHT_RADIUS,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.body.radius().unwrap_or(0.0)
    }

    /// Scale light and body with remaining health
    pub fn apply_health(&mut self, health: f32) {
        let fraction = (health / MAX_HEALTH).clamp(0.0, 1.0);
        self.intensity = PLAYER_MAX_INTENSITY * fraction;
        self.body.set_radius(PLAYER_MIN_RADIUS + PLAYER_RADIUS_RANGE * fraction);
    }
}

/// What a light is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightKind {
    /// End of the maze; picking it up grows the next maze
    Finish,
    /// Placed along the solution path
    Hint,
    /// Dropped by the player; never picked up
    Marker,
}

/// A point light with a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub body: Body,
    pub intensity: f32,
    /// Reach of the light
    pub radius: f32,
}

impl Light {
    pub fn finish(pos: Vec2) -> Self {
        Self {
            kind: LightKind::Finish,
            body: Body::circle(pos, FINISH_RADIUS).with_color(FINISH_COLOR),
            intensity: FINISH_INTENSITY,
            radius: FINISH_LIGHT_RADIUS,
        }
    }

    pub fn hint(pos: Vec2, color: Rgb) -> Self {
        Self {
            kind: LightKind::Hint,
            body: Body::circle(pos, HINT_RADIUS).with_color(color),
            intensity: HINT_INTENSITY,
            radius: HINT_LIGHT_RADIUS,
        }
    }

    pub fn marker(pos: Vec2, color: Rgb) -> Self {
        let mut body = Body::rect(pos, Vec2::splat(MARKER_SIZE)).with_color(color);
        body.casts_shadows = false;
        Self {
            kind: LightKind::Marker,
            body,
            intensity: MARKER_INTENSITY,
            radius: MARKER_LIGHT_RADIUS,
        }
    }

    /// True when a circle at `pos` with `radius` picks this light up
    pub fn touches(&self, pos: Vec2, radius: f32) -> bool {
        if self.kind == LightKind::Marker {
            return false;
        }
        let reach = radius + self.body.radius().unwrap_or(0.0);
        pos.distance(self.body.pos) < reach
    }
}

impl Spatial for Light {
    fn position(&self) -> Vec2 {
        self.body.pos
    }

    fn boundary(&self) -> Boundary {
        self.body.boundary()
    }
}

/// Score and progress shown to the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub score: f32,
    pub health: f32,
    /// Pickups left in the current maze
    pub lights: usize,
    /// Side length of the current maze
    pub maze_size: usize,
    /// Mazes installed so far
    pub generations: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            score: 0.0,
            health: MAX_HEALTH,
            lights: 0,
            maze_size: 0,
            generations: 0,
        }
    }
}

/// Center of `cell` in a maze of `size` cells per side
pub fn chamber_center(origin: Vec2, size: usize, cell: Cell) -> Vec2 {
    let offset = Vec2::new(cell.x as f32, cell.y as f32) - Vec2::splat(size as f32 / 2.0);
    origin + CHAMBER_SIZE * offset
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub settings: Settings,
    pub(super) rng: Pcg32,
    /// World position of the maze center
    pub origin: Vec2,

    /// Walls and doors, hidden ones included
    ///
    /// The cached static index refers to these by position in the list, so
    /// changes go through [`World::install_maze`].
    pub(crate) obstacles: Vec<Body>,
    /// One chamber per maze cell, row-major
    pub chambers: Vec<Chamber>,
    pub lights: Vec<Light>,
    pub player: Player,
    pub stats: GameStats,

    /// Built lazily, dropped whenever the obstacles change
    pub(super) static_index: Option<SpatialIndex>,
    /// Rebuilt every tick
    pub(super) dynamic_index: SpatialIndex,
    /// Maze being built in the background
    pub(super) pending: Option<MazeBuildTask>,

    maze: SolvedMaze,
    route: Vec<Vec2>,
}

impl World {
    /// Build the first maze synchronously and populate the world
    ///
    /// Fails if `settings` does not pass [`Settings::validate`].
    pub fn new(settings: Settings) -> Result<Self, MazeError> {
        settings.validate()?;
        let mut rng = Pcg32::seed_from_u64(settings.seed);
        let maze = build_solvable(
            settings.initial_maze_size,
            settings.max_build_attempts,
            &mut rng,
        )?;

        let mut world = Self {
            rng,
            origin: Vec2::ZERO,
            obstacles: Vec::new(),
            chambers: Vec::new(),
            lights: Vec::new(),
            player: Player::new(Vec2::ZERO),
            stats: GameStats::default(),
            static_index: None,
            dynamic_index: SpatialIndex::build::<Light>(&[], 2, 1),
            pending: None,
            maze,
            route: Vec::new(),
            settings,
        };
        world.populate();
        Ok(world)
    }

    /// The maze currently being played
    pub fn maze(&self) -> &SolvedMaze {
        &self.maze
    }

    /// Chamber centers along the solution, start first
    pub fn route(&self) -> &[Vec2] {
        &self.route
    }

    /// True while a new maze is being built
    pub fn is_rebuilding(&self) -> bool {
        self.pending.is_some()
    }

    /// Walls and doors, hidden ones included
    pub fn obstacles(&self) -> &[Body] {
        &self.obstacles
    }

    pub fn static_index(&self) -> Option<&SpatialIndex> {
        self.static_index.as_ref()
    }

    pub fn dynamic_index(&self) -> &SpatialIndex {
        &self.dynamic_index
    }

    /// Start building a new maze; the current one stays playable meanwhile
    ///
    /// Replaces any build already in progress.
    pub fn regenerate(&mut self, size: usize) -> Result<(), MazeError> {
        let task = MazeBuildTask::new(size, self.settings.max_build_attempts)?;
        if self.pending.replace(task).is_some() {
            log::debug!("Dropping unfinished maze build");
        }
        log::info!("Building {size}x{size} maze");
        Ok(())
    }

    /// Build and install a new maze immediately
    pub fn regenerate_now(&mut self, size: usize) -> Result<(), MazeError> {
        self.pending = None;
        let maze = build_solvable(size, self.settings.max_build_attempts, &mut self.rng)?;
        self.install_maze(maze);
        Ok(())
    }

    /// Replace the current maze and everything placed in it
    pub fn install_maze(&mut self, maze: SolvedMaze) {
        self.maze = maze;
        self.populate();
    }

    /// Run the pending build for one tick's worth of attempts
    ///
    /// Returns true when a new maze was installed.
    pub(super) fn advance_build(&mut self) -> Result<bool, MazeError> {
        let Some(task) = &mut self.pending else {
            return Ok(false);
        };

        match task.advance(self.settings.build_attempts_per_tick, &mut self.rng) {
            std::task::Poll::Pending => Ok(false),
            std::task::Poll::Ready(result) => {
                self.pending = None;
                self.install_maze(result?);
                Ok(true)
            }
        }
    }

    fn populate(&mut self) {
        let size = self.maze.size();
        let origin = self.origin;

        self.static_index = None;
        self.obstacles.clear();
        self.chambers.clear();
        self.lights.clear();

        for (cell, _) in self.maze.grid.cells() {
            let chamber = Chamber::build(chamber_center(origin, size, cell), &mut self.obstacles);
            if cell.x > 0 {
                chamber.set_side(&mut self.obstacles, Direction::Left, false);
            }
            if cell.y > 0 {
                chamber.set_side(&mut self.obstacles, Direction::Top, false);
            }
            self.chambers.push(chamber);
        }

        // Open the door on every tree edge. Shared sides belong to the
        // left/upper chamber.
        for (cell, state) in self.maze.grid.cells() {
            let CellState::Entered(side) = state else {
                continue;
            };
            let (owner, door) = match side {
                Direction::Left if cell.x > 0 => (Cell::new(cell.x - 1, cell.y), Direction::Right),
                Direction::Top if cell.y > 0 => (Cell::new(cell.x, cell.y - 1), Direction::Bottom),
                _ => (cell, side),
            };
            self.chambers[owner.y * size + owner.x].set_door(&mut self.obstacles, door, true);
        }

        self.route = self
            .maze
            .path
            .cells()
            .iter()
            .map(|&cell| chamber_center(origin, size, cell))
            .collect();

        self.player.body.pos = chamber_center(origin, size, self.maze.start);
        self.player.impulse = Vec2::ZERO;
        self.lights
            .push(Light::finish(chamber_center(origin, size, self.maze.finish)));

        // Hints go on interior path cells only
        let interior = self.route.len().saturating_sub(2);
        let hint_count = (interior as f32 * HINT_FRACTION).floor() as usize;
        let mut picks: Vec<bool> = (0..interior).map(|i| i < hint_count).collect();
        picks.shuffle(&mut self.rng);

        for (&pos, _) in self
            .route
            .iter()
            .skip(1)
            .zip(&picks)
            .filter(|&(_, &picked)| picked)
        {
            let color = HINT_PALETTE[self.rng.random_range(0..HINT_PALETTE.len())];
            self.lights.push(Light::hint(pos, color));
        }

        self.stats.health = MAX_HEALTH;
        self.stats.maze_size = size;
        self.stats.lights = hint_count + 1;
        self.stats.generations += 1;
        self.player.apply_health(self.stats.health);

        self.dynamic_index = SpatialIndex::build(
            &self.lights,
            self.settings.dynamic_branch_factor,
            self.settings.dynamic_leaf_capacity,
        );

        log::info!(
            "Installed {size}x{size} maze #{}: path {} cells, {hint_count} hints",
            self.stats.generations,
            self.route.len()
        );
    }
}
