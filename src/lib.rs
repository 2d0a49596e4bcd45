//! Lumen Maze - a light-chasing maze game core
//!
//! Core modules:
//! - `maze`: Spanning-tree maze generation and solving
//! - `sim`: Simulation (spatial index, collisions, world state, per-tick step)
//! - `settings`: Data-driven configuration
//! - `error`: Error types shared by the modules above
//!
//! Rendering and input capture live outside this crate. The host feeds a
//! [`sim::TickInput`] each frame and draws the returned [`sim::WorldSnapshot`].

pub mod error;
pub mod maze;
pub mod settings;
pub mod sim;

pub use error::{MazeError, SettingsError};
pub use settings::Settings;

/// Fixed simulation constants
pub mod consts {
    /// Largest time step a single tick will integrate (seconds)
    pub const MAX_DT: f32 = 0.1;

    /// Acceleration applied by a unit intent vector (world units/s²)
    pub const PLAYER_ACCELERATION: f32 = 1000.0;
    /// Per-tick impulse damping (drag)
    pub const PLAYER_DRAG: f32 = 0.96;
    /// Impulse kept after bouncing off a wall
    pub const WALL_RESTITUTION: f32 = 0.7;

    /// Player body radius at zero health
    pub const PLAYER_MIN_RADIUS: f32 = 10.0;
    /// Extra player body radius at full health
    pub const PLAYER_RADIUS_RANGE: f32 = 20.0;
    /// Player body radius before the first tick
    pub const PLAYER_START_RADIUS: f32 = 30.0;
    /// Player light intensity at full health
    pub const PLAYER_MAX_INTENSITY: f32 = 0.6;

    /// Health ceiling
    pub const MAX_HEALTH: f32 = 100.0;
    /// Health lost per second
    pub const HEALTH_DRAIN_PER_SEC: f32 = 100.0 / 60.0;
    /// Health restored by a light pickup
    pub const PICKUP_HEALTH: f32 = 50.0;
    /// Health spent to drop a marker light
    pub const HINT_COST: f32 = 20.0;

    /// Fraction of interior path cells that receive a hint light
    pub const HINT_FRACTION: f32 = 0.4;
}

/// Colour packed as 0xRRGGBB
pub type Rgb = u32;
