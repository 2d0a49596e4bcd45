//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (owned by the [`World`])
//! - Stable iteration order (obstacle and light lists are never reordered)
//! - No rendering or platform dependencies

pub mod body;
pub mod boundary;
pub mod chamber;
pub mod collision;
pub mod state;
pub mod tick;
pub mod tree;

pub use body::{Body, Shape, Spatial};
pub use boundary::Boundary;
pub use chamber::{CHAMBER_SIZE, Chamber};
pub use collision::{Axis, Contact, resolve, resolve_one};
pub use state::{GameStats, Light, LightKind, Player, World, chamber_center};
pub use tick::{TickInput, WorldSnapshot, step};
pub use tree::{SpatialIndex, SpatialNode};
