//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles oldest first)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod mode;
pub mod obstacles;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use mode::{GameMode, ModeEvent};
pub use state::{CrashCause, Field, GameEvent, GameState, Obstacle, Player};
pub use tick::{TickInput, tick};
