//! Flappy Croco - a one-button side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Simulation (physics, obstacles, collisions, mode machine)
//! - `session`: Simulation context wired to storage and platform services
//! - `renderer`: Frame description and WebGPU pipeline
//! - `platform`: Game platform SDK abstraction (ads, gameplay markers)
//! - `persistence`: High score and preference storage
//! - `settings`: Runtime-tunable game parameters

pub mod assets;
pub mod audio;
pub mod clock;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{SettingsError, TunableKey, Tunables};

/// Game configuration constants
pub mod consts {
    /// Simulation rate. Physics constants are expressed per tick.
    pub const TICK_RATE: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Base tunables (per tick, pixels)
    pub const BASE_GRAVITY: f32 = 0.13;
    pub const BASE_JUMP_FORCE: f32 = -3.0;
    pub const BASE_OBSTACLE_SPEED: f32 = 1.0;
    pub const BASE_GAP: f32 = 250.0;
    pub const BASE_SPAWN_SPACING: f32 = 400.0;
    pub const BASE_OBSTACLE_WIDTH: f32 = 180.0;

    /// Player body
    pub const PLAYER_WIDTH: f32 = 120.0;
    pub const PLAYER_HEIGHT: f32 = 90.0;
    pub const PLAYER_START_X_FRAC: f32 = 0.2;
    pub const PLAYER_START_Y_FRAC: f32 = 0.4;

    /// Rotation (degrees)
    pub const JUMP_ROTATION_DEG: f32 = -30.0;
    pub const MAX_ROTATION_DEG: f32 = 90.0;
    pub const ROTATION_PER_VELOCITY: f32 = 3.0;

    /// Layout as fractions of field height
    pub const GROUND_Y_FRAC: f32 = 0.9;
    pub const GAP_CENTER_MIN_FRAC: f32 = 0.2;
    pub const GAP_CENTER_MAX_FRAC: f32 = 0.6;

    /// Field sizing (4:3, capped)
    pub const FIELD_MAX_WIDTH: f32 = 800.0;
    pub const FIELD_MAX_HEIGHT: f32 = 600.0;
    pub const FIELD_MARGIN: f32 = 40.0;

    /// Interstitial ad every Nth game over
    pub const AD_INTERVAL: u32 = 3;

    /// SDK readiness polling bound (10 seconds total)
    pub const SDK_POLL_ATTEMPTS: u32 = 100;
    pub const SDK_POLL_INTERVAL_MS: i32 = 100;
}
