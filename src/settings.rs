//! Runtime-tunable game parameters
//!
//! Fed by the settings sliders. Changes take effect on the next tick; state
//! already in flight (obstacle widths, current velocity) is not rescaled.
//! Persisted separately from save data in LocalStorage.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rejected settings update. The previous value is always kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("unknown setting `{0}`")]
    UnknownKey(String),
    #[error("setting `{key}` expects a number, got `{raw}`")]
    NotNumeric { key: &'static str, raw: String },
    #[error("setting `{key}` = {value} is outside {min}..={max}")]
    OutOfRange {
        key: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}

/// Named tunable parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TunableKey {
    Gravity,
    JumpForce,
    ObstacleSpeed,
    Gap,
    SpawnSpacing,
    PlayerSize,
    ObstacleSize,
    PlayerCollisionWidth,
    PlayerCollisionHeight,
    ObstacleCollisionWidth,
    ObstacleCollisionHeight,
    GameSpeed,
}

impl TunableKey {
    pub const ALL: [TunableKey; 12] = [
        TunableKey::Gravity,
        TunableKey::JumpForce,
        TunableKey::ObstacleSpeed,
        TunableKey::Gap,
        TunableKey::SpawnSpacing,
        TunableKey::PlayerSize,
        TunableKey::ObstacleSize,
        TunableKey::PlayerCollisionWidth,
        TunableKey::PlayerCollisionHeight,
        TunableKey::ObstacleCollisionWidth,
        TunableKey::ObstacleCollisionHeight,
        TunableKey::GameSpeed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TunableKey::Gravity => "gravity",
            TunableKey::JumpForce => "jumpForce",
            TunableKey::ObstacleSpeed => "obstacleSpeed",
            TunableKey::Gap => "gap",
            TunableKey::SpawnSpacing => "spawnSpacing",
            TunableKey::PlayerSize => "playerSize",
            TunableKey::ObstacleSize => "obstacleSize",
            TunableKey::PlayerCollisionWidth => "playerCollisionWidth",
            TunableKey::PlayerCollisionHeight => "playerCollisionHeight",
            TunableKey::ObstacleCollisionWidth => "obstacleCollisionWidth",
            TunableKey::ObstacleCollisionHeight => "obstacleCollisionHeight",
            TunableKey::GameSpeed => "gameSpeed",
        }
    }

    /// Accepted value range (inclusive)
    pub fn range(&self) -> (f32, f32) {
        match self {
            TunableKey::Gravity => (0.0, 2.0),
            TunableKey::JumpForce => (-20.0, -0.1),
            TunableKey::ObstacleSpeed => (0.0, 20.0),
            TunableKey::Gap => (50.0, 600.0),
            TunableKey::SpawnSpacing => (100.0, 2000.0),
            TunableKey::PlayerSize | TunableKey::ObstacleSize => (0.1, 3.0),
            TunableKey::PlayerCollisionWidth
            | TunableKey::PlayerCollisionHeight
            | TunableKey::ObstacleCollisionWidth
            | TunableKey::ObstacleCollisionHeight => (0.0, 1.0),
            TunableKey::GameSpeed => (0.1, 5.0),
        }
    }
}

/// Parse a key name. Slider element ids from the page are accepted too.
impl FromStr for TunableKey {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gravity" => Ok(TunableKey::Gravity),
            "jumpForce" | "jump" => Ok(TunableKey::JumpForce),
            "obstacleSpeed" | "pipeSpeed" => Ok(TunableKey::ObstacleSpeed),
            "gap" | "pipeGap" => Ok(TunableKey::Gap),
            "spawnSpacing" | "pipeSpawnDistance" => Ok(TunableKey::SpawnSpacing),
            "playerSize" | "birdSize" => Ok(TunableKey::PlayerSize),
            "obstacleSize" | "pipeSize" => Ok(TunableKey::ObstacleSize),
            "playerCollisionWidth" | "birdCollisionWidth" => {
                Ok(TunableKey::PlayerCollisionWidth)
            }
            "playerCollisionHeight" | "birdCollisionHeight" => {
                Ok(TunableKey::PlayerCollisionHeight)
            }
            "obstacleCollisionWidth" | "pipeCollisionWidth" => {
                Ok(TunableKey::ObstacleCollisionWidth)
            }
            "obstacleCollisionHeight" | "pipeCollisionHeight" => {
                Ok(TunableKey::ObstacleCollisionHeight)
            }
            "gameSpeed" => Ok(TunableKey::GameSpeed),
            _ => Err(SettingsError::UnknownKey(s.to_string())),
        }
    }
}

/// Tunable parameter set read by the physics and obstacle steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tunables {
    // === Physics (per tick) ===
    /// Downward acceleration added to velocity each tick
    pub gravity: f32,
    /// Velocity set on jump (negative = upward)
    pub jump_force: f32,
    /// Obstacle leftward speed
    pub obstacle_speed: f32,
    /// Global multiplier for gravity, jump force and obstacle speed
    pub game_speed: f32,

    // === Obstacles ===
    /// Vertical gap between top and bottom barriers
    pub gap: f32,
    /// Distance from the right edge the newest obstacle must travel before the next spawns
    pub spawn_spacing: f32,

    // === Size scales ===
    /// Drawn player size (does not change the collision body)
    pub player_size: f32,
    /// Obstacle width scale, captured at spawn
    pub obstacle_size: f32,

    // === Collision box scales (0..=1) ===
    pub player_collision_width: f32,
    pub player_collision_height: f32,
    pub obstacle_collision_width: f32,
    pub obstacle_collision_height: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            gravity: BASE_GRAVITY,
            jump_force: BASE_JUMP_FORCE,
            obstacle_speed: BASE_OBSTACLE_SPEED,
            game_speed: 1.0,

            gap: BASE_GAP,
            spawn_spacing: BASE_SPAWN_SPACING,

            player_size: 1.0,
            obstacle_size: 1.0,

            player_collision_width: 0.5,
            player_collision_height: 0.5,
            obstacle_collision_width: 0.7,
            obstacle_collision_height: 1.0,
        }
    }
}

impl Tunables {
    /// Gravity after the global speed multiplier
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * self.game_speed
    }

    /// Jump force after the global speed multiplier
    pub fn effective_jump_force(&self) -> f32 {
        self.jump_force * self.game_speed
    }

    /// Obstacle speed after the global speed multiplier
    pub fn effective_obstacle_speed(&self) -> f32 {
        self.obstacle_speed * self.game_speed
    }

    pub fn get(&self, key: TunableKey) -> f32 {
        match key {
            TunableKey::Gravity => self.gravity,
            TunableKey::JumpForce => self.jump_force,
            TunableKey::ObstacleSpeed => self.obstacle_speed,
            TunableKey::Gap => self.gap,
            TunableKey::SpawnSpacing => self.spawn_spacing,
            TunableKey::PlayerSize => self.player_size,
            TunableKey::ObstacleSize => self.obstacle_size,
            TunableKey::PlayerCollisionWidth => self.player_collision_width,
            TunableKey::PlayerCollisionHeight => self.player_collision_height,
            TunableKey::ObstacleCollisionWidth => self.obstacle_collision_width,
            TunableKey::ObstacleCollisionHeight => self.obstacle_collision_height,
            TunableKey::GameSpeed => self.game_speed,
        }
    }

    fn slot(&mut self, key: TunableKey) -> &mut f32 {
        match key {
            TunableKey::Gravity => &mut self.gravity,
            TunableKey::JumpForce => &mut self.jump_force,
            TunableKey::ObstacleSpeed => &mut self.obstacle_speed,
            TunableKey::Gap => &mut self.gap,
            TunableKey::SpawnSpacing => &mut self.spawn_spacing,
            TunableKey::PlayerSize => &mut self.player_size,
            TunableKey::ObstacleSize => &mut self.obstacle_size,
            TunableKey::PlayerCollisionWidth => &mut self.player_collision_width,
            TunableKey::PlayerCollisionHeight => &mut self.player_collision_height,
            TunableKey::ObstacleCollisionWidth => &mut self.obstacle_collision_width,
            TunableKey::ObstacleCollisionHeight => &mut self.obstacle_collision_height,
            TunableKey::GameSpeed => &mut self.game_speed,
        }
    }

    /// Set a parameter, rejecting non-finite or out-of-range values
    pub fn apply(&mut self, key: TunableKey, value: f32) -> Result<(), SettingsError> {
        let (min, max) = key.range();
        if !value.is_finite() || value < min || value > max {
            return Err(SettingsError::OutOfRange {
                key: key.as_str(),
                value,
                min,
                max,
            });
        }
        *self.slot(key) = value;
        Ok(())
    }

    /// Set a parameter from raw text as delivered by an input element
    pub fn apply_named(&mut self, name: &str, raw: &str) -> Result<TunableKey, SettingsError> {
        let key: TunableKey = name.parse()?;
        let value: f32 = raw.trim().parse().map_err(|_| SettingsError::NotNumeric {
            key: key.as_str(),
            raw: raw.to_string(),
        })?;
        self.apply(key, value)?;
        Ok(key)
    }

    /// Restore all defaults
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "flappy_croco_tunables";

    /// Load tunables from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Tunables>(&json) {
                    Ok(tunables) if tunables.is_valid() => {
                        log::info!("Loaded tunables from LocalStorage");
                        return tunables;
                    }
                    _ => log::warn!("Stored tunables rejected, using defaults"),
                }
            }
        }

        Self::default()
    }

    /// Save tunables to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save tunables");
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }

    /// Every parameter within its accepted range
    pub fn is_valid(&self) -> bool {
        TunableKey::ALL.iter().all(|&key| {
            let (min, max) = key.range();
            let v = self.get(key);
            v.is_finite() && v >= min && v <= max
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_base_constants() {
        let t = Tunables::default();
        assert_eq!(t.gravity, 0.13);
        assert_eq!(t.jump_force, -3.0);
        assert_eq!(t.gap, 250.0);
        assert_eq!(t.spawn_spacing, 400.0);
        assert!(t.is_valid());
    }

    #[test]
    fn apply_named_accepts_page_ids() {
        let mut t = Tunables::default();
        assert_eq!(t.apply_named("pipeGap", "300"), Ok(TunableKey::Gap));
        assert_eq!(t.gap, 300.0);
        assert_eq!(t.apply_named("birdCollisionWidth", " 0.8 "), Ok(TunableKey::PlayerCollisionWidth));
        assert_eq!(t.player_collision_width, 0.8);
    }

    #[test]
    fn non_numeric_keeps_previous_value() {
        let mut t = Tunables::default();
        let err = t.apply_named("gap", "wide").unwrap_err();
        assert!(matches!(err, SettingsError::NotNumeric { key: "gap", .. }));
        assert_eq!(t.gap, BASE_GAP);
    }

    #[test]
    fn out_of_range_and_nan_rejected() {
        let mut t = Tunables::default();
        assert!(t.apply(TunableKey::PlayerCollisionWidth, 1.5).is_err());
        assert!(t.apply(TunableKey::Gravity, f32::NAN).is_err());
        assert!(t.apply(TunableKey::JumpForce, 2.0).is_err());
        assert_eq!(t, Tunables::default());
    }

    #[test]
    fn unknown_key_rejected() {
        let mut t = Tunables::default();
        assert_eq!(
            t.apply_named("wingspan", "1"),
            Err(SettingsError::UnknownKey("wingspan".into()))
        );
    }

    #[test]
    fn game_speed_scales_motion() {
        let mut t = Tunables::default();
        t.apply(TunableKey::GameSpeed, 2.0).unwrap();
        assert!((t.effective_gravity() - 0.26).abs() < 1e-6);
        assert!((t.effective_jump_force() + 6.0).abs() < 1e-6);
        assert!((t.effective_obstacle_speed() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut t = Tunables::default();
        t.apply(TunableKey::Gap, 120.0).unwrap();
        t.reset();
        assert_eq!(t, Tunables::default());
    }

    #[test]
    fn key_names_round_trip() {
        for key in TunableKey::ALL {
            assert_eq!(key.as_str().parse::<TunableKey>(), Ok(key));
        }
    }

    #[test]
    fn slider_ids_parse_and_unknown_names_fail() {
        assert_eq!("pipeGap".parse::<TunableKey>(), Ok(TunableKey::Gap));
        assert_eq!("birdSize".parse::<TunableKey>(), Ok(TunableKey::PlayerSize));
        assert_eq!(
            "wingspan".parse::<TunableKey>(),
            Err(SettingsError::UnknownKey("wingspan".into()))
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let t: Tunables = serde_json::from_str(r#"{"gap": 200}"#).unwrap();
        assert_eq!(t.gap, 200.0);
        assert_eq!(t.gravity, BASE_GRAVITY);
    }
}
