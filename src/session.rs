//! Game session: the simulation context plus its collaborators
//!
//! The loop driver owns one `Session` and calls into it from the frame
//! callback and from input handlers. External side effects of mode changes
//! (saving, ads, gameplay markers) happen here, after the tick that caused
//! them, so the simulation itself stays pure.

use crate::consts::AD_INTERVAL;
use crate::persistence::{self, SaveData, Storage};
use crate::platform::PlatformServices;
use crate::settings::{SettingsError, TunableKey, Tunables};
use crate::sim::{Field, GameEvent, GameMode, GameState, ModeEvent, TickInput, autopilot, tick};

pub struct Session {
    pub state: GameState,
    pub tunables: Tunables,
    pub save: SaveData,
    /// Draw collision rectangles over the scene
    pub show_collision_boxes: bool,
    /// Let the autopilot play
    pub autopilot: bool,
    /// Game-overs since the last interstitial
    ad_counter: u32,
    /// Intents gathered since the last tick
    pending: TickInput,
    storage: Box<dyn Storage>,
    platform: Box<dyn PlatformServices>,
}

impl Session {
    /// Create a session in `Loading`, reading the save record from `storage`
    pub fn new(
        field: Field,
        seed: u64,
        tunables: Tunables,
        storage: Box<dyn Storage>,
        platform: Box<dyn PlatformServices>,
    ) -> Self {
        let save = persistence::load_or_default(storage.as_ref());
        Self {
            state: GameState::new(field, seed),
            tunables,
            save,
            show_collision_boxes: false,
            autopilot: false,
            ad_counter: 0,
            pending: TickInput::default(),
            storage,
            platform,
        }
    }

    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    pub fn high_score(&self) -> u32 {
        self.save.high_score
    }

    /// Swap in platform services once an SDK has connected. A platform
    /// that is not ready is ignored and the current one stays.
    pub fn set_platform(&mut self, platform: Box<dyn PlatformServices>) -> bool {
        if !platform.is_ready() {
            log::warn!("Platform services not ready, keeping the current ones");
            return false;
        }
        self.platform = platform;
        true
    }

    /// Swap the save backend and merge its record into the current one.
    /// The better high score wins; audio toggles follow the new backend.
    /// A backend with nothing stored is seeded with the current record.
    pub fn set_storage(&mut self, storage: Box<dyn Storage>) {
        self.storage = storage;
        match self.storage.load() {
            Ok(Some(data)) => {
                let best = self.save.high_score.max(data.high_score);
                let behind = best > data.high_score;
                self.save = SaveData {
                    high_score: best,
                    ..data
                };
                if behind {
                    self.persist();
                }
                log::info!("Adopted save data (high score {})", best);
            }
            Ok(None) => self.persist(),
            Err(e) => log::warn!("Ignoring save data from new storage: {}", e),
        }
    }

    /// Startup setup is done: `loading -> menu`
    pub fn finish_loading(&mut self) {
        if self.state.transition(ModeEvent::Ready).is_some() {
            log::info!("Ready, showing menu");
        }
    }

    /// Jump/confirm input; consumed by the next tick
    pub fn press_jump(&mut self) {
        self.pending.jump = true;
    }

    /// Run one simulation tick and its side effects. Returns the events the
    /// tick raised (for sound effects).
    pub fn step(&mut self) -> Vec<GameEvent> {
        let mut input = std::mem::take(&mut self.pending);
        if self.autopilot && self.state.mode.is_simulating() {
            input.jump |= autopilot::decide(&self.state);
        }

        tick(&mut self.state, &input, &self.tunables);

        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::Started => self.platform.notify_gameplay_start(),
                GameEvent::Crashed { .. } => self.on_game_over(),
                GameEvent::Jumped | GameEvent::Scored { .. } => {}
            }
        }
        events
    }

    fn on_game_over(&mut self) {
        let score = self.state.score;
        if score > self.save.high_score {
            log::info!("New high score: {}", score);
            self.save.high_score = score;
            self.persist();
        }

        self.ad_counter += 1;
        if self.ad_counter >= AD_INTERVAL {
            self.ad_counter = 0;
            self.platform.request_interstitial_ad(Box::new(|shown| {
                log::info!("Interstitial ad closed, was shown: {}", shown);
            }));
        }

        self.platform.notify_gameplay_stop();
    }

    /// Page visibility changed. Returns true if the mode changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let event = if visible {
            ModeEvent::Visible
        } else {
            ModeEvent::Hidden
        };
        let changed = self.state.transition(event).is_some();
        if changed {
            log::info!("Game {}", if visible { "resumed" } else { "paused" });
        }
        // Intents from before the pause are stale
        self.pending = TickInput::default();
        changed
    }

    /// Explicit return to menu from play or game over
    pub fn return_to_menu(&mut self) {
        if self.state.transition(ModeEvent::ReturnToMenu).is_some() {
            self.pending = TickInput::default();
            self.platform.notify_gameplay_stop();
        }
    }

    /// Named tunable update from the settings panel. Invalid input leaves
    /// the previous value in place.
    pub fn apply_setting(&mut self, name: &str, raw: &str) -> Result<TunableKey, SettingsError> {
        match self.tunables.apply_named(name, raw) {
            Ok(key) => {
                log::debug!("Setting {} = {}", key.as_str(), self.tunables.get(key));
                self.tunables.save();
                Ok(key)
            }
            Err(e) => {
                log::warn!("Rejected setting: {}", e);
                Err(e)
            }
        }
    }

    pub fn reset_settings(&mut self) {
        self.tunables.reset();
        self.tunables.save();
        log::info!("Settings reset to defaults");
    }

    /// Returns the new state
    pub fn toggle_sound(&mut self) -> bool {
        self.save.sound_enabled = !self.save.sound_enabled;
        self.persist();
        self.save.sound_enabled
    }

    /// Returns the new state
    pub fn toggle_music(&mut self) -> bool {
        self.save.music_enabled = !self.save.music_enabled;
        self.persist();
        self.save.music_enabled
    }

    pub fn toggle_collision_boxes(&mut self) -> bool {
        self.show_collision_boxes = !self.show_collision_boxes;
        log::info!("Collision boxes: {}", self.show_collision_boxes);
        self.show_collision_boxes
    }

    pub fn toggle_autopilot(&mut self) -> bool {
        self.autopilot = !self.autopilot;
        log::info!("Autopilot: {}", self.autopilot);
        self.autopilot
    }

    /// Render surface changed size. A run in progress is rescaled onto the
    /// new field; otherwise the player is re-placed.
    pub fn resize(&mut self, field: Field) {
        if self.state.mode.shows_scene() {
            self.state.rescale(field);
        } else {
            self.state.field = field;
            self.state.reset_run();
        }
        log::info!("Field resized to {}x{}", field.width, field.height);
    }

    /// Save failures are logged and not retried
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.save) {
            log::warn!("Failed to save data: {}", e);
        }
    }
}
