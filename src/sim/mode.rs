//! Game mode machine
//!
//! `Loading -> Menu <-> Playing -> {Paused <-> Playing, GameOver -> Menu | Playing}`
//!
//! Only `Playing` runs the simulation. Everything but `Loading` is drawn.

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    Loading,
    Menu,
    Playing,
    Paused,
    GameOver,
}

/// Inputs that drive mode transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeEvent {
    /// Startup setup finished
    Ready,
    /// Jump/start pressed outside of play
    Start,
    /// Page lost foreground visibility
    Hidden,
    /// Page regained foreground visibility
    Visible,
    /// Ground or obstacle contact
    Crash,
    /// Explicit return to menu
    ReturnToMenu,
}

impl GameMode {
    /// Next mode for an event, or `None` if the event is not valid here
    pub fn next(self, event: ModeEvent) -> Option<GameMode> {
        use GameMode::*;
        use ModeEvent::*;

        match (self, event) {
            (Loading, Ready) => Some(Menu),
            (Menu, Start) | (GameOver, Start) => Some(Playing),
            (Playing, Hidden) => Some(Paused),
            (Paused, Visible) => Some(Playing),
            (Playing, Crash) => Some(GameOver),
            (Playing, ReturnToMenu) | (GameOver, ReturnToMenu) => Some(Menu),
            _ => None,
        }
    }

    /// Whether physics, obstacles and collisions run this tick
    pub fn is_simulating(self) -> bool {
        self == GameMode::Playing
    }

    /// Whether the renderer draws anything
    pub fn is_drawn(self) -> bool {
        self != GameMode::Loading
    }

    /// Whether the play scene (player, obstacles) is on screen
    pub fn shows_scene(self) -> bool {
        matches!(self, GameMode::Playing | GameMode::Paused | GameMode::GameOver)
    }
}
