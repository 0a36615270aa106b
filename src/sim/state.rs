//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::mode::{GameMode, ModeEvent};
use crate::consts::*;

/// Play field dimensions (pixels, y down)
///
/// Layout is always derived from the current size, never cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f32,
    pub height: f32,
}

impl Default for Field {
    fn default() -> Self {
        Self {
            width: FIELD_MAX_WIDTH,
            height: FIELD_MAX_HEIGHT,
        }
    }
}

impl Field {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Largest 4:3 field that fits the container, capped at 800x600
    pub fn fit(container_width: f32, container_height: f32) -> Self {
        let max_width = (container_width - FIELD_MARGIN).min(FIELD_MAX_WIDTH);
        let max_height = (container_height - FIELD_MARGIN).min(FIELD_MAX_HEIGHT);

        let mut width = max_width;
        let mut height = max_width * 3.0 / 4.0;
        if height > max_height {
            height = max_height;
            width = max_height * 4.0 / 3.0;
        }
        Self::new(width, height)
    }

    /// Top of the ground band; touching it ends the run
    pub fn ground_y(&self) -> f32 {
        self.height * GROUND_Y_FRAC
    }

    pub fn ground_height(&self) -> f32 {
        self.height - self.ground_y()
    }

    /// New obstacles enter at the right edge
    pub fn spawn_x(&self) -> f32 {
        self.width
    }
}

/// The player-controlled character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Fixed after spawn
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Vertical velocity per tick (negative = up)
    pub velocity: f32,
    /// Display angle in degrees
    pub rotation: f32,
}

impl Player {
    /// Spawn at the default position for this field
    pub fn spawn(field: &Field) -> Self {
        Self {
            x: field.width * PLAYER_START_X_FRAC,
            y: field.height * PLAYER_START_Y_FRAC,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            velocity: 0.0,
            rotation: 0.0,
        }
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// A top/bottom barrier pair sharing one x and width
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    /// Top barrier spans `0..top_height`
    pub top_height: f32,
    /// Bottom barrier spans `bottom_y..bottom_y + bottom_height` (ends at the ground line)
    pub bottom_y: f32,
    pub bottom_height: f32,
    pub width: f32,
    /// One-shot latch; set when the player passes this obstacle
    pub scored: bool,
}

impl Obstacle {
    /// Build a pair around `gap_center`
    pub fn new(x: f32, gap_center: f32, gap: f32, width: f32, ground_y: f32) -> Self {
        let bottom_y = gap_center + gap / 2.0;
        Self {
            x,
            top_height: gap_center - gap / 2.0,
            bottom_y,
            bottom_height: ground_y - bottom_y,
            width,
            scored: false,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn gap_center(&self) -> f32 {
        (self.top_height + self.bottom_y) / 2.0
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrashCause {
    Ground,
    TopBarrier,
    BottomBarrier,
}

/// Things that happened during a tick, for audio and side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A new run began
    Started,
    /// Jump applied
    Jumped,
    /// Obstacle cleared; carries the new score
    Scored { score: u32 },
    /// Run ended
    Crashed { cause: CrashCause },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub mode: GameMode,
    pub field: Field,
    pub player: Player,
    /// Ordered by x, oldest (leftmost) first
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Simulation ticks in the current run
    pub time_ticks: u64,
    /// Gap placement RNG
    pub rng: Pcg32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a state in `Loading` with the given seed
    pub fn new(field: Field, seed: u64) -> Self {
        Self {
            mode: GameMode::Loading,
            field,
            player: Player::spawn(&field),
            obstacles: Vec::new(),
            score: 0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    /// Start a fresh run: new player, empty obstacle sequence, zero score
    pub fn reset_run(&mut self) {
        self.player = Player::spawn(&self.field);
        self.obstacles.clear();
        self.score = 0;
        self.time_ticks = 0;
    }

    /// Move a live run onto a new field. Positions scale with the field;
    /// bottom barriers are re-anchored to the new ground line and the
    /// player is kept above it.
    pub fn rescale(&mut self, field: Field) {
        let sx = field.width / self.field.width;
        let sy = field.height / self.field.height;
        self.field = field;

        let ground_y = field.ground_y();
        self.player.x *= sx;
        self.player.y = (self.player.y * sy).min(ground_y - self.player.height - 1.0).max(0.0);

        for obstacle in &mut self.obstacles {
            obstacle.x *= sx;
            obstacle.top_height *= sy;
            obstacle.bottom_y *= sy;
            obstacle.bottom_height = (ground_y - obstacle.bottom_y).max(0.0);
        }
    }

    /// Apply a mode event. Returns `(from, to)` if the transition happened.
    pub fn transition(&mut self, event: ModeEvent) -> Option<(GameMode, GameMode)> {
        let from = self.mode;
        let to = from.next(event)?;
        if event == ModeEvent::Start {
            self.reset_run();
        }
        self.mode = to;
        log::debug!("Mode {:?} -> {:?} on {:?}", from, to, event);
        Some((from, to))
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count of live obstacles whose scored latch is set
    pub fn scored_obstacles(&self) -> usize {
        self.obstacles.iter().filter(|o| o.scored).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_layout_from_height() {
        let field = Field::new(800.0, 600.0);
        assert_eq!(field.ground_y(), 540.0);
        assert!((field.ground_height() - 60.0).abs() < 1e-4);
        assert_eq!(field.spawn_x(), 800.0);
    }

    #[test]
    fn fit_keeps_four_by_three() {
        let wide = Field::fit(1920.0, 1080.0);
        assert_eq!((wide.width, wide.height), (800.0, 600.0));

        let short = Field::fit(1000.0, 440.0);
        assert_eq!(short.height, 400.0);
        assert!((short.width - 533.3333).abs() < 1e-3);

        let narrow = Field::fit(440.0, 1000.0);
        assert_eq!((narrow.width, narrow.height), (400.0, 300.0));
    }

    #[test]
    fn player_spawns_at_default_position() {
        let player = Player::spawn(&Field::new(800.0, 600.0));
        assert_eq!(player.x, 160.0);
        assert_eq!(player.y, 240.0);
        assert_eq!(player.velocity, 0.0);
        assert_eq!((player.width, player.height), (120.0, 90.0));
    }

    #[test]
    fn obstacle_geometry_is_exact() {
        let o = Obstacle::new(800.0, 300.0, 250.0, 180.0, 540.0);
        assert_eq!(o.top_height, 175.0);
        assert_eq!(o.bottom_y, 425.0);
        assert_eq!(o.bottom_height, 115.0);
        assert_eq!(o.top_height + 250.0 + o.bottom_height, 540.0);
        assert!(!o.scored);
    }

    #[test]
    fn start_resets_run() {
        let mut state = GameState::new(Field::default(), 1);
        state.transition(ModeEvent::Ready);
        state.score = 7;
        state.player.y = 10.0;
        state.obstacles.push(Obstacle::new(100.0, 300.0, 250.0, 180.0, 540.0));

        assert_eq!(
            state.transition(ModeEvent::Start),
            Some((GameMode::Menu, GameMode::Playing))
        );
        assert_eq!(state.score, 0);
        assert_eq!(state.player, Player::spawn(&state.field));
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn rescale_keeps_layout_relative() {
        let mut state = GameState::new(Field::new(800.0, 600.0), 1);
        state.obstacles.push(Obstacle::new(800.0, 300.0, 250.0, 180.0, 540.0));
        state.rescale(Field::new(400.0, 300.0));

        assert_eq!((state.player.x, state.player.y), (80.0, 120.0));
        let o = &state.obstacles[0];
        assert_eq!(o.x, 400.0);
        assert_eq!(o.top_height, 87.5);
        assert_eq!(o.bottom_y, 212.5);
        assert_eq!(o.bottom_y + o.bottom_height, state.field.ground_y());
    }

    #[test]
    fn rescale_lifts_player_off_new_ground() {
        let mut state = GameState::new(Field::new(800.0, 600.0), 1);
        state.player.y = 440.0;
        state.rescale(Field::new(800.0, 300.0));
        assert!(state.player.y + state.player.height < state.field.ground_y());
    }

    #[test]
    fn rejected_transition_changes_nothing() {
        let mut state = GameState::new(Field::default(), 1);
        assert_eq!(state.transition(ModeEvent::Start), None);
        assert_eq!(state.mode, GameMode::Loading);
    }
}
