//! HUD and overlay glue
//!
//! Decides what the page shows for each phase and keeps the score
//! readouts and the persisted best score in sync with the game.

use crate::highscore::HighScore;
use crate::persistence::KeyValueStore;
use crate::session::GameHost;
use crate::sim::GamePhase;

/// Which page elements are visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverlayVisibility {
    /// Title card with "start engine"
    pub menu: bool,
    /// "Paused" card with "resume"
    pub paused: bool,
    /// "Crashed!" card with final score, "try again" and "main menu"
    pub game_over: bool,
    /// In-game pause button
    pub pause_button: bool,
    /// "Touch & drag to steer" hint
    pub touch_hint: bool,
}

impl OverlayVisibility {
    pub fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Menu => Self {
                menu: true,
                ..Default::default()
            },
            GamePhase::Playing => Self {
                pause_button: true,
                touch_hint: true,
                ..Default::default()
            },
            GamePhase::Paused => Self {
                paused: true,
                ..Default::default()
            },
            GamePhase::GameOver => Self {
                game_over: true,
                ..Default::default()
            },
        }
    }
}

/// Six-digit zero-padded score readout
pub fn format_score(score: u64) -> String {
    format!("{:06}", score)
}

/// Score bookkeeping for the page: current score, last final score and the
/// persisted best.
pub struct Scoreboard<S: KeyValueStore> {
    pub current: u64,
    pub final_score: u64,
    pub high: HighScore,
    /// Set when the last finished run beat the previous best
    pub new_best: bool,
    pub store: S,
}

impl<S: KeyValueStore> Scoreboard<S> {
    /// Load the best score from `store`
    pub fn new(store: S) -> Self {
        let high = HighScore::load(&store);
        Self {
            current: 0,
            final_score: 0,
            high,
            new_best: false,
            store,
        }
    }

    pub fn current_text(&self) -> String {
        format_score(self.current)
    }

    pub fn best_text(&self) -> String {
        self.high.best.to_string()
    }
}

impl<S: KeyValueStore> GameHost for Scoreboard<S> {
    fn on_score_update(&mut self, score: u64) {
        self.current = score;
    }

    fn on_game_over(&mut self, final_score: u64) {
        self.final_score = final_score;
        self.new_best = self.high.submit(final_score, &mut self.store);
    }

    fn on_phase_change(&mut self, _from: GamePhase, to: GamePhase) {
        if to == GamePhase::Playing {
            self.new_best = false;
        }
    }
}
