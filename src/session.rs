//! Frame loop driver
//!
//! `Session` is the interactive game component: it owns the simulation,
//! the input state and the frame clock, and reports score changes upward
//! through [`GameHost`]. The web entry point calls [`Session::advance`] once
//! per animation frame and renders afterwards; tests drive it with fake
//! timestamps.

use crate::input::{InputCommand, InputState, touch_to_canvas_x};
use crate::sim::{GameEvent, GamePhase, GameState, PhaseError, phase, tick};
use crate::tuning::Tuning;

/// Callbacks into the hosting page
pub trait GameHost {
    /// Floored score, once per simulated frame
    fn on_score_update(&mut self, score: u64);
    /// Final floored score, once per run
    fn on_game_over(&mut self, final_score: u64);
    /// Overlay changes
    fn on_phase_change(&mut self, _from: GamePhase, _to: GamePhase) {}
}

/// Measures time between frames.
///
/// Restarted whenever play (re)starts so time spent on the menu or paused
/// never reaches the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn restart(&mut self, now_ms: f64) {
        self.last_ms = Some(now_ms);
    }

    /// Milliseconds since the previous call (0 on the first call)
    pub fn elapsed(&mut self, now_ms: f64) -> f64 {
        let dt = self.last_ms.map_or(0.0, |last| now_ms - last);
        self.last_ms = Some(now_ms);
        dt
    }
}

/// A running game
pub struct Session {
    pub state: GameState,
    pub input: InputState,
    pub tuning: Tuning,
    clock: FrameClock,
    /// Frames driven so far
    pub frames: u64,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, &tuning),
            input: InputState::new(),
            tuning,
            clock: FrameClock::default(),
            frames: 0,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// "Start engine" / "Try again"
    pub fn start(&mut self, now_ms: f64) -> Result<(), PhaseError> {
        phase::start(&mut self.state, &self.tuning)?;
        self.clock.restart(now_ms);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), PhaseError> {
        phase::pause(&mut self.state)
    }

    pub fn resume(&mut self, now_ms: f64) -> Result<(), PhaseError> {
        phase::resume(&mut self.state)?;
        self.clock.restart(now_ms);
        Ok(())
    }

    pub fn main_menu(&mut self) -> Result<(), PhaseError> {
        phase::main_menu(&mut self.state)
    }

    pub fn toggle_pause(&mut self, now_ms: f64) -> Result<(), PhaseError> {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(now_ms),
            from => Err(PhaseError {
                action: "toggle pause",
                from,
            }),
        }
    }

    /// Page hidden but kept alive: drop held input and park a running
    /// game under the pause overlay. Other phases are left alone.
    pub fn suspend(&mut self) {
        self.input.clear();
        if self.state.phase == GamePhase::Playing {
            if let Err(e) = self.pause() {
                log::debug!("Suspend without pause: {}", e);
            }
        }
    }

    pub fn key_down(&mut self, key: &str) {
        self.input.key_down(key);
    }

    /// Key release; Escape toggles pause and is ignored on other screens
    pub fn key_up(&mut self, key: &str, now_ms: f64) {
        if let Some(InputCommand::TogglePause) = self.input.key_up(key) {
            if let Err(e) = self.toggle_pause(now_ms) {
                log::debug!("Escape ignored: {}", e);
            }
        }
    }

    /// Finger down: remembered, the car does not jump yet
    pub fn touch_start(&mut self, client_x: f32) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        self.input.touch_x = Some(client_x);
    }

    /// Finger drag: center the car under the finger
    pub fn touch_move(&mut self, client_x: f32, rect_left: f32, rect_width: f32) {
        if self.state.phase != GamePhase::Playing {
            return;
        }
        if let Some(x) = touch_to_canvas_x(client_x, rect_left, rect_width) {
            self.state.player.center_on(x);
        }
        self.input.touch_x = Some(client_x);
    }

    /// Run one frame: measure elapsed time, tick if playing, report to the
    /// host. Returns the raw elapsed milliseconds.
    pub fn advance(&mut self, now_ms: f64, host: &mut dyn GameHost) -> f64 {
        let dt = self.clock.elapsed(now_ms);
        if self.state.phase == GamePhase::Playing {
            let input = self.input.tick_input();
            tick(&mut self.state, &input, dt, &self.tuning);
        }
        self.dispatch(host);
        self.frames += 1;
        dt
    }

    /// Forward pending events to the host
    pub fn dispatch(&mut self, host: &mut dyn GameHost) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged(score) => host.on_score_update(score),
                GameEvent::Crashed { final_score } => host.on_game_over(final_score),
                GameEvent::PhaseChanged { from, to } => host.on_phase_change(from, to),
                GameEvent::PickupCollected { .. } => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Obstacle, ObstacleKind};

    #[derive(Default)]
    struct Recorder {
        scores: Vec<u64>,
        game_overs: Vec<u64>,
        phases: Vec<GamePhase>,
    }

    impl GameHost for Recorder {
        fn on_score_update(&mut self, score: u64) {
            self.scores.push(score);
        }
        fn on_game_over(&mut self, final_score: u64) {
            self.game_overs.push(final_score);
        }
        fn on_phase_change(&mut self, _from: GamePhase, to: GamePhase) {
            self.phases.push(to);
        }
    }

    fn quiet_session() -> Session {
        Session::new(
            77,
            Tuning {
                spawn_chance: 0.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_menu_frames_do_not_simulate() {
        let mut session = quiet_session();
        let mut host = Recorder::default();
        session.advance(0.0, &mut host);
        session.advance(16.0, &mut host);
        assert_eq!(session.state.score, 0.0);
        assert!(host.scores.is_empty());
        assert_eq!(session.frames, 2);
    }

    #[test]
    fn test_start_reports_zero_and_phase() {
        let mut session = quiet_session();
        let mut host = Recorder::default();
        session.start(1000.0).unwrap();
        session.advance(1016.0, &mut host);
        assert_eq!(host.phases, vec![GamePhase::Playing]);
        assert_eq!(host.scores[0], 0);
        assert_eq!(host.scores.len(), 2);
    }

    #[test]
    fn test_resume_skips_paused_interval() {
        let mut session = quiet_session();
        let mut host = Recorder::default();
        session.start(0.0).unwrap();
        session.advance(16.0, &mut host);
        session.pause().unwrap();
        let score_before = session.state.score;

        // Long pause, with the loop still rendering
        session.advance(5_000.0, &mut host);
        session.advance(30_000.0, &mut host);
        assert_eq!(session.state.score, score_before);

        session.resume(60_000.0).unwrap();
        let dt = session.advance(60_016.0, &mut host);
        assert_eq!(dt, 16.0);
        let gained = session.state.score - score_before;
        assert!(gained < 2.0, "gained {gained}");
    }

    #[test]
    fn test_escape_toggles_pause() {
        let mut session = quiet_session();
        session.key_down("Escape");
        session.key_up("Escape", 0.0);
        assert_eq!(session.phase(), GamePhase::Menu);

        session.start(0.0).unwrap();
        session.key_down("Escape");
        session.key_up("Escape", 10.0);
        assert_eq!(session.phase(), GamePhase::Paused);
        session.key_down("Escape");
        session.key_up("Escape", 20.0);
        assert_eq!(session.phase(), GamePhase::Playing);
    }

    #[test]
    fn test_touch_moves_only_while_playing() {
        let mut session = quiet_session();
        session.touch_move(100.0, 0.0, 400.0);
        assert_eq!(session.state.player.x(), 175.0);

        session.start(0.0).unwrap();
        session.touch_start(100.0);
        assert_eq!(session.state.player.x(), 175.0);
        session.touch_move(100.0, 0.0, 400.0);
        assert_eq!(session.state.player.x(), 75.0);
        session.touch_move(-50.0, 0.0, 400.0);
        assert_eq!(session.state.player.x(), 0.0);
        session.touch_move(1000.0, 0.0, 400.0);
        assert_eq!(session.state.player.x(), 350.0);
    }

    #[test]
    fn test_crash_reported_once() {
        let mut session = quiet_session();
        let mut host = Recorder::default();
        session.start(0.0).unwrap();
        session.advance(0.0, &mut host);
        session.state.score = 321.5;
        session
            .state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 175.0, 600.0));

        for i in 1..10 {
            session.advance(i as f64 * 16.0, &mut host);
        }
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(host.game_overs.len(), 1);
        assert_eq!(host.game_overs[0], session.state.final_score);
        assert!(host.game_overs[0] >= 321);

        session.main_menu().unwrap();
        session.start(500.0).unwrap();
        assert_eq!(session.state.score, 0.0);
    }

    #[test]
    fn test_suspend_pauses_and_restore_resumes() {
        let mut session = quiet_session();
        let mut host = Recorder::default();
        session.suspend();
        assert_eq!(session.phase(), GamePhase::Menu);

        session.start(0.0).unwrap();
        session.key_down("ArrowLeft");
        session.advance(16.0, &mut host);
        let score = session.state.score;

        session.suspend();
        assert_eq!(session.phase(), GamePhase::Paused);
        assert!(!session.input.is_held("ArrowLeft"));

        // Restored much later: the loop keeps running but nothing advances
        session.advance(120_000.0, &mut host);
        assert_eq!(session.state.score, score);

        session.resume(120_016.0).unwrap();
        assert_eq!(session.advance(120_032.0, &mut host), 16.0);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.state.player.x(), 175.0 - 8.0);
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::default();
        assert_eq!(clock.elapsed(100.0), 0.0);
        assert_eq!(clock.elapsed(116.0), 16.0);
        clock.restart(200.0);
        assert_eq!(clock.elapsed(190.0), -10.0);
    }
}
