//! Game state and core simulation types

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for "start engine"
    #[default]
    Menu,
    /// Active gameplay; the only phase in which the simulation advances
    Playing,
    /// Frozen frame under the pause overlay
    Paused,
    /// Run ended by hitting an enemy car
    GameOver,
}

/// Role of a spawned obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Oncoming car; touching it ends the run
    Enemy,
    /// Bonus orb; touching it awards points
    Pickup,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                Self::start_x(),
                CANVAS_HEIGHT - PLAYER_HEIGHT - PLAYER_BOTTOM_MARGIN,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
        }
    }
}

impl Player {
    /// Centered on the road
    pub const fn start_x() -> f32 {
        CANVAS_WIDTH / 2.0 - PLAYER_WIDTH / 2.0
    }

    /// Largest x that keeps the car on the road
    pub const fn max_x() -> f32 {
        CANVAS_WIDTH - PLAYER_WIDTH
    }

    /// Move to `x`, clamped to the road
    pub fn set_x(&mut self, x: f32) {
        self.rect.pos.x = x.clamp(0.0, Self::max_x());
    }

    /// Move by `dx`, clamped to the road
    pub fn nudge(&mut self, dx: f32) {
        self.set_x(self.rect.pos.x + dx);
    }

    /// Center the car under a point in logical canvas coordinates
    pub fn center_on(&mut self, canvas_x: f32) {
        self.set_x(canvas_x - PLAYER_WIDTH / 2.0);
    }

    pub fn x(&self) -> f32 {
        self.rect.pos.x
    }
}

/// An enemy car or pickup travelling down the road
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub rect: Rect,
}

impl Obstacle {
    /// Obstacles always share the player's footprint
    pub fn new(kind: ObstacleKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            rect: Rect::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
        }
    }

    pub fn y(&self) -> f32 {
        self.rect.pos.y
    }
}

/// Color family of a particle burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleTint {
    /// Player explosion (neon blue)
    Player,
    /// Collected pickup (neon green)
    Pickup,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub tint: ParticleTint,
    pub life: f32, // 0-1, decreases over time
    pub size: f32,
}

/// Notifications for the hosting page, drained once per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Floored score after this tick's accrual
    ScoreChanged(u64),
    /// A pickup was collected
    PickupCollected { bonus: u64 },
    /// The run ended; emitted exactly once per run
    Crashed { final_score: u64 },
    /// Phase transition
    PhaseChanged { from: GamePhase, to: GamePhase },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Continuous score; display with [`GameState::display_score`]
    pub score: f64,
    /// Current road speed (units per tick)
    pub speed: f32,
    /// Scroll phase of the road grid, in [0, ROAD_LOOP)
    pub road_offset: f32,
    pub player: Player,
    /// Insertion-ordered; newest last
    pub obstacles: Vec<Obstacle>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Score captured at the moment of the crash
    pub final_score: u64,
    /// Pending host notifications
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state sitting on the menu
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0.0,
            speed: tuning.initial_speed,
            road_offset: 0.0,
            player: Player::default(),
            obstacles: Vec::new(),
            particles: Vec::new(),
            final_score: 0,
            events: Vec::new(),
        }
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0).floor() as u64
    }

    /// Clear everything a fresh run starts without
    pub fn reset_run(&mut self, tuning: &Tuning) {
        self.score = 0.0;
        self.speed = tuning.initial_speed;
        self.obstacles.clear();
        self.particles.clear();
        self.player.set_x(Player::start_x());
        self.final_score = 0;
    }

    /// Spray a burst of particles from `origin`
    pub fn burst(&mut self, origin: Vec2, tint: ParticleTint, tuning: &Tuning) {
        let spread = tuning.particle_speed;
        for _ in 0..BURST_PARTICLES {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * 2.0 * spread,
                (self.rng.random::<f32>() - 0.5) * 2.0 * spread,
            );
            let size = self.rng.random::<f32>() * tuning.particle_size_jitter
                + tuning.particle_min_size;
            self.particles.push(Particle {
                pos: origin,
                vel,
                tint,
                life: 1.0,
                size,
            });
        }
    }

    /// Switch phase, recording the change for the host
    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from != to {
            log::info!("Phase {:?} -> {:?}", from, to);
            self.phase = to;
            self.events.push(GameEvent::PhaseChanged { from, to });
        }
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_on_menu() {
        let tuning = Tuning::default();
        let state = GameState::new(7, &tuning);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.speed, tuning.initial_speed);
        assert_eq!(state.player.x(), 175.0);
        assert_eq!(state.player.rect.pos.y, 660.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_player_clamped_to_road() {
        let mut player = Player::default();
        player.nudge(-1000.0);
        assert_eq!(player.x(), 0.0);
        player.nudge(1000.0);
        assert_eq!(player.x(), 350.0);
        player.center_on(100.0);
        assert_eq!(player.x(), 75.0);
        player.center_on(399.0);
        assert_eq!(player.x(), 350.0);
    }

    #[test]
    fn test_burst_shape() {
        let tuning = Tuning::default();
        let mut state = GameState::new(3, &tuning);
        state.burst(Vec2::new(100.0, 200.0), ParticleTint::Pickup, &tuning);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        for p in &state.particles {
            assert_eq!(p.pos, Vec2::new(100.0, 200.0));
            assert_eq!(p.life, 1.0);
            assert!(p.vel.x.abs() <= 5.0 && p.vel.y.abs() <= 5.0);
            assert!((2.0..7.0).contains(&p.size));
            assert_eq!(p.tint, ParticleTint::Pickup);
        }
    }

    #[test]
    fn test_display_score_floors() {
        let mut state = GameState::new(1, &Tuning::default());
        state.score = 123.99;
        assert_eq!(state.display_score(), 123);
    }

    #[test]
    fn test_reset_run() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        state.score = 999.0;
        state.speed = 14.0;
        state.player.set_x(0.0);
        state.obstacles.push(Obstacle::new(ObstacleKind::Enemy, 25.0, 10.0));
        state.burst(Vec2::ZERO, ParticleTint::Player, &tuning);

        state.reset_run(&tuning);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, 6.0);
        assert_eq!(state.player.x(), 175.0);
        assert!(state.obstacles.is_empty());
        assert!(state.particles.is_empty());
    }
}
