//! Per-frame simulation step
//!
//! One call per animation frame. Speed ramps per call (not per millisecond),
//! while score and steering are scaled by the frame time.

use super::collision::aabb_overlap;
use super::phase;
use super::spawn::maybe_spawn;
use super::state::{GameEvent, GamePhase, GameState, ObstacleKind, ParticleTint};
use crate::consts::*;
use crate::tuning::Tuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left arrow / `a` held
    pub steer_left: bool,
    /// Right arrow / `d` held
    pub steer_right: bool,
}

/// Sanitize a measured frame time: non-positive (or NaN) becomes a zero
/// step, long stalls are capped.
pub fn clamp_frame_ms(dt_ms: f64, tuning: &Tuning) -> f64 {
    if dt_ms > 0.0 {
        dt_ms.min(tuning.max_frame_ms)
    } else {
        0.0
    }
}

/// Advance the game by one frame of `dt_ms` milliseconds.
///
/// Does nothing outside [`GamePhase::Playing`].
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f64, tuning: &Tuning) {
    if state.phase != GamePhase::Playing {
        return;
    }
    let dt = clamp_frame_ms(dt_ms, tuning);

    // Difficulty ramp
    state.speed = (state.speed + tuning.acceleration).min(tuning.max_speed);

    // Distance score
    state.score += state.speed as f64 * dt / tuning.score_divisor;
    state.events.push(GameEvent::ScoreChanged(state.display_score()));

    // Keyboard steering, normalized to the reference frame length
    let step = tuning.steer_speed * (dt as f32 / tuning.reference_frame_ms);
    if input.steer_left {
        state.player.nudge(-step);
    }
    if input.steer_right {
        state.player.nudge(step);
    }

    // Road scroll
    state.road_offset = (state.road_offset + state.speed) % ROAD_LOOP;

    maybe_spawn(state, tuning);
    advance_obstacles(state, tuning);
    advance_particles(state, tuning);
}

/// Move obstacles down the road and resolve contacts with the player.
///
/// Walks newest-first. An enemy hit ends the run and leaves the remaining
/// obstacles where they are.
fn advance_obstacles(state: &mut GameState, tuning: &Tuning) {
    let speed = state.speed;
    let player = state.player.rect;

    let mut i = state.obstacles.len();
    while i > 0 {
        i -= 1;

        let obs = &mut state.obstacles[i];
        obs.rect.pos.y += speed;
        let hit = aabb_overlap(&player, &obs.rect);
        let kind = obs.kind;
        let center = obs.rect.center();
        let off_screen = obs.rect.pos.y > CANVAS_HEIGHT;

        if hit {
            match kind {
                ObstacleKind::Enemy => {
                    if off_screen {
                        state.obstacles.remove(i);
                    }
                    if let Err(e) = phase::crash(state, tuning) {
                        log::warn!("Ignoring collision: {}", e);
                    }
                    break;
                }
                ObstacleKind::Pickup => {
                    state.obstacles.remove(i);
                    state.score += tuning.pickup_bonus;
                    state.events.push(GameEvent::PickupCollected {
                        bonus: tuning.pickup_bonus as u64,
                    });
                    state.burst(center, ParticleTint::Pickup, tuning);
                    log::debug!("Pickup collected (+{})", tuning.pickup_bonus);
                    continue;
                }
            }
        }

        if off_screen {
            state.obstacles.remove(i);
        }
    }
}

fn advance_particles(state: &mut GameState, tuning: &Tuning) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.life -= tuning.particle_decay;
    }
    state.particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use glam::Vec2;

    /// Playing state with spawning disabled so tests control the road
    fn playing() -> (GameState, Tuning) {
        let tuning = Tuning {
            spawn_chance: 0.0,
            ..Default::default()
        };
        let mut state = GameState::new(12345, &tuning);
        phase::start(&mut state, &tuning).unwrap();
        state.drain_events();
        (state, tuning)
    }

    #[test]
    fn test_tick_noop_outside_playing() {
        let tuning = Tuning::default();
        let mut state = GameState::new(1, &tuning);
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.speed, tuning.initial_speed);
        assert_eq!(state.road_offset, 0.0);

        let (mut state, tuning) = playing();
        phase::pause(&mut state).unwrap();
        let before = state.speed;
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.speed, before);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_speed_ramps_and_caps() {
        let (mut state, tuning) = playing();
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert!((state.speed - 6.005).abs() < 1e-5);

        state.speed = tuning.max_speed - 0.001;
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.speed, tuning.max_speed);
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.speed, tuning.max_speed);
    }

    #[test]
    fn test_score_accrues_with_speed_and_time() {
        let (mut state, tuning) = playing();
        tick(&mut state, &TickInput::default(), 100.0, &tuning);
        let expected = state.speed as f64 * 100.0 / 100.0;
        assert!((state.score - expected).abs() < 1e-9);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScoreChanged(state.display_score())]
        );
    }

    #[test]
    fn test_non_positive_dt_is_zero_step() {
        let (mut state, tuning) = playing();
        let left = TickInput {
            steer_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, -250.0, &tuning);
        assert_eq!(state.score, 0.0);
        assert_eq!(state.player.x(), 175.0);
        tick(&mut state, &TickInput::default(), f64::NAN, &tuning);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let tuning = Tuning::default();
        assert_eq!(clamp_frame_ms(5_000.0, &tuning), tuning.max_frame_ms);
        assert_eq!(clamp_frame_ms(16.0, &tuning), 16.0);
        assert_eq!(clamp_frame_ms(0.0, &tuning), 0.0);
    }

    #[test]
    fn test_steering_is_frame_time_normalized() {
        let (mut state, tuning) = playing();
        let right = TickInput {
            steer_right: true,
            ..Default::default()
        };
        tick(&mut state, &right, 16.0, &tuning);
        assert!((state.player.x() - 183.0).abs() < 1e-4);
        tick(&mut state, &right, 32.0, &tuning);
        assert!((state.player.x() - 199.0).abs() < 1e-4);

        let left = TickInput {
            steer_left: true,
            ..Default::default()
        };
        for _ in 0..100 {
            tick(&mut state, &left, 16.0, &tuning);
        }
        assert_eq!(state.player.x(), 0.0);
    }

    #[test]
    fn test_road_offset_wraps() {
        let (mut state, tuning) = playing();
        state.road_offset = 798.0;
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert!(state.road_offset >= 0.0 && state.road_offset < ROAD_LOOP);
        assert!((state.road_offset - (798.0 + state.speed - 800.0)).abs() < 1e-3);
    }

    #[test]
    fn test_obstacles_advance_and_leave_screen() {
        let (mut state, tuning) = playing();
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 25.0, 100.0));
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 325.0, 797.0));

        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].y(), 100.0 + state.speed);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_pickup_awards_bonus() {
        let (mut state, tuning) = playing();
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Pickup, 175.0, 600.0));

        tick(&mut state, &TickInput::default(), 0.0, &tuning);
        assert_eq!(state.score, 500.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        assert!(state.particles.iter().all(|p| p.tint == ParticleTint::Pickup));
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::PickupCollected { bonus: 500 })
        );
    }

    #[test]
    fn test_enemy_ends_run_once() {
        let (mut state, tuning) = playing();
        state.score = 987.6;
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 175.0, 600.0));

        tick(&mut state, &TickInput::default(), 0.0, &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.final_score, 987);

        // Frozen afterwards
        let score = state.score;
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.score, score);

        let crashes = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::Crashed { .. }))
            .count();
        assert_eq!(crashes, 1);
    }

    #[test]
    fn test_enemy_hit_stops_obstacle_walk() {
        let (mut state, tuning) = playing();
        // Oldest first: the untouched one sits before the enemy in the list
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 25.0, 300.0));
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 175.0, 600.0));

        tick(&mut state, &TickInput::default(), 16.0, &tuning);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[0].y(), 300.0);
    }

    #[test]
    fn test_explosion_centered_on_player() {
        let (mut state, tuning) = playing();
        state
            .obstacles
            .push(Obstacle::new(ObstacleKind::Enemy, 175.0, 600.0));
        tick(&mut state, &TickInput::default(), 0.0, &tuning);

        let center = state.player.rect.center();
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        for p in &state.particles {
            assert_eq!(p.tint, ParticleTint::Player);
            // One particle step has already run this frame
            assert!((p.pos - (center + p.vel)).length() < 1e-4);
        }
    }

    #[test]
    fn test_particles_decay_and_expire() {
        let (mut state, tuning) = playing();
        state.burst(Vec2::new(200.0, 400.0), ParticleTint::Pickup, &tuning);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 16.0, &tuning);
        }
        assert_eq!(state.particles.len(), BURST_PARTICLES);
        assert!(state.particles.iter().all(|p| (p.life - 0.8).abs() < 1e-4));

        for _ in 0..45 {
            tick(&mut state, &TickInput::default(), 16.0, &tuning);
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut state1 = GameState::new(99999, &tuning);
        let mut state2 = GameState::new(99999, &tuning);
        phase::start(&mut state1, &tuning).unwrap();
        phase::start(&mut state2, &tuning).unwrap();

        let inputs = [
            TickInput {
                steer_left: true,
                steer_right: false,
            },
            TickInput::default(),
            TickInput {
                steer_left: false,
                steer_right: true,
            },
        ];
        for i in 0..600 {
            let input = &inputs[i % inputs.len()];
            tick(&mut state1, input, 16.0, &tuning);
            tick(&mut state2, input, 16.0, &tuning);
        }

        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.obstacles.len(), state2.obstacles.len());
        assert_eq!(state1.player.x(), state2.player.x());
    }
}
