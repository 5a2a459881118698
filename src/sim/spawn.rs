//! Obstacle spawning

use rand::Rng;

use super::state::{GameState, Obstacle, ObstacleKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// x of an obstacle centered in `lane`
pub fn lane_x(lane: u32) -> f32 {
    lane as f32 * LANE_WIDTH + (LANE_WIDTH - PLAYER_WIDTH) / 2.0
}

/// True while an obstacle is still near the top and would crowd a new spawn
pub fn spawn_blocked(obstacles: &[Obstacle], clearance: f32) -> bool {
    obstacles.iter().any(|o| o.y() < clearance)
}

/// Roll for a spawn this tick. Returns the new obstacle's kind if one was
/// added.
pub fn maybe_spawn(state: &mut GameState, tuning: &Tuning) -> Option<ObstacleKind> {
    if state.rng.random::<f32>() >= tuning.spawn_chance {
        return None;
    }
    spawn_obstacle(state, tuning)
}

/// Place one obstacle in a random lane unless the top of the road is
/// crowded. Rejection is silent.
pub fn spawn_obstacle(state: &mut GameState, tuning: &Tuning) -> Option<ObstacleKind> {
    let lane = state.rng.random_range(0..LANE_COUNT);
    let x = lane_x(lane);

    if spawn_blocked(&state.obstacles, tuning.spawn_clearance) {
        log::trace!("Spawn in lane {} rejected, top of road is occupied", lane);
        return None;
    }

    let kind = if state.rng.random::<f32>() < tuning.pickup_chance {
        ObstacleKind::Pickup
    } else {
        ObstacleKind::Enemy
    };
    state.obstacles.push(Obstacle::new(kind, x, tuning.spawn_y));
    log::debug!("Spawned {:?} in lane {}", kind, lane);
    Some(kind)
}
