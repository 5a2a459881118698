//! Simulation module
//!
//! All gameplay logic lives here:
//! - Seeded RNG only
//! - Obstacles kept in insertion order
//! - No rendering or platform dependencies

pub mod collision;
pub mod phase;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, aabb_overlap};
pub use phase::PhaseError;
pub use spawn::{lane_x, maybe_spawn, spawn_obstacle};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, ObstacleKind, Particle, ParticleTint, Player,
};
pub use tick::{TickInput, clamp_frame_ms, tick};
