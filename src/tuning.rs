//! Data-driven game balance
//!
//! Every gameplay number lives here so difficulty can be tweaked from JSON
//! without touching the simulation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected tuning values
#[derive(Debug, Error, PartialEq)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(String),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be a finite number (got {value})")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} must be a probability in [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f64 },
    #[error("initial speed {initial} exceeds max speed {max}")]
    SpeedRange { initial: f32, max: f32 },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Road speed at the start of a run (units per tick)
    pub initial_speed: f32,
    /// Speed cap
    pub max_speed: f32,
    /// Speed added every tick (not scaled by dt)
    pub acceleration: f32,
    /// Score accrues as speed * dt_ms / score_divisor
    pub score_divisor: f64,
    /// Lateral keyboard movement per reference frame
    pub steer_speed: f32,
    /// Reference frame length (ms) that `steer_speed` is expressed in
    pub reference_frame_ms: f32,
    /// Longest frame the simulation will integrate in one step (ms)
    pub max_frame_ms: f64,
    /// Chance per tick of attempting a spawn
    pub spawn_chance: f32,
    /// Spawns are skipped while any obstacle is above this y
    pub spawn_clearance: f32,
    /// y at which new obstacles appear (above the visible top edge)
    pub spawn_y: f32,
    /// Chance that a spawned obstacle is a pickup
    pub pickup_chance: f32,
    /// Score awarded per pickup
    pub pickup_bonus: f64,
    /// Max particle velocity component (per tick)
    pub particle_speed: f32,
    /// Particle life lost per tick
    pub particle_decay: f32,
    /// Smallest particle edge
    pub particle_min_size: f32,
    /// Random extra added to the particle edge
    pub particle_size_jitter: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_speed: 6.0,
            max_speed: 15.0,
            acceleration: 0.005,
            score_divisor: 100.0,
            steer_speed: 8.0,
            reference_frame_ms: 16.0,
            max_frame_ms: 100.0,
            spawn_chance: 0.02,
            spawn_clearance: 200.0,
            spawn_y: -100.0,
            pickup_chance: 0.1,
            pickup_bonus: 500.0,
            particle_speed: 5.0,
            particle_decay: 0.02,
            particle_min_size: 2.0,
            particle_size_jitter: 5.0,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning =
            serde_json::from_str(json).map_err(|e| TuningError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check ranges the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("initial_speed", self.initial_speed as f64),
            ("max_speed", self.max_speed as f64),
            ("score_divisor", self.score_divisor),
            ("reference_frame_ms", self.reference_frame_ms as f64),
            ("max_frame_ms", self.max_frame_ms),
            ("particle_decay", self.particle_decay as f64),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NotPositive { field, value });
            }
        }

        // Negative values would let speed or score run backwards
        for (field, value) in [
            ("acceleration", self.acceleration as f64),
            ("pickup_bonus", self.pickup_bonus),
        ] {
            if !value.is_finite() {
                return Err(TuningError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(TuningError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("steer_speed", self.steer_speed),
            ("spawn_clearance", self.spawn_clearance),
            ("spawn_y", self.spawn_y),
            ("particle_speed", self.particle_speed),
            ("particle_min_size", self.particle_min_size),
            ("particle_size_jitter", self.particle_size_jitter),
        ] {
            if !value.is_finite() {
                return Err(TuningError::NotFinite {
                    field,
                    value: value as f64,
                });
            }
        }

        for (field, value) in [
            ("spawn_chance", self.spawn_chance),
            ("pickup_chance", self.pickup_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::NotProbability {
                    field,
                    value: value as f64,
                });
            }
        }

        if self.initial_speed > self.max_speed {
            return Err(TuningError::SpeedRange {
                initial: self.initial_speed,
                max: self.max_speed,
            });
        }

        Ok(())
    }
}
