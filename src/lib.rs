//! Neon Drift - A neon lane-dodger arcade game
//!
//! Core modules:
//! - `sim`: Simulation (spawning, movement, collisions, game phases)
//! - `renderer`: Frame tessellation and the WebGPU pipeline
//! - `session`: Frame loop driver shared by the web and native entry points
//! - `input`: Keyboard/touch mapping onto player movement
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance

pub mod highscore;
pub mod input;
pub mod persistence;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscore::HighScore;
pub use session::{GameHost, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Logical surface size; all simulation math is in these units
    pub const CANVAS_WIDTH: f32 = 400.0;
    pub const CANVAS_HEIGHT: f32 = 800.0;

    /// Lanes across the road
    pub const LANE_COUNT: u32 = 4;
    pub const LANE_WIDTH: f32 = CANVAS_WIDTH / LANE_COUNT as f32;

    /// Player car (obstacles share this footprint)
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 90.0;
    /// Gap between the player's bumper and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 50.0;

    /// Background scroll period (grid and watermark repeat every 800 units)
    pub const ROAD_LOOP: f32 = 800.0;
    /// Spacing of the horizontal grid lines
    pub const GRID_GAP: f32 = 100.0;

    /// Particles per burst
    pub const BURST_PARTICLES: usize = 20;

    /// Watermark painted on the road and on the player's hood
    pub const BRAND_NAME: &str = "NXT NAKUL";
    pub const BRAND_BADGE: &str = "NXT";
}
