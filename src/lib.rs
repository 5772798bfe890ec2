//! Flappy Weather - a side-scrolling flappy arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird, pipes, pickups, weather cycle)
//! - `renderer`: Tessellation and the WebGPU pipeline
//! - `platform`: Frame pacing and input mapping
//! - `persistence`: Key/value JSON store (files natively, LocalStorage on web)
//! - `settings` / `highscores`: Persisted preferences and leaderboard

pub mod color;
pub mod error;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod surface;

pub use color::Rgb;
pub use error::{Error, Result};
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Movement values are per tick at `FRAME_RATE`.
pub mod consts {
    /// Simulation ticks per second
    pub const FRAME_RATE: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / FRAME_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Bird defaults
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_RADIUS: f32 = 20.0;
    pub const GRAVITY: f32 = 0.5;
    pub const GRAVITY_PLUS: f32 = 0.8;
    pub const FLAP_VELOCITY: f32 = -8.0;
    pub const FLAP_VELOCITY_BOOSTED: f32 = -11.0;

    /// Pipe defaults
    pub const PIPE_WIDTH: f32 = 70.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SPEED: f32 = 3.0;
    pub const PIPE_SPAWN_INTERVAL: u64 = 90;
    /// Gap centers and pickups stay this far from the top and bottom
    pub const GAP_MARGIN: u32 = 100;

    /// Pickup defaults
    pub const PICKUP_RADIUS: f32 = 15.0;
    pub const PICKUP_SPAWN_INTERVAL: u64 = 300;
    pub const MODIFIER_DURATION_TICKS: u32 = 180; // ~3 seconds

    /// Seconds per weather state
    pub const WEATHER_CYCLE_SECONDS: u32 = 30;
}
