//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies (drawing goes through `Surface`)

pub mod collision;
pub mod state;
pub mod tick;
pub mod weather;

pub use collision::{Rect, circle_box_hits_any, circle_out_of_bounds, circles_overlap};
pub use state::{
    ActiveModifier, Bird, Features, GameEvent, GamePhase, GameState, Pickup, PickupKind, PipePair,
};
pub use tick::{TickInput, autopilot_should_flap, tick};
pub use weather::{
    Cloud, CloudLayerConfig, CycleClock, Raindrop, WeatherConfig, WeatherCycle, WeatherState,
};
