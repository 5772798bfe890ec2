//! Game state and core simulation types
//!
//! Everything a run needs lives in [`GameState`]; the tick function takes it
//! by `&mut` and nothing else holds gameplay state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::weather::{WeatherConfig, WeatherCycle, WeatherState};
use crate::color::Rgb;
use crate::consts::*;
use crate::error::Result;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Run ended, waiting for restart
    GameOver,
}

/// The player-controlled bird
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub pos: Vec2,
    /// Vertical velocity in pixels per tick (negative is up)
    pub velocity: f32,
    pub radius: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, SCREEN_HEIGHT / 2.0),
            velocity: 0.0,
            radius: BIRD_RADIUS,
        }
    }
}

impl Bird {
    pub fn flap(&mut self, strength: f32) {
        self.velocity = strength;
    }

    /// Apply one tick of gravity and move
    pub fn fall(&mut self, gravity: f32) {
        self.velocity += gravity;
        self.pos.y += self.velocity;
    }

    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }
}

/// A top/bottom pipe pair sharing one gap
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Vertical center of the gap
    pub gap_y: f32,
    pub gap: f32,
    pub width: f32,
}

impl PipePair {
    pub fn top_rect(&self) -> Rect {
        Rect::new(self.x, 0.0, self.width, self.gap_y - self.gap / 2.0)
    }

    pub fn bottom_rect(&self) -> Rect {
        Rect::new(
            self.x,
            self.gap_y + self.gap / 2.0,
            self.width,
            SCREEN_HEIGHT - self.gap_y,
        )
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Collectible modifier types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Ignore pipe and boundary collisions
    Shield,
    /// Two points per pipe
    DoublePoints,
    /// Stronger flap
    JumpBoost,
    /// Heavier gravity
    GravityPlus,
    /// Pipes score nothing
    NoPoints,
}

impl PickupKind {
    pub const ALL: [PickupKind; 5] = [
        PickupKind::Shield,
        PickupKind::DoublePoints,
        PickupKind::JumpBoost,
        PickupKind::GravityPlus,
        PickupKind::NoPoints,
    ];

    pub fn color(&self) -> Rgb {
        match self {
            PickupKind::Shield => Rgb::new(0, 255, 255),
            PickupKind::DoublePoints => Rgb::new(255, 215, 0),
            PickupKind::JumpBoost => Rgb::new(120, 255, 120),
            PickupKind::GravityPlus => Rgb::new(160, 60, 220),
            PickupKind::NoPoints => Rgb::new(230, 40, 40),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PickupKind::Shield => "Shield",
            PickupKind::DoublePoints => "Double Points",
            PickupKind::JumpBoost => "Jump Boost",
            PickupKind::GravityPlus => "Gravity+",
            PickupKind::NoPoints => "No Points",
        }
    }
}

/// A pickup drifting toward the bird
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
}

/// The modifier currently in effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveModifier {
    pub kind: PickupKind,
    pub ticks_remaining: u32,
}

/// Things that happened during a tick, drained by the front end
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Flapped,
    PipeCleared { points: u64 },
    PickupSpawned(PickupKind),
    PickupCollected(PickupKind),
    ModifierExpired(PickupKind),
    Crashed { score: u64 },
    WeatherChanged(WeatherState),
    Restarted,
}

/// Optional features of a run
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    /// Weather cycle parameters, `None` for a plain sky
    pub weather: Option<WeatherConfig>,
    /// Pickups that may spawn; empty disables pickups
    pub pickups: Vec<PickupKind>,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            weather: Some(WeatherConfig::new(
                SCREEN_WIDTH,
                SCREEN_HEIGHT,
                FRAME_RATE,
                WEATHER_CYCLE_SECONDS,
            )),
            pickups: vec![PickupKind::Shield, PickupKind::DoublePoints],
        }
    }
}

/// Seed offset so weather and obstacles draw from independent streams
const WEATHER_SEED_SALT: u64 = 0x5EED_CAFE_F00D_BEEF;

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Obstacle and pickup RNG
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Ticks since the current run started
    pub frame: u64,
    pub score: u64,
    pub bird: Bird,
    /// Active pipes, oldest first
    pub pipes: Vec<PipePair>,
    pub pickups: Vec<Pickup>,
    pub modifier: Option<ActiveModifier>,
    pub weather: Option<WeatherCycle>,
    pub features: Features,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed
    pub fn new(seed: u64, features: Features) -> Result<Self> {
        let weather = features
            .weather
            .clone()
            .map(|config| WeatherCycle::seeded(config, seed ^ WEATHER_SEED_SALT))
            .transpose()?;

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Playing,
            frame: 0,
            score: 0,
            bird: Bird::default(),
            pipes: Vec::new(),
            pickups: Vec::new(),
            modifier: None,
            weather,
            features,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Start a fresh run. The weather cycle and RNG keep going.
    pub fn restart(&mut self) {
        self.bird = Bird::default();
        self.pipes.clear();
        self.pickups.clear();
        self.modifier = None;
        self.score = 0;
        self.frame = 0;
        self.phase = GamePhase::Playing;
        self.events.push(GameEvent::Restarted);
        log::info!("Run restarted");
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// New pipe pair at the right edge with a random gap height
    pub fn spawn_pipe(&mut self) {
        let id = self.next_entity_id();
        let gap_y = self
            .rng
            .random_range(GAP_MARGIN..=(SCREEN_HEIGHT as u32 - GAP_MARGIN)) as f32;
        self.pipes.push(PipePair {
            id,
            x: SCREEN_WIDTH,
            gap_y,
            gap: PIPE_GAP,
            width: PIPE_WIDTH,
        });
    }

    /// New pickup of a random enabled kind, if any kind is enabled
    pub fn spawn_pickup(&mut self) {
        if self.features.pickups.is_empty() {
            return;
        }
        let kind = self.features.pickups[self.rng.random_range(0..self.features.pickups.len())];
        let y = self
            .rng
            .random_range(GAP_MARGIN..=(SCREEN_HEIGHT as u32 - GAP_MARGIN)) as f32;
        let id = self.next_entity_id();
        self.pickups.push(Pickup {
            id,
            kind,
            pos: Vec2::new(SCREEN_WIDTH + PICKUP_RADIUS, y),
            radius: PICKUP_RADIUS,
        });
        self.events.push(GameEvent::PickupSpawned(kind));
    }

    /// Activate a modifier, replacing whatever was active
    pub fn apply_modifier(&mut self, kind: PickupKind) {
        self.modifier = Some(ActiveModifier {
            kind,
            ticks_remaining: MODIFIER_DURATION_TICKS,
        });
    }

    pub fn modifier_kind(&self) -> Option<PickupKind> {
        self.modifier.map(|m| m.kind)
    }

    pub fn gravity(&self) -> f32 {
        match self.modifier_kind() {
            Some(PickupKind::GravityPlus) => GRAVITY_PLUS,
            _ => GRAVITY,
        }
    }

    pub fn flap_velocity(&self) -> f32 {
        match self.modifier_kind() {
            Some(PickupKind::JumpBoost) => FLAP_VELOCITY_BOOSTED,
            _ => FLAP_VELOCITY,
        }
    }

    pub fn points_per_pipe(&self) -> u64 {
        match self.modifier_kind() {
            Some(PickupKind::DoublePoints) => 2,
            Some(PickupKind::NoPoints) => 0,
            _ => 1,
        }
    }

    pub fn shielded(&self) -> bool {
        self.modifier_kind() == Some(PickupKind::Shield)
    }

    /// Sky color for this frame (plain day sky without weather)
    pub fn background_color(&self) -> Rgb {
        self.weather
            .as_ref()
            .map(|w| w.background_color())
            .unwrap_or_else(|| WeatherState::Day.sky_color())
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(12345, Features::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.bird.pos, Vec2::new(50.0, 300.0));
        assert_eq!(state.score, 0);
        assert!(state.pipes.is_empty());
        assert!(state.weather.is_some());
        assert_eq!(state.background_color(), WeatherState::Day.sky_color());
    }

    #[test]
    fn test_no_weather_uses_day_sky() {
        let features = Features {
            weather: None,
            ..Default::default()
        };
        let state = GameState::new(1, features).unwrap();
        assert!(state.weather.is_none());
        assert_eq!(state.background_color(), Rgb::new(135, 206, 235));
    }

    #[test]
    fn test_invalid_weather_rejected() {
        let mut config = WeatherConfig::new(SCREEN_WIDTH, SCREEN_HEIGHT, 60, 30);
        config.frame_rate = 0;
        let features = Features {
            weather: Some(config),
            ..Default::default()
        };
        assert!(GameState::new(1, features).is_err());
    }

    #[test]
    fn test_pipe_rects() {
        let pipe = PipePair {
            id: 1,
            x: 200.0,
            gap_y: 300.0,
            gap: 150.0,
            width: 70.0,
        };
        assert_eq!(pipe.top_rect(), Rect::new(200.0, 0.0, 70.0, 225.0));
        assert_eq!(pipe.bottom_rect(), Rect::new(200.0, 375.0, 70.0, 300.0));
        assert_eq!(pipe.right(), 270.0);
    }

    #[test]
    fn test_spawn_pipe_gap_range() {
        let mut state = GameState::new(77, Features::default()).unwrap();
        for _ in 0..100 {
            state.spawn_pipe();
        }
        assert!(
            state
                .pipes
                .iter()
                .all(|p| (100.0..=500.0).contains(&p.gap_y) && p.x == SCREEN_WIDTH)
        );
        // IDs are unique and increasing
        assert!(state.pipes.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_spawn_pickup_respects_enabled_kinds() {
        let features = Features {
            pickups: vec![PickupKind::JumpBoost],
            ..Default::default()
        };
        let mut state = GameState::new(3, features).unwrap();
        for _ in 0..20 {
            state.spawn_pickup();
        }
        assert_eq!(state.pickups.len(), 20);
        assert!(state.pickups.iter().all(|p| p.kind == PickupKind::JumpBoost));

        let features = Features {
            pickups: Vec::new(),
            ..Default::default()
        };
        let mut state = GameState::new(3, features).unwrap();
        state.spawn_pickup();
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_modifier_effects() {
        let mut state = GameState::new(1, Features::default()).unwrap();
        assert_eq!(state.gravity(), GRAVITY);
        assert_eq!(state.flap_velocity(), FLAP_VELOCITY);
        assert_eq!(state.points_per_pipe(), 1);
        assert!(!state.shielded());

        state.apply_modifier(PickupKind::GravityPlus);
        assert_eq!(state.gravity(), GRAVITY_PLUS);
        state.apply_modifier(PickupKind::JumpBoost);
        assert_eq!(state.gravity(), GRAVITY);
        assert_eq!(state.flap_velocity(), FLAP_VELOCITY_BOOSTED);
        state.apply_modifier(PickupKind::DoublePoints);
        assert_eq!(state.points_per_pipe(), 2);
        state.apply_modifier(PickupKind::NoPoints);
        assert_eq!(state.points_per_pipe(), 0);
        state.apply_modifier(PickupKind::Shield);
        assert!(state.shielded());
        assert_eq!(
            state.modifier.map(|m| m.ticks_remaining),
            Some(MODIFIER_DURATION_TICKS)
        );
    }

    #[test]
    fn test_restart_keeps_weather() {
        let mut state = GameState::new(5, Features::default()).unwrap();
        if let Some(weather) = state.weather.as_mut() {
            weather.seek(WeatherState::Night, 100);
        }
        state.score = 12;
        state.spawn_pipe();
        state.phase = GamePhase::GameOver;

        state.restart();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert!(state.pipes.is_empty());
        assert_eq!(
            state.weather.as_ref().map(|w| w.state()),
            Some(WeatherState::Night)
        );
        assert_eq!(state.drain_events(), vec![GameEvent::Restarted]);
        assert!(state.events.is_empty());
    }
}
