//! Ambient weather cycle
//!
//! Rotates through day, sunset, night and rain on a fixed tick budget per
//! state. Owns the decorative particle layers (two cloud layers and a rain
//! layer) whose visibility and color depend only on the current state, the
//! next state and the progress through the current state.
//!
//! The cycle never touches gameplay entities. It is advanced exactly once per
//! simulation tick, so the configured cycle length holds in wall-clock time as
//! long as the frame rate does.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::color::{Rgb, lerp_color};
use crate::error::{Error, Result};
use crate::sim::Rect;
use crate::surface::Surface;

/// Cloud color during the day and the first half of rain
pub const CLOUD_WHITE: Rgb = Rgb::new(255, 255, 255);
/// Cloud color at the start of sunset
pub const CLOUD_SUNSET: Rgb = Rgb::new(255, 165, 100);
/// Overcast cloud color
pub const CLOUD_GREY: Rgb = Rgb::new(180, 180, 180);
/// Raindrop stroke color
pub const RAIN_COLOR: Rgb = Rgb::new(100, 100, 130);

/// Rain becomes visible this far into a sunset that leads into rain
const RAIN_ONSET_PROGRESS: f32 = 0.7;
/// Clouds go from white to grey halfway through rain
const RAIN_OVERCAST_PROGRESS: f32 = 0.5;

/// One of the four weather states, in cycle order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherState {
    Day,
    Sunset,
    Night,
    Rain,
}

impl WeatherState {
    pub const ALL: [WeatherState; 4] = [
        WeatherState::Day,
        WeatherState::Sunset,
        WeatherState::Night,
        WeatherState::Rain,
    ];

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn index(self) -> usize {
        match self {
            WeatherState::Day => 0,
            WeatherState::Sunset => 1,
            WeatherState::Night => 2,
            WeatherState::Rain => 3,
        }
    }

    /// The state that follows this one (wrapping)
    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Fixed sky color for this state
    pub fn sky_color(self) -> Rgb {
        match self {
            WeatherState::Day => Rgb::new(135, 206, 235),
            WeatherState::Sunset => Rgb::new(252, 100, 45),
            WeatherState::Night => Rgb::new(15, 15, 40),
            WeatherState::Rain => Rgb::new(100, 100, 120),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherState::Day => "Day",
            WeatherState::Sunset => "Sunset",
            WeatherState::Night => "Night",
            WeatherState::Rain => "Rain",
        }
    }
}

/// Tick counter for the current weather state
///
/// Invariant: `elapsed_ticks < duration_ticks`, so `progress()` is in [0, 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleClock {
    elapsed_ticks: u32,
    duration_ticks: u32,
    state_index: usize,
}

impl CycleClock {
    /// Start at `Day` with no elapsed time. `duration_ticks` must be non-zero.
    pub fn new(duration_ticks: u32) -> Self {
        debug_assert!(duration_ticks > 0);
        Self {
            elapsed_ticks: 0,
            duration_ticks: duration_ticks.max(1),
            state_index: 0,
        }
    }

    /// Advance one tick. Returns true if the state rolled over.
    pub fn tick(&mut self) -> bool {
        self.elapsed_ticks += 1;
        if self.elapsed_ticks >= self.duration_ticks {
            self.elapsed_ticks = 0;
            self.state_index = (self.state_index + 1) % WeatherState::ALL.len();
            true
        } else {
            false
        }
    }

    /// Jump to a position inside `state`; elapsed is clamped below the duration
    pub fn seek(&mut self, state: WeatherState, elapsed_ticks: u32) {
        self.state_index = state.index();
        self.elapsed_ticks = elapsed_ticks.min(self.duration_ticks - 1);
    }

    pub fn elapsed_ticks(&self) -> u32 {
        self.elapsed_ticks
    }

    pub fn duration_ticks(&self) -> u32 {
        self.duration_ticks
    }

    pub fn state_index(&self) -> usize {
        self.state_index
    }

    pub fn state(&self) -> WeatherState {
        WeatherState::from_index(self.state_index)
    }

    pub fn next_state(&self) -> WeatherState {
        self.state().next()
    }

    /// Fraction of the current state elapsed, in [0, 1)
    pub fn progress(&self) -> f32 {
        // Long cycles would round up to 1.0 in f32
        let p = self.elapsed_ticks as f64 / self.duration_ticks as f64;
        (p as f32).min(1.0 - f32::EPSILON)
    }
}

/// Clouds are drawn in every state except night
pub fn clouds_visible(state: WeatherState) -> bool {
    !matches!(state, WeatherState::Night)
}

/// Shared cloud color for a state, `None` when clouds are hidden
pub fn cloud_color(state: WeatherState, progress: f32) -> Option<Rgb> {
    match state {
        WeatherState::Day => Some(CLOUD_WHITE),
        WeatherState::Rain if progress < RAIN_OVERCAST_PROGRESS => Some(CLOUD_WHITE),
        WeatherState::Sunset => Some(lerp_color(CLOUD_SUNSET, CLOUD_GREY, progress)),
        WeatherState::Rain => Some(CLOUD_GREY),
        WeatherState::Night => None,
    }
}

/// Rain shows for the whole rain state, and starts early at the tail of a
/// sunset that is about to turn into rain.
///
/// A rain-into-night fade window (`progress < 0.3`) is already covered by the
/// unconditional rain case, so rain stays on for all of `Rain`.
pub fn rain_visible(current: WeatherState, next: WeatherState, progress: f32) -> bool {
    match current {
        WeatherState::Rain => true,
        WeatherState::Sunset => next == WeatherState::Rain && progress > RAIN_ONSET_PROGRESS,
        _ => false,
    }
}

/// One parallax layer of clouds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudLayerConfig {
    pub count: usize,
    pub scale: f32,
    /// Leftward drift in pixels per tick
    pub speed: f32,
    /// Vertical band clouds spawn and respawn in (inclusive)
    pub y_min: f32,
    pub y_max: f32,
}

impl CloudLayerConfig {
    pub const FAR: Self = Self {
        count: 5,
        scale: 0.6,
        speed: 0.3,
        y_min: 20.0,
        y_max: 150.0,
    };

    pub const NEAR: Self = Self {
        count: 7,
        scale: 1.0,
        speed: 0.6,
        y_min: 50.0,
        y_max: 180.0,
    };

    fn validate(&self, name: &str) -> Result<()> {
        if self.scale.is_nan() || self.scale <= 0.0 {
            return Err(Error::Config(format!("{name} cloud scale must be positive")));
        }
        if self.speed.is_nan() || self.speed < 0.0 {
            return Err(Error::Config(format!("{name} cloud speed must not be negative")));
        }
        if self.y_min.is_nan() || self.y_max.is_nan() || self.y_min > self.y_max {
            return Err(Error::Config(format!("{name} cloud band is empty")));
        }
        Ok(())
    }
}

/// Construction parameters for [`WeatherCycle`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Simulation ticks per second
    pub frame_rate: u32,
    /// Seconds spent in each weather state
    pub cycle_seconds: u32,
    pub far_clouds: CloudLayerConfig,
    pub near_clouds: CloudLayerConfig,
    pub raindrops: usize,
}

impl WeatherConfig {
    /// Default particle layers for the given screen and timing
    pub fn new(screen_width: f32, screen_height: f32, frame_rate: u32, cycle_seconds: u32) -> Self {
        Self {
            screen_width,
            screen_height,
            frame_rate,
            cycle_seconds,
            far_clouds: CloudLayerConfig::FAR,
            near_clouds: CloudLayerConfig::NEAR,
            raindrops: 100,
        }
    }

    /// Ticks per weather state (`frame_rate * cycle_seconds`)
    pub fn duration_ticks(&self) -> Result<u32> {
        self.frame_rate
            .checked_mul(self.cycle_seconds)
            .ok_or_else(|| Error::Config("weather cycle is too long".into()))
    }

    pub fn validate(&self) -> Result<()> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.screen_width) || !positive(self.screen_height) {
            return Err(Error::Config(format!(
                "screen size must be positive, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if self.frame_rate == 0 {
            return Err(Error::Config("frame rate must be positive".into()));
        }
        if self.cycle_seconds == 0 {
            return Err(Error::Config("cycle length must be positive".into()));
        }
        self.duration_ticks()?;
        self.far_clouds.validate("far")?;
        self.near_clouds.validate("near")?;
        Ok(())
    }
}

/// A decorative cloud drifting left
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub scale: f32,
    pub speed: f32,
}

impl Cloud {
    pub const BASE_WIDTH: f32 = 60.0;
    pub const BASE_HEIGHT: f32 = 40.0;

    fn spawn<R: Rng>(rng: &mut R, layer: &CloudLayerConfig, screen_width: f32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..=screen_width),
                rng.random_range(layer.y_min..=layer.y_max),
            ),
            scale: layer.scale,
            speed: layer.speed,
        }
    }

    pub fn width(&self) -> f32 {
        Self::BASE_WIDTH * self.scale
    }

    pub fn height(&self) -> f32 {
        Self::BASE_HEIGHT * self.scale
    }

    /// Drift left; once fully off the left edge, respawn past the right edge.
    /// Size and speed never change. Returns true if recycled.
    fn update<R: Rng>(&mut self, rng: &mut R, layer: &CloudLayerConfig, screen_width: f32) -> bool {
        self.pos.x -= self.speed;
        if self.pos.x < -self.width() {
            self.pos.x = screen_width + rng.random_range(10.0..100.0);
            self.pos.y = rng.random_range(layer.y_min..=layer.y_max);
            true
        } else {
            false
        }
    }

    /// Base puff plus two smaller puffs offset up-right and right
    pub fn puffs(&self) -> [Rect; 3] {
        let (x, y) = (self.pos.x, self.pos.y);
        let (w, h) = (self.width(), self.height());
        [
            Rect::new(x, y, w, h),
            Rect::new(x + w * 0.3, y - h * 0.3, w * 0.7, h),
            Rect::new(x + w * 0.5, y, w * 0.5, h * 0.7),
        ]
    }
}

/// A falling raindrop, drawn as a short vertical streak
#[derive(Debug, Clone, PartialEq)]
pub struct Raindrop {
    pub pos: Vec2,
    pub length: f32,
    pub speed: f32,
}

impl Raindrop {
    pub const MIN_LENGTH: u32 = 10;
    pub const MAX_LENGTH: u32 = 20;
    pub const MIN_SPEED: f32 = 4.0;
    pub const MAX_SPEED: f32 = 7.0;

    /// Fresh drop somewhere above the screen
    fn spawn<R: Rng>(rng: &mut R, screen_width: f32, screen_height: f32) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..=screen_width),
                rng.random_range(-screen_height..0.0),
            ),
            length: rng.random_range(Self::MIN_LENGTH..=Self::MAX_LENGTH) as f32,
            speed: rng.random_range(Self::MIN_SPEED..Self::MAX_SPEED),
        }
    }

    /// Fall; once below the screen, respawn with every attribute redrawn.
    /// Returns true if recycled.
    fn update<R: Rng>(&mut self, rng: &mut R, screen_width: f32, screen_height: f32) -> bool {
        self.pos.y += self.speed;
        if self.pos.y > screen_height {
            *self = Self::spawn(rng, screen_width, screen_height);
            true
        } else {
            false
        }
    }
}

/// Day/sunset/night/rain cycle with its particle layers
///
/// Generic over the random source so tests and replays can inject a seeded
/// generator.
#[derive(Debug, Clone)]
pub struct WeatherCycle<R = Pcg32> {
    config: WeatherConfig,
    clock: CycleClock,
    clouds_far: Vec<Cloud>,
    clouds_near: Vec<Cloud>,
    raindrops: Vec<Raindrop>,
    rng: R,
}

impl WeatherCycle<Pcg32> {
    /// Cycle driven by a PCG generator seeded from `seed`
    pub fn seeded(config: WeatherConfig, seed: u64) -> Result<Self> {
        Self::new(config, Pcg32::seed_from_u64(seed))
    }
}

impl<R: Rng> WeatherCycle<R> {
    /// Validate `config`, then populate every particle layer from `rng`
    pub fn new(config: WeatherConfig, mut rng: R) -> Result<Self> {
        config.validate()?;
        let duration_ticks = config.duration_ticks()?;

        let (w, h) = (config.screen_width, config.screen_height);
        let clouds_far = (0..config.far_clouds.count)
            .map(|_| Cloud::spawn(&mut rng, &config.far_clouds, w))
            .collect();
        let clouds_near = (0..config.near_clouds.count)
            .map(|_| Cloud::spawn(&mut rng, &config.near_clouds, w))
            .collect();
        let raindrops = (0..config.raindrops)
            .map(|_| Raindrop::spawn(&mut rng, w, h))
            .collect();

        log::debug!(
            "Weather cycle: {} ticks per state, {} + {} clouds, {} raindrops",
            duration_ticks,
            config.far_clouds.count,
            config.near_clouds.count,
            config.raindrops
        );

        Ok(Self {
            clock: CycleClock::new(duration_ticks),
            config,
            clouds_far,
            clouds_near,
            raindrops,
            rng,
        })
    }

    /// Advance one tick: clock first, then whichever particle layers are
    /// visible in the resulting state. Returns true if the state changed.
    pub fn update(&mut self) -> bool {
        let changed = self.clock.tick();
        if changed {
            log::info!("Weather changed to {}", self.clock.state().as_str());
        }

        let w = self.config.screen_width;
        let h = self.config.screen_height;

        if self.should_draw_clouds() {
            let rng = &mut self.rng;
            let far = &self.config.far_clouds;
            for cloud in &mut self.clouds_far {
                cloud.update(rng, far, w);
            }
            let near = &self.config.near_clouds;
            for cloud in &mut self.clouds_near {
                cloud.update(rng, near, w);
            }
        }

        if self.should_draw_rain() {
            for drop in &mut self.raindrops {
                drop.update(&mut self.rng, w, h);
            }
        }

        changed
    }
}

impl<R> WeatherCycle<R> {
    /// Sky color blended from the current state toward the next
    pub fn background_color(&self) -> Rgb {
        lerp_color(
            self.clock.state().sky_color(),
            self.clock.next_state().sky_color(),
            self.clock.progress(),
        )
    }

    pub fn should_draw_clouds(&self) -> bool {
        clouds_visible(self.clock.state())
    }

    pub fn cloud_color(&self) -> Option<Rgb> {
        cloud_color(self.clock.state(), self.clock.progress())
    }

    pub fn should_draw_rain(&self) -> bool {
        rain_visible(
            self.clock.state(),
            self.clock.next_state(),
            self.clock.progress(),
        )
    }

    /// Draw clouds (far layer under near layer) and rain
    pub fn draw<S: Surface>(&self, surface: &mut S) {
        if let Some(color) = self.cloud_color()
            && self.should_draw_clouds()
        {
            for cloud in self.clouds_far.iter().chain(&self.clouds_near) {
                for puff in cloud.puffs() {
                    surface.fill_ellipse(puff, color);
                }
            }
        }

        if self.should_draw_rain() {
            for drop in &self.raindrops {
                let end = drop.pos + Vec2::new(0.0, drop.length);
                surface.draw_line(drop.pos, end, 1.0, RAIN_COLOR);
            }
        }
    }

    /// Jump straight to a point in the cycle
    pub fn seek(&mut self, state: WeatherState, elapsed_ticks: u32) {
        self.clock.seek(state, elapsed_ticks);
    }

    /// Jump to the start of the next state and return it
    pub fn skip_to_next(&mut self) -> WeatherState {
        let next = self.clock.next_state();
        self.clock.seek(next, 0);
        log::info!("Weather skipped to {}", next.as_str());
        next
    }

    pub fn clock(&self) -> &CycleClock {
        &self.clock
    }

    pub fn state(&self) -> WeatherState {
        self.clock.state()
    }

    pub fn next_state(&self) -> WeatherState {
        self.clock.next_state()
    }

    pub fn progress(&self) -> f32 {
        self.clock.progress()
    }

    pub fn config(&self) -> &WeatherConfig {
        &self.config
    }

    pub fn clouds_far(&self) -> &[Cloud] {
        &self.clouds_far
    }

    pub fn clouds_near(&self) -> &[Cloud] {
        &self.clouds_near
    }

    pub fn raindrops(&self) -> &[Raindrop] {
        &self.raindrops
    }
}
