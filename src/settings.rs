//! Game settings and preferences
//!
//! Persisted separately from high scores through the [`Store`].

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_RATE, SCREEN_HEIGHT, SCREEN_WIDTH, WEATHER_CYCLE_SECONDS};
use crate::error::{Error, Result};
use crate::highscores::DEFAULT_MAX_HIGH_SCORES;
use crate::persistence::Store;
use crate::sim::{CloudLayerConfig, Features, PickupKind, WeatherConfig};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Raindrops in the rain layer
    pub fn raindrops(&self) -> usize {
        match self {
            QualityPreset::Low => 40,
            QualityPreset::Medium => 100,
            QualityPreset::High => 180,
        }
    }

    /// Whether to render the far (background) cloud layer
    pub fn far_clouds_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Weather ===
    /// Day/sunset/night/rain cycle (plain day sky when off)
    pub weather: bool,
    /// Seconds per weather state
    pub cycle_seconds: u32,

    // === Gameplay ===
    /// Pickups that can spawn (empty disables pickups)
    pub pickups: Vec<PickupKind>,

    // === High scores ===
    pub high_scores: bool,
    pub max_high_scores: usize,

    // === Accessibility ===
    /// Reduced motion (no falling rain)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            weather: true,
            cycle_seconds: WEATHER_CYCLE_SECONDS,

            pickups: vec![PickupKind::Shield, PickupKind::DoublePoints],

            high_scores: true,
            max_high_scores: DEFAULT_MAX_HIGH_SCORES,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Store key
    const STORAGE_KEY: &'static str = "settings";

    /// Every pickup kind enabled
    pub fn all_pickups(mut self) -> Self {
        self.pickups = PickupKind::ALL.to_vec();
        self
    }

    /// Reject values the game can't run with
    pub fn validate(&self) -> Result<()> {
        if self.cycle_seconds == 0 {
            return Err(Error::Config("cycle_seconds must be positive".into()));
        }
        if self.high_scores && self.max_high_scores == 0 {
            return Err(Error::Config("max_high_scores must be positive".into()));
        }
        if self.weather {
            self.weather_config().validate()?;
        }
        Ok(())
    }

    /// Weather parameters for the fixed playfield, ticking at the
    /// simulation rate
    pub fn weather_config(&self) -> WeatherConfig {
        let mut config =
            WeatherConfig::new(SCREEN_WIDTH, SCREEN_HEIGHT, FRAME_RATE, self.cycle_seconds);
        config.raindrops = if self.reduced_motion {
            0
        } else {
            self.quality.raindrops()
        };
        if !self.quality.far_clouds_enabled() {
            config.far_clouds = CloudLayerConfig {
                count: 0,
                ..CloudLayerConfig::FAR
            };
        }
        config
    }

    /// Simulation features selected by these settings
    pub fn features(&self) -> Features {
        Features {
            weather: self.weather.then(|| self.weather_config()),
            pickups: self.pickups.clone(),
        }
    }

    /// Load settings, falling back to defaults if missing or invalid
    pub fn load(store: &Store) -> Self {
        match store.read::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(settings)) => match settings.validate() {
                Ok(()) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings rejected ({}), using defaults", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        store.write(Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
