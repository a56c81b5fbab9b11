//! Core configuration for companion-core.
//!
//! Every tuning constant of the idle, flight and eat animations is a default
//! here, so hosts can load an override from JSON without touching the engine.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::Vec2;

/// Frame pacing for tick schedulers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Frame rate that maps to one frame-unit of `Tick::delta_time`.
    pub target_fps: f32,
    /// Upper bound for a single frame delta; longer stalls are clamped.
    pub max_delta_ms: f32,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            target_fps: 60.0,
            max_delta_ms: 100.0,
        }
    }
}

/// Floating, breathing and head-turn motion while idle.
/// Speeds are per frame-unit.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub breath_amplitude: f32,
    pub breath_speed: f32,
    pub head_turn_period: f32,
    pub head_turn_window: f32,
    /// Maximum absolute head-turn rotation in radians.
    pub head_turn_max: f32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            float_amplitude: 4.0,
            float_speed: 0.04,
            breath_amplitude: 0.03,
            breath_speed: 0.08,
            head_turn_period: 200.0,
            head_turn_window: 2.0,
            head_turn_max: 0.05,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub duration_ms: f32,
    pub flap_amplitude: f32,
    /// Wing-flap angular speed per elapsed millisecond.
    pub flap_speed: f32,
    /// Offset from the sprite origin to its leading extremity (the beak).
    pub reach: Vec2,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800.0,
            flap_amplitude: 0.15,
            flap_speed: 0.03,
            reach: Vec2::new(52.0, 10.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EatConfig {
    pub duration_ms: f32,
    /// Milliseconds per half peck cycle.
    pub peck_period_ms: f32,
    pub amplitude: f32,
    /// Fraction of the amplitude lost by the end of the oscillation.
    pub decay: f32,
    pub tilt: f32,
}

impl Default for EatConfig {
    fn default() -> Self {
        Self {
            duration_ms: 1000.0,
            peck_period_ms: 180.0,
            amplitude: 10.0,
            decay: 0.5,
            tilt: 0.1,
        }
    }
}

/// Top-level configuration shared by every pet loaded into a companion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    pub ticker: TickerConfig,
    pub idle: IdleConfig,
    pub flight: FlightConfig,
    pub eat: EatConfig,
    /// Initial home position, in surface-local coordinates.
    pub home: Vec2,
    /// Seed for the idle head-turn jitter.
    pub rng_seed: u64,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            ticker: TickerConfig::default(),
            idle: IdleConfig::default(),
            flight: FlightConfig::default(),
            eat: EatConfig::default(),
            home: Vec2::new(100.0, 130.0),
            rng_seed: 0x5EA6_u64,
        }
    }
}

impl CompanionConfig {
    /// Parse and validate a JSON config. Missing sections fall back to defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: CompanionConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("ticker.target_fps", self.ticker.target_fps)?;
        positive("ticker.max_delta_ms", self.ticker.max_delta_ms)?;
        positive("idle.head_turn_period", self.idle.head_turn_period)?;
        positive("flight.duration_ms", self.flight.duration_ms)?;
        positive("eat.duration_ms", self.eat.duration_ms)?;
        positive("eat.peck_period_ms", self.eat.peck_period_ms)?;
        if !(0.0..=1.0).contains(&self.eat.decay) {
            return Err(ConfigError::Invalid {
                field: "eat.decay",
                reason: format!("must be within [0, 1], got {}", self.eat.decay),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, v: f32) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive finite number, got {v}"),
        })
    }
}
