//! Runtime configuration for the canvas, the shapes, the producer and the
//! renderer policies.
//!
//! Every section carries `#[serde(default)]`, so a TOML file only needs the
//! keys it wants to change. A missing file argument means [`Config::default`].

use std::{fmt, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::render::{ShrinkPolicy, ValuePolicy};

pub const MAX_WINDOW_CAPACITY: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {file}: {source}")]
    Parse {
        file: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// An opaque `#rrggbb` colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let hex = value
            .strip_prefix('#')
            .ok_or_else(|| format!("colour `{value}` must start with '#'"))?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("colour `{value}` must have the form #rrggbb"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| format!("colour `{value}` contains invalid hex digits"))
        };
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub shapes: ShapeConfig,
    pub producer: ProducerConfig,
    pub renderer: RendererConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
    pub background: Rgb,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 500.0,
            background: Rgb(0x1e, 0x1e, 0x2e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeConfig {
    pub radius: f32,
    pub fill: Rgb,
    /// Fill of the circle placed on the canvas at startup, before any state arrives.
    pub seed_fill: Rgb,
}

impl Default for ShapeConfig {
    fn default() -> Self {
        Self {
            radius: 20.0,
            fill: Rgb(0x33, 0x99, 0xff),
            seed_fill: Rgb(0xff, 0x55, 0x55),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProducerConfig {
    pub capacity: usize,
    pub interval_ms: u64,
    pub offset: f32,
    pub amplitude: f32,
    pub phase_step: f32,
}

impl ProducerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            capacity: 9,
            interval_ms: 100,
            offset: 250.0,
            amplitude: 200.0,
            phase_step: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub shrink: ShrinkPolicy,
    pub values: ValuePolicy,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            file: file.clone(),
            source,
        })?;
        Self::from_toml(&content, &file)
    }

    pub fn from_toml(content: &str, file: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            file: file.to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a positive finite number, got {value}"),
                })
            }
        }

        positive("canvas.width", self.canvas.width)?;
        positive("canvas.height", self.canvas.height)?;
        positive("shapes.radius", self.shapes.radius)?;

        if self.shapes.fill == self.shapes.seed_fill {
            return Err(ConfigError::Invalid {
                field: "shapes.fill",
                reason: format!("must differ from shapes.seed_fill ({})", self.shapes.seed_fill),
            });
        }

        if self.producer.capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "producer.capacity",
                reason: "the sliding window needs room for at least one sample".into(),
            });
        }
        if self.producer.capacity > MAX_WINDOW_CAPACITY {
            return Err(ConfigError::Invalid {
                field: "producer.capacity",
                reason: format!(
                    "{} exceeds the maximum window of {MAX_WINDOW_CAPACITY} samples",
                    self.producer.capacity
                ),
            });
        }
        if self.producer.interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "producer.interval_ms",
                reason: "the tick interval must be at least 1ms".into(),
            });
        }
        for (field, value) in [
            ("producer.offset", self.producer.offset),
            ("producer.amplitude", self.producer.amplitude),
            ("producer.phase_step", self.producer.phase_step),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite number, got {value}"),
                });
            }
        }
        Ok(())
    }
}
