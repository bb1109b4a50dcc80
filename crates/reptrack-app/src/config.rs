//! Rep tracker configuration.

use clap::ValueEnum;
use reptrack_core::{Error, PoseLandmark, Result};
use reptrack_counter::{
    Calibration, FrameProcessor, LimbId, LimbSpec, ProcessorConfig, Thresholds,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tracked limbs
    pub limbs: LimbsConfig,

    /// Rep counting parameters
    pub counting: CountingConfig,

    /// Output configuration
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimbsConfig {
    pub left: LimbConfig,
    pub right: LimbConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimbConfig {
    /// Whether this limb is tracked at all
    pub enabled: bool,

    /// Landmark indices (MediaPipe Pose schema)
    pub shoulder: u8,
    pub elbow: u8,
    pub wrist: u8,

    /// Contracted angle, mapped to 100% (degrees)
    pub angle_low: f64,

    /// Extended angle, mapped to 0% (degrees)
    pub angle_high: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountingConfig {
    /// Percentage at or above which the top is reached
    pub top_threshold: f64,

    /// Percentage at or below which the bottom is reached
    pub bottom_threshold: f64,

    /// Minimum landmark visibility; unset accepts every detection
    pub min_visibility: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Per-frame output format
    pub format: OutputFormat,

    /// Print a session summary after the last frame
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per frame
    Text,
    /// One JSON object per frame
    Json,
}

impl LimbConfig {
    fn from_spec(spec: &LimbSpec) -> Self {
        Self {
            enabled: true,
            shoulder: spec.shoulder.index(),
            elbow: spec.elbow.index(),
            wrist: spec.wrist.index(),
            angle_low: spec.calibration.angle_low(),
            angle_high: spec.calibration.angle_high(),
        }
    }

    fn to_spec(&self, id: LimbId) -> Result<LimbSpec> {
        let landmark = |idx: u8| PoseLandmark::from_index(idx).ok_or(Error::UnknownLandmark(idx));

        let spec = LimbSpec {
            id,
            shoulder: landmark(self.shoulder)?,
            elbow: landmark(self.elbow)?,
            wrist: landmark(self.wrist)?,
            calibration: Calibration::new(self.angle_low, self.angle_high)?,
        };

        if spec.shoulder == spec.elbow || spec.elbow == spec.wrist || spec.shoulder == spec.wrist {
            return Err(Error::Config(format!(
                "{id}: shoulder, elbow and wrist must be distinct landmarks"
            )));
        }

        Ok(spec)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            limbs: LimbsConfig {
                left: LimbConfig::from_spec(&LimbSpec::left_arm()),
                right: LimbConfig::from_spec(&LimbSpec::right_arm()),
            },
            counting: CountingConfig {
                top_threshold: Thresholds::default().top(),
                bottom_threshold: Thresholds::default().bottom(),
                min_visibility: Some(0.5),
            },
            output: OutputConfig {
                format: OutputFormat::Text,
                summary: true,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from file, layered over the defaults
    pub fn from_file(path: &Path) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from(path))
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load from environment variables, layered over the defaults
    pub fn from_env() -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(Self::environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Parse TOML contents, layered over the defaults
    pub fn from_toml(contents: &str) -> std::result::Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(config::File::from_str(contents, config::FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("REPTRACK")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Limb specs for every enabled limb
    pub fn limb_specs(&self) -> Result<Vec<LimbSpec>> {
        [(LimbId::Left, &self.limbs.left), (LimbId::Right, &self.limbs.right)]
            .into_iter()
            .filter(|(_, limb)| limb.enabled)
            .map(|(id, limb)| limb.to_spec(id))
            .collect()
    }

    pub fn processor_config(&self) -> Result<ProcessorConfig> {
        let thresholds = Thresholds::new(self.counting.top_threshold, self.counting.bottom_threshold)?;

        if let Some(min) = self.counting.min_visibility {
            if !(0.0..=1.0).contains(&min) {
                return Err(Error::Config(format!(
                    "min_visibility must be within [0, 1], got {min}"
                )));
            }
        }

        Ok(ProcessorConfig {
            thresholds,
            min_visibility: self.counting.min_visibility,
        })
    }

    pub fn build_processor(&self) -> Result<FrameProcessor> {
        FrameProcessor::new(self.limb_specs()?, self.processor_config()?)
    }

    /// Check every setting without building anything
    pub fn validate(&self) -> Result<()> {
        self.build_processor().map(|_| ())
    }
}
