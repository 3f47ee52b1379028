use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{nps::NOTES_PER_BUCKET, ChartError, NpsBucketer, Result};

/// Tolerance used when looking for the hardest section of a chart.
pub const PEAK_EPSILON: f32 = 0.001;

/// Share of the remaining section time spent fading the peak warning in.
pub const WARNING_FADE_RATIO: f32 = 0.2;

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub enabled: bool,
    pub bucketing: BucketingConfig,
    pub warning: WarningConfig,
    pub graph: GraphConfig,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bucketing: BucketingConfig::default(),
            warning: WarningConfig::default(),
            graph: GraphConfig::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded chart config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.bucketing.validate()?;
        self.warning.validate()?;
        self.graph.validate()
    }

    pub fn bucketer(&self) -> NpsBucketer {
        NpsBucketer::with_notes_per_bucket(self.bucketing.notes_per_bucket)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketingConfig {
    pub notes_per_bucket: usize,
}

impl Default for BucketingConfig {
    fn default() -> Self {
        Self {
            notes_per_bucket: NOTES_PER_BUCKET,
        }
    }
}

impl BucketingConfig {
    fn validate(&self) -> Result<()> {
        if self.notes_per_bucket == 0 {
            return Err(ChartError::invalid_config(
                "bucketing.notes_per_bucket must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Settings for the "peak difficulty approaching" countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningConfig {
    pub peak_warning: bool,
    pub peak_epsilon: f32,
    pub fade_ratio: f32,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            peak_warning: true,
            peak_epsilon: PEAK_EPSILON,
            fade_ratio: WARNING_FADE_RATIO,
        }
    }
}

impl WarningConfig {
    fn validate(&self) -> Result<()> {
        if self.peak_epsilon.is_nan() || self.peak_epsilon <= 0.0 {
            return Err(ChartError::invalid_config(
                "warning.peak_epsilon must be positive",
            ));
        }
        if self.fade_ratio.is_nan() || self.fade_ratio < 0.0 {
            return Err(ChartError::invalid_config(
                "warning.fade_ratio must not be negative",
            ));
        }
        Ok(())
    }
}

/// Size and appearance of the line graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub width: f32,
    pub height: f32,
    /// Anchor the value axis at zero instead of below the smallest sample.
    pub origin_zero: bool,
    /// Only lay out the last `n` samples when set.
    pub max_visible: Option<usize>,
    pub line_color: String,
    pub pointer_color: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 105.0,
            height: 65.0,
            origin_zero: false,
            max_visible: None,
            line_color: "#FFFFFF".to_string(),
            pointer_color: "#00FF00".to_string(),
        }
    }
}

impl GraphConfig {
    fn validate(&self) -> Result<()> {
        let positive = |value: f32| value > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(ChartError::invalid_config(format!(
                "graph size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.max_visible == Some(0) {
            return Err(ChartError::invalid_config(
                "graph.max_visible must be at least 1",
            ));
        }
        for (name, value) in [
            ("line_color", &self.line_color),
            ("pointer_color", &self.pointer_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(ChartError::invalid_config(format!(
                    "graph.{name} `{value}` is not a #RRGGBB colour"
                )));
            }
        }
        Ok(())
    }

    pub fn line_rgb(&self) -> Option<[u8; 3]> {
        parse_hex_color(&self.line_color)
    }

    pub fn pointer_rgb(&self) -> Option<[u8; 3]> {
        parse_hex_color(&self.pointer_color)
    }
}

fn parse_hex_color(value: &str) -> Option<[u8; 3]> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
