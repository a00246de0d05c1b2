use std::path::Path;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::dsp::detector::ThresholdSpec;
use crate::error::{BlinkError, Result};
/// Settings for one analysis run, loadable from a JSON file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: f64,
    #[serde(default = "default_time_column")]
    pub time_column: String,
    #[serde(default)]
    pub baseline: BaselineConfig,
    #[serde(default)]
    pub denoise: DenoiseConfig,
    #[serde(default = "default_channels")]
    pub channels: Vec<ChannelConfig>,
}
/// Optional high-pass run once over the raw recording to drop DC offset and drift.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BaselineConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_baseline_cutoff")]
    pub cutoff_hz: f64,
    #[serde(default = "default_baseline_order")]
    pub order: usize,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DenoiseConfig {
    #[serde(default = "default_denoise_cutoff")]
    pub cutoff_hz: f64,
    #[serde(default = "default_denoise_order")]
    pub order: usize,
    #[serde(default = "default_min_cutoff")]
    pub min_cutoff_hz: f64,
    #[serde(default = "default_max_cutoff")]
    pub max_cutoff_hz: f64,
}
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub label: String,
    pub threshold: ThresholdSpec,
}
fn default_sample_rate() -> f64 {
    256.0
}
fn default_time_column() -> String {
    "Time (s)".to_string()
}
fn default_baseline_cutoff() -> f64 {
    0.1
}
fn default_baseline_order() -> usize {
    5
}
fn default_denoise_cutoff() -> f64 {
    30.0
}
fn default_denoise_order() -> usize {
    4
}
fn default_min_cutoff() -> f64 {
    1.0
}
fn default_max_cutoff() -> f64 {
    100.0
}
fn default_channels() -> Vec<ChannelConfig> {
    vec![
        ChannelConfig {
            label: "FP1".to_string(),
            threshold: ThresholdSpec {
                base: 8500.0,
                tolerance: 100.0,
            },
        },
        ChannelConfig {
            label: "FP2".to_string(),
            threshold: ThresholdSpec {
                base: -8400.0,
                tolerance: 100.0,
            },
        },
    ]
}
impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cutoff_hz: default_baseline_cutoff(),
            order: default_baseline_order(),
        }
    }
}
impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: default_denoise_cutoff(),
            order: default_denoise_order(),
            min_cutoff_hz: default_min_cutoff(),
            max_cutoff_hz: default_max_cutoff(),
        }
    }
}
impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate(),
            time_column: default_time_column(),
            baseline: BaselineConfig::default(),
            denoise: DenoiseConfig::default(),
            channels: default_channels(),
        }
    }
}
impl DenoiseConfig {
    /// Cutoffs the caller may pick; the filter itself still needs `cutoff < fs / 2`.
    pub fn check_cutoff(&self, cutoff_hz: f64) -> Result<()> {
        if !(cutoff_hz >= self.min_cutoff_hz && cutoff_hz <= self.max_cutoff_hz) {
            return Err(BlinkError::config(format!(
                "cutoff {cutoff_hz} Hz outside the allowed range {}..={} Hz",
                self.min_cutoff_hz, self.max_cutoff_hz
            )));
        }
        Ok(())
    }
}
impl AnalysisConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(BlinkError::config(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        if self.time_column.trim().is_empty() {
            return Err(BlinkError::config("time column name must not be empty"));
        }
        if self.baseline.order == 0 || self.denoise.order == 0 {
            return Err(BlinkError::config("filter order must be at least 1"));
        }
        let d = &self.denoise;
        if !(d.min_cutoff_hz > 0.0 && d.min_cutoff_hz <= d.max_cutoff_hz) {
            return Err(BlinkError::config(format!(
                "cutoff range {}..={} Hz is empty",
                d.min_cutoff_hz, d.max_cutoff_hz
            )));
        }
        d.check_cutoff(d.cutoff_hz)?;
        if self.channels.is_empty() {
            return Err(BlinkError::config("at least one channel must be configured"));
        }
        for (i, channel) in self.channels.iter().enumerate() {
            if channel.label == self.time_column {
                return Err(BlinkError::config(format!(
                    "channel {} shares its name with the time column",
                    channel.label
                )));
            }
            if self.channels[..i].iter().any(|c| c.label == channel.label) {
                return Err(BlinkError::config(format!(
                    "channel {} configured twice",
                    channel.label
                )));
            }
            channel.threshold.validate()?;
        }
        Ok(())
    }
    pub fn channel_labels(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.label.clone()).collect()
    }
    pub fn threshold_for(&self, label: &str) -> Option<ThresholdSpec> {
        self.channels
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.threshold)
    }
    /// Replaces the threshold of `label`, appending the channel if it is new.
    pub fn set_threshold(&mut self, label: &str, threshold: ThresholdSpec) {
        match self.channels.iter_mut().find(|c| c.label == label) {
            Some(channel) => channel.threshold = threshold,
            None => self.channels.push(ChannelConfig {
                label: label.to_string(),
                threshold,
            }),
        }
    }
}
