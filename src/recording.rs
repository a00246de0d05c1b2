use std::collections::HashSet;
use crate::error::{BlinkError, Result};
#[derive(Clone, Debug, PartialEq)]
pub struct Channel {
    pub label: String,
    pub samples: Vec<f64>,
}
impl Channel {
    pub fn new(label: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            samples,
        }
    }
}
/// Equally long channels sharing one time base, in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    pub sample_rate_hz: f64,
    pub time_s: Vec<f64>,
    pub channels: Vec<Channel>,
}
impl Recording {
    pub fn new(sample_rate_hz: f64, time_s: Vec<f64>, channels: Vec<Channel>) -> Result<Self> {
        let recording = Self {
            sample_rate_hz,
            time_s,
            channels,
        };
        recording.validate()?;
        Ok(recording)
    }
    /// Builds the time base `i / sample_rate_hz` for the given channels.
    pub fn with_uniform_time(sample_rate_hz: f64, channels: Vec<Channel>) -> Result<Self> {
        let len = channels.first().map(|c| c.samples.len()).unwrap_or(0);
        let time_s = (0..len).map(|i| i as f64 / sample_rate_hz).collect();
        Self::new(sample_rate_hz, time_s, channels)
    }
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(BlinkError::config(format!(
                "sample rate must be positive, got {}",
                self.sample_rate_hz
            )));
        }
        let mut seen = HashSet::new();
        for channel in &self.channels {
            if !seen.insert(channel.label.as_str()) {
                return Err(BlinkError::config(format!(
                    "duplicate channel label {}",
                    channel.label
                )));
            }
            if channel.samples.len() != self.time_s.len() {
                return Err(BlinkError::LengthMismatch {
                    expected: self.time_s.len(),
                    actual: channel.samples.len(),
                });
            }
        }
        Ok(())
    }
    pub fn len(&self) -> usize {
        self.time_s.len()
    }
    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }
    pub fn duration_seconds(&self) -> f64 {
        self.len() as f64 / self.sample_rate_hz
    }
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.label.as_str())
    }
    pub fn channel(&self, label: &str) -> Result<&Channel> {
        self.channels
            .iter()
            .find(|c| c.label == label)
            .ok_or_else(|| BlinkError::UnknownChannel(label.to_string()))
    }
    /// New recording on the same time base, each channel replaced by `f`'s output.
    pub fn map_channels<F>(&self, mut f: F) -> Result<Recording>
    where
        F: FnMut(&Channel) -> Result<Vec<f64>>,
    {
        let channels = self
            .channels
            .iter()
            .map(|c| Ok(Channel::new(c.label.clone(), f(c)?)))
            .collect::<Result<Vec<_>>>()?;
        Recording::new(self.sample_rate_hz, self.time_s.clone(), channels)
    }
}
