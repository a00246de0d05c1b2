use log::{debug, info, warn};
use crate::config::{AnalysisConfig, ChannelConfig, DenoiseConfig};
use crate::dsp::butterworth::FilterSpec;
use crate::dsp::detector::{detect, select_artifacts, ArtifactMask, ArtifactPoint, Bounds, ThresholdSpec};
use crate::error::{BlinkError, Result};
use crate::recording::Recording;
/// Detection outcome for one channel of the filtered recording.
#[derive(Clone, Debug)]
pub struct ChannelDetection {
    pub label: String,
    pub threshold: ThresholdSpec,
    pub bounds: Bounds,
    pub mask: ArtifactMask,
    pub points: Vec<ArtifactPoint>,
}
impl ChannelDetection {
    pub fn count(&self) -> usize {
        self.points.len()
    }
}
/// Interactive analysis state: the raw recording, its optional high-pass baseline and the
/// current low-pass output.
///
/// The baseline is computed once. Every accepted cutoff change re-filters the baseline;
/// a rejected change leaves cutoff and output as they were.
pub struct AnalysisSession {
    raw: Recording,
    baseline: Recording,
    filtered: Recording,
    denoise: DenoiseConfig,
    cutoff_hz: f64,
    thresholds: Vec<ChannelConfig>,
}
impl AnalysisSession {
    pub fn new(raw: Recording, config: &AnalysisConfig) -> Result<Self> {
        config.validate()?;
        raw.validate()?;
        for channel in &config.channels {
            raw.channel(&channel.label)?;
        }
        let baseline = if config.baseline.enabled {
            let spec = FilterSpec::highpass(
                config.baseline.cutoff_hz,
                raw.sample_rate_hz,
                config.baseline.order,
            );
            let tf = spec.design()?;
            info!(
                "removing baseline with order-{} high-pass at {} Hz",
                spec.order, spec.cutoff_hz
            );
            raw.map_channels(|c| tf.apply(&c.samples))?
        } else {
            raw.clone()
        };
        let cutoff_hz = config.denoise.cutoff_hz;
        let filtered = denoise(&baseline, cutoff_hz, config.denoise.order)?;
        Ok(Self {
            raw,
            baseline,
            filtered,
            denoise: config.denoise.clone(),
            cutoff_hz,
            thresholds: config.channels.clone(),
        })
    }
    pub fn raw(&self) -> &Recording {
        &self.raw
    }
    pub fn baseline(&self) -> &Recording {
        &self.baseline
    }
    pub fn filtered(&self) -> &Recording {
        &self.filtered
    }
    pub fn cutoff_hz(&self) -> f64 {
        self.cutoff_hz
    }
    pub fn set_cutoff(&mut self, cutoff_hz: f64) -> Result<()> {
        let result = self
            .denoise
            .check_cutoff(cutoff_hz)
            .and_then(|_| denoise(&self.baseline, cutoff_hz, self.denoise.order));
        match result {
            Ok(filtered) => {
                debug!("cutoff {} Hz -> {} Hz", self.cutoff_hz, cutoff_hz);
                self.cutoff_hz = cutoff_hz;
                self.filtered = filtered;
                Ok(())
            }
            Err(err) => {
                warn!("keeping cutoff {} Hz: {err}", self.cutoff_hz);
                Err(err)
            }
        }
    }
    /// Parses user-entered cutoff text; unparseable text keeps the current cutoff.
    pub fn set_cutoff_text(&mut self, text: &str) -> Result<()> {
        let cutoff_hz = parse_number("cutoff", text)?;
        self.set_cutoff(cutoff_hz)
    }
    /// Jumps to a pre-chosen cutoff, e.g. the one found to work best for a subject.
    pub fn apply_preset_cutoff(&mut self, cutoff_hz: f64) -> Result<()> {
        info!("applying preset cutoff {cutoff_hz} Hz");
        self.set_cutoff(cutoff_hz)
    }
    pub fn threshold(&self, label: &str) -> Result<ThresholdSpec> {
        self.thresholds
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.threshold)
            .ok_or_else(|| BlinkError::UnknownChannel(label.to_string()))
    }
    pub fn set_threshold(&mut self, label: &str, threshold: ThresholdSpec) -> Result<()> {
        threshold.validate()?;
        let entry = self
            .thresholds
            .iter_mut()
            .find(|c| c.label == label)
            .ok_or_else(|| BlinkError::UnknownChannel(label.to_string()))?;
        entry.threshold = threshold;
        Ok(())
    }
    pub fn set_base(&mut self, label: &str, base: f64) -> Result<()> {
        let current = self.threshold(label)?;
        self.set_threshold(label, ThresholdSpec { base, ..current })
    }
    pub fn set_base_text(&mut self, label: &str, text: &str) -> Result<()> {
        let base = parse_number(label, text).map_err(|err| {
            warn!("keeping {label} base: {err}");
            err
        })?;
        self.set_base(label, base)
    }
    pub fn set_tolerance(&mut self, label: &str, tolerance: f64) -> Result<()> {
        let current = self.threshold(label)?;
        self.set_threshold(
            label,
            ThresholdSpec {
                tolerance,
                ..current
            },
        )
    }
    /// Runs the detector on the current filtered output of one channel.
    pub fn detect(&self, label: &str) -> Result<ChannelDetection> {
        let threshold = self.threshold(label)?;
        let channel = self.filtered.channel(label)?;
        let bounds = threshold.bounds();
        let mask = detect(&channel.samples, bounds);
        let points = select_artifacts(&channel.samples, &self.filtered.time_s, &mask)?;
        debug!(
            "{label}: {} samples outside [{}, {}]",
            points.len(),
            bounds.lower,
            bounds.upper
        );
        Ok(ChannelDetection {
            label: label.to_string(),
            threshold,
            bounds,
            mask,
            points,
        })
    }
    pub fn detect_all(&self) -> Result<Vec<ChannelDetection>> {
        self.thresholds
            .iter()
            .map(|c| self.detect(&c.label))
            .collect()
    }
}
fn denoise(baseline: &Recording, cutoff_hz: f64, order: usize) -> Result<Recording> {
    let tf = FilterSpec::lowpass(cutoff_hz, baseline.sample_rate_hz, order).design()?;
    baseline.map_channels(|c| tf.apply(&c.samples))
}
fn parse_number(field: &str, text: &str) -> Result<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(BlinkError::MalformedInput {
            field: field.to_string(),
            value: text.to_string(),
        }),
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::Channel;
    use std::f64::consts::PI;
    fn recording(len: usize) -> Recording {
        let fs = 256.0;
        let wave = |offset: f64, freq: f64| -> Vec<f64> {
            (0..len)
                .map(|i| offset + 40.0 * (2.0 * PI * freq * i as f64 / fs).sin())
                .collect()
        };
        Recording::with_uniform_time(
            fs,
            vec![
                Channel::new("FP1", wave(8500.0, 2.0)),
                Channel::new("FP2", wave(-8400.0, 3.0)),
            ],
        )
        .unwrap()
    }
    #[test]
    fn cutoff_changes_refilter_the_baseline() {
        let mut session = AnalysisSession::new(recording(512), &AnalysisConfig::default()).unwrap();
        assert_eq!(session.cutoff_hz(), 30.0);
        let before = session.filtered().clone();
        session.set_cutoff(5.0).unwrap();
        assert_eq!(session.cutoff_hz(), 5.0);
        assert_ne!(session.filtered(), &before);
        assert_eq!(session.baseline(), session.raw());
    }
    #[test]
    fn rejected_cutoff_keeps_previous_output() {
        let mut session = AnalysisSession::new(recording(512), &AnalysisConfig::default()).unwrap();
        session.set_cutoff(15.0).unwrap();
        let before = session.filtered().clone();
        assert!(session.set_cutoff(0.5).is_err());
        assert!(session.set_cutoff(128.0).is_err());
        assert!(matches!(
            session.set_cutoff_text("fast"),
            Err(BlinkError::MalformedInput { .. })
        ));
        assert_eq!(session.cutoff_hz(), 15.0);
        assert_eq!(session.filtered(), &before);
    }
    #[test]
    fn cutoff_valid_for_range_but_not_nyquist_is_rejected() {
        let config = AnalysisConfig {
            sample_rate_hz: 100.0,
            ..AnalysisConfig::default()
        };
        let rec = Recording::with_uniform_time(
            100.0,
            vec![
                Channel::new("FP1", vec![8500.0; 200]),
                Channel::new("FP2", vec![-8400.0; 200]),
            ],
        )
        .unwrap();
        let mut session = AnalysisSession::new(rec, &config).unwrap();
        assert!(matches!(
            session.set_cutoff(60.0),
            Err(BlinkError::InvalidConfiguration(_))
        ));
        assert_eq!(session.cutoff_hz(), 30.0);
    }
    #[test]
    fn base_text_edits() {
        let mut session = AnalysisSession::new(recording(256), &AnalysisConfig::default()).unwrap();
        session.set_base_text("FP1", " 8000 ").unwrap();
        assert_eq!(session.threshold("FP1").unwrap().base, 8000.0);
        assert!(session.set_base_text("FP1", "abc").is_err());
        assert_eq!(session.threshold("FP1").unwrap().base, 8000.0);
        assert!(session.set_tolerance("FP2", 0.0).is_err());
        assert_eq!(session.threshold("FP2").unwrap().tolerance, 100.0);
        assert!(matches!(
            session.set_base("O2", 1.0),
            Err(BlinkError::UnknownChannel(_))
        ));
    }
    #[test]
    fn detection_follows_threshold_edits() {
        let mut rec = recording(512);
        for (i, sample) in rec.channels[0].samples.iter_mut().enumerate() {
            let t = (i as f64 - 200.0) / 10.0;
            *sample += 600.0 * (-t * t / 2.0).exp();
        }
        let mut session = AnalysisSession::new(rec, &AnalysisConfig::default()).unwrap();
        let fp1 = session.detect("FP1").unwrap();
        assert!(fp1.count() > 0);
        assert!(fp1.points.iter().all(|p| p.amplitude > fp1.bounds.upper));
        assert_eq!(session.detect("FP2").unwrap().count(), 0);
        session.set_tolerance("FP1", 5000.0).unwrap();
        assert_eq!(session.detect("FP1").unwrap().count(), 0);
        assert_eq!(session.detect_all().unwrap().len(), 2);
    }
    #[test]
    fn missing_configured_channel_fails() {
        let rec = Recording::with_uniform_time(256.0, vec![Channel::new("FP1", vec![0.0; 64])])
            .unwrap();
        assert!(matches!(
            AnalysisSession::new(rec, &AnalysisConfig::default()),
            Err(BlinkError::UnknownChannel(label)) if label == "FP2"
        ));
    }
    #[test]
    fn baseline_removal_drops_offset() {
        let mut config = AnalysisConfig::default();
        config.baseline.enabled = true;
        config.baseline.cutoff_hz = 1.0;
        let session = AnalysisSession::new(recording(2048), &config).unwrap();
        let fp1 = &session.baseline().channel("FP1").unwrap().samples;
        let mean = fp1[512..1536].iter().sum::<f64>() / 1024.0;
        assert!(mean.abs() < 100.0);
        assert_ne!(session.baseline(), session.raw());
    }
}
