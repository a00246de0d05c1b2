use std::io::Read;
use std::path::Path;
use anyhow::{bail, Context, Result};
use log::info;
use crate::config::AnalysisConfig;
use crate::recording::{Channel, Recording};
/// Loads the configured time column and channels from a CSV file.
pub fn load_recording(path: &Path, config: &AnalysisConfig) -> Result<Recording> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let recording = read_recording(file, config)
        .with_context(|| format!("loading recording from {}", path.display()))?;
    info!(
        "loaded {} samples x {} channels ({:.1} s) from {}",
        recording.len(),
        recording.channels.len(),
        recording.duration_seconds(),
        path.display()
    );
    Ok(recording)
}
/// Parses a header row plus one numeric row per sample. Unlisted columns are ignored.
pub fn read_recording<R: Read>(reader: R, config: &AnalysisConfig) -> Result<Recording> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let time_idx = column(&config.time_column)?;
    let labels = config.channel_labels();
    let channel_idx = labels
        .iter()
        .map(|label| column(label.as_str()))
        .collect::<Result<Vec<_>>>()?;
    let mut time_s = Vec::new();
    let mut samples: Vec<Vec<f64>> = vec![Vec::new(); labels.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: usize| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("");
            let value = raw
                .parse::<f64>()
                .with_context(|| format!("Row {row_no}, '{}': '{raw}' is not a number", headers[idx]))?;
            if !value.is_finite() {
                bail!("Row {row_no}, '{}': '{raw}' is not finite", headers[idx]);
            }
            Ok(value)
        };
        time_s.push(cell(time_idx)?);
        for (channel, &idx) in samples.iter_mut().zip(&channel_idx) {
            channel.push(cell(idx)?);
        }
    }
    if time_s.is_empty() {
        bail!("CSV has a header but no data rows");
    }
    let channels = labels
        .into_iter()
        .zip(samples)
        .map(|(label, samples)| Channel::new(label, samples))
        .collect();
    Ok(Recording::new(config.sample_rate_hz, time_s, channels)?)
}
#[cfg(test)]
mod tests {
    use super::*;
    const SAMPLE: &str = "Time (s),FP1,FP2,Marker\n0.0,8500,-8400,a\n0.004,8510.5,-8390,b\n0.008, 8700 ,-8600,c\n";
    #[test]
    fn reads_configured_columns() {
        let config = AnalysisConfig {
            sample_rate_hz: 250.0,
            ..AnalysisConfig::default()
        };
        let rec = read_recording(SAMPLE.as_bytes(), &config).unwrap();
        assert_eq!(rec.sample_rate_hz, 250.0);
        assert_eq!(rec.time_s, vec![0.0, 0.004, 0.008]);
        assert_eq!(rec.channel("FP1").unwrap().samples, vec![8500.0, 8510.5, 8700.0]);
        assert_eq!(rec.channel("FP2").unwrap().samples[2], -8600.0);
        assert!(rec.channel("Marker").is_err());
    }
    #[test]
    fn missing_column_is_reported() {
        let err = read_recording("Time (s),FP1\n0,1\n".as_bytes(), &AnalysisConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("FP2"));
    }
    #[test]
    fn non_numeric_cell_is_reported() {
        let err = read_recording(
            "Time (s),FP1,FP2\n0,1,2\n0.1,oops,3\n".as_bytes(),
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("oops"));
    }
    #[test]
    fn header_only_is_rejected() {
        assert!(read_recording("Time (s),FP1,FP2\n".as_bytes(), &AnalysisConfig::default()).is_err());
    }
}
