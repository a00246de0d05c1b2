use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use anyhow::{Context, Result};
use log::info;
use crate::recording::Recording;
use crate::session::ChannelDetection;
pub const FILTERED_DATA_FILE: &str = "filtered_data.csv";
pub const BLINKS_FILE: &str = "blinks.csv";
/// Writes the time column followed by every channel, headers as given by the recording.
pub fn write_recording_csv<W: Write>(writer: W, recording: &Recording, time_column: &str) -> Result<()> {
    write_table(writer, recording, time_column, "")
}
/// Same layout as `write_recording_csv`, with `_Filtered` appended to channel headers.
pub fn write_filtered_csv<W: Write>(writer: W, filtered: &Recording, time_column: &str) -> Result<()> {
    write_table(writer, filtered, time_column, "_Filtered")
}
fn write_table<W: Write>(writer: W, recording: &Recording, time_column: &str, suffix: &str) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header = vec![time_column.to_string()];
    header.extend(recording.labels().map(|l| format!("{l}{suffix}")));
    csv.write_record(&header)?;
    for (i, t) in recording.time_s.iter().enumerate() {
        let mut row = vec![t.to_string()];
        row.extend(recording.channels.iter().map(|c| c.samples[i].to_string()));
        csv.write_record(&row)?;
    }
    csv.flush()?;
    Ok(())
}
/// One row per flagged sample, channel by channel.
pub fn write_blinks_csv<W: Write>(
    writer: W,
    detections: &[ChannelDetection],
    time_column: &str,
) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([
        "Channel",
        time_column,
        "Amplitude (uV)",
        "Lower (uV)",
        "Upper (uV)",
    ])?;
    for detection in detections {
        for point in &detection.points {
            csv.write_record(&[
                detection.label.clone(),
                point.time.to_string(),
                point.amplitude.to_string(),
                detection.bounds.lower.to_string(),
                detection.bounds.upper.to_string(),
            ])?;
        }
    }
    csv.flush()?;
    Ok(())
}
pub fn save_recording_csv(path: &Path, recording: &Recording, time_column: &str) -> Result<()> {
    write_recording_csv(create(path)?, recording, time_column)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} samples to {}", recording.len(), path.display());
    Ok(())
}
pub fn save_filtered_csv(path: &Path, filtered: &Recording, time_column: &str) -> Result<()> {
    write_filtered_csv(create(path)?, filtered, time_column)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote filtered data to {}", path.display());
    Ok(())
}
pub fn save_blinks_csv(path: &Path, detections: &[ChannelDetection], time_column: &str) -> Result<()> {
    write_blinks_csv(create(path)?, detections, time_column)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote blink table to {}", path.display());
    Ok(())
}
pub fn save_png(path: &Path, png: &[u8]) -> Result<()> {
    std::fs::write(path, png).with_context(|| format!("writing {}", path.display()))?;
    info!("saved chart {}", path.display());
    Ok(())
}
fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
/// `{user}_{date}_stage-{n}.png`, dropping missing parts; path separators become `_`.
pub fn stage_image_name(user: Option<&str>, date: Option<&str>, stage: u8) -> String {
    let mut parts: Vec<String> = [user, date]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| p.replace(['/', '\\'], "_"))
        .collect();
    parts.push(format!("stage-{stage}.png"));
    parts.join("_")
}
