use std::path::PathBuf;
use clap::{Args, Parser, Subcommand};
use blinkscope::dsp::ThresholdSpec;
#[derive(Parser, Debug)]
#[command(
    name = "blinkscope",
    version,
    about = "Zero-phase filtering and blink detection for frontal EEG recordings",
    long_about = "Low-pass filter two-channel frontal EEG/ECoG recordings without phase shift,\n\
                  then flag samples outside a per-channel threshold band as blink artifacts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Low-pass filter a recording, export the filtered table and the stage-1 chart
    Denoise(DenoiseArgs),
    /// Filter, detect blink artifacts, export the blink table and the stage-2 chart
    Blinks(BlinksArgs),
    /// Write a synthetic two-channel recording with blinks
    Synth(SynthArgs),
    /// Print the effective configuration as JSON
    Config(ConfigArgs),
}
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Input CSV with a time column and one column per channel
    pub input: PathBuf,
    /// JSON configuration file; missing fields fall back to defaults
    #[arg(long, env = "BLINKSCOPE_CONFIG")]
    pub config: Option<PathBuf>,
    /// Sampling rate of the input in Hz
    #[arg(long)]
    pub sample_rate: Option<f64>,
    /// Low-pass cutoff in Hz
    #[arg(long)]
    pub cutoff: Option<f64>,
    /// Cutoff found to work best for this subject; applied after the first pass
    #[arg(long, conflicts_with = "cutoff")]
    pub optimal_cutoff: Option<f64>,
    /// Low-pass filter order
    #[arg(long)]
    pub order: Option<usize>,
    /// High-pass the raw recording once to remove DC offset and drift
    #[arg(long)]
    pub remove_dc: bool,
    /// Directory for tables and charts
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Subject name used in chart file names
    #[arg(long)]
    pub user: Option<String>,
    /// Session date used in chart file names
    #[arg(long)]
    pub date: Option<String>,
    /// Skip PNG rendering
    #[arg(long)]
    pub no_images: bool,
}
#[derive(Args, Debug)]
pub struct DenoiseArgs {
    #[command(flatten)]
    pub run: RunArgs,
}
#[derive(Args, Debug)]
pub struct BlinksArgs {
    #[command(flatten)]
    pub run: RunArgs,
    /// Per-channel threshold as LABEL=BASE:TOLERANCE, e.g. FP1=8500:100
    #[arg(long = "threshold", value_parser = parse_threshold)]
    pub thresholds: Vec<ThresholdOverride>,
}
#[derive(Args, Debug)]
pub struct SynthArgs {
    /// Output CSV path
    pub output: PathBuf,
    #[arg(long, default_value_t = 256.0)]
    pub sample_rate: f64,
    /// Length of the recording in seconds
    #[arg(long, default_value_t = 10.0)]
    pub seconds: f64,
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// JSON configuration file to validate and print
    #[arg(long, env = "BLINKSCOPE_CONFIG")]
    pub config: Option<PathBuf>,
}
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdOverride {
    pub label: String,
    pub threshold: ThresholdSpec,
}
pub fn parse_threshold(text: &str) -> Result<ThresholdOverride, String> {
    let (label, rest) = text
        .split_once('=')
        .ok_or_else(|| format!("expected LABEL=BASE:TOLERANCE, got '{text}'"))?;
    let (base, tolerance) = rest
        .split_once(':')
        .ok_or_else(|| format!("expected BASE:TOLERANCE after '=', got '{rest}'"))?;
    let number = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("'{s}' is not a number"))
    };
    let label = label.trim();
    if label.is_empty() {
        return Err("channel label must not be empty".into());
    }
    let threshold = ThresholdSpec::new(number(base)?, number(tolerance)?).map_err(|e| e.to_string())?;
    Ok(ThresholdOverride {
        label: label.to_string(),
        threshold,
    })
}
