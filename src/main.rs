// src/main.rs
mod cli;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};
use blinkscope::config::AnalysisConfig;
use blinkscope::export::{self, BLINKS_FILE, FILTERED_DATA_FILE};
use blinkscope::plot::{self, PlotStyle};
use blinkscope::synth::SynthConfig;
use blinkscope::{loader, AnalysisSession};
use clap::Parser;
use cli::{BlinksArgs, Cli, Command, ConfigArgs, DenoiseArgs, RunArgs, SynthArgs};
use log::info;
fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut logger = env_logger::Builder::from_default_env();
    match cli.verbose {
        0 => {}
        1 => {
            logger.filter_level(log::LevelFilter::Info);
        }
        2 => {
            logger.filter_level(log::LevelFilter::Debug);
        }
        _ => {
            logger.filter_level(log::LevelFilter::Trace);
        }
    }
    logger.format_timestamp(None).init();
    match cli.command {
        Command::Denoise(args) => denoise(args),
        Command::Blinks(args) => blinks(args),
        Command::Synth(args) => synth(args),
        Command::Config(args) => print_config(args),
    }
}
fn effective_config(path: Option<&Path>, run: Option<&RunArgs>) -> Result<AnalysisConfig> {
    let mut config = match path {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(run) = run {
        if let Some(rate) = run.sample_rate {
            config.sample_rate_hz = rate;
        }
        if let Some(cutoff) = run.cutoff {
            config.denoise.cutoff_hz = cutoff;
        }
        if let Some(order) = run.order {
            config.denoise.order = order;
        }
        if run.remove_dc {
            config.baseline.enabled = true;
        }
    }
    config.validate()?;
    Ok(config)
}
fn open_session(run: &RunArgs, config: &AnalysisConfig) -> Result<AnalysisSession> {
    let recording = loader::load_recording(&run.input, config)?;
    let mut session = AnalysisSession::new(recording, config)
        .with_context(|| format!("analysing {}", run.input.display()))?;
    if let Some(cutoff) = run.optimal_cutoff {
        session.apply_preset_cutoff(cutoff)?;
    }
    fs::create_dir_all(&run.out_dir)
        .with_context(|| format!("creating {}", run.out_dir.display()))?;
    Ok(session)
}
fn denoise(args: DenoiseArgs) -> Result<()> {
    let run = args.run;
    let config = effective_config(run.config.as_deref(), Some(&run))?;
    let session = open_session(&run, &config)?;
    let table = run.out_dir.join(FILTERED_DATA_FILE);
    export::save_filtered_csv(&table, session.filtered(), &config.time_column)?;
    println!(
        "filtered {} samples at {} Hz cutoff -> {}",
        session.filtered().len(),
        session.cutoff_hz(),
        table.display()
    );
    if !run.no_images {
        let png = plot::render_denoise_png(session.baseline(), session.filtered(), &PlotStyle::default())?;
        let name = export::stage_image_name(run.user.as_deref(), run.date.as_deref(), 1);
        export::save_png(&run.out_dir.join(name), &png)?;
    }
    Ok(())
}
fn blinks(args: BlinksArgs) -> Result<()> {
    let run = args.run;
    let mut config = effective_config(run.config.as_deref(), Some(&run))?;
    for o in &args.thresholds {
        config.set_threshold(&o.label, o.threshold);
    }
    let session = open_session(&run, &config)?;
    let detections = session.detect_all()?;
    for detection in &detections {
        info!(
            "{}: band [{}, {}], {} flagged",
            detection.label,
            detection.bounds.lower,
            detection.bounds.upper,
            detection.count()
        );
        println!(
            "{}: {} samples outside [{}, {}]",
            detection.label,
            detection.count(),
            detection.bounds.lower,
            detection.bounds.upper
        );
    }
    export::save_blinks_csv(&run.out_dir.join(BLINKS_FILE), &detections, &config.time_column)?;
    if !run.no_images {
        let png = plot::render_blinks_png(session.filtered(), &detections, &PlotStyle::default())?;
        let name = export::stage_image_name(run.user.as_deref(), run.date.as_deref(), 2);
        export::save_png(&run.out_dir.join(name), &png)?;
    }
    Ok(())
}
fn synth(args: SynthArgs) -> Result<()> {
    let recording = SynthConfig::default()
        .with_sample_rate(args.sample_rate)
        .with_duration(args.seconds)
        .with_seed(args.seed)
        .generate()?;
    let time_column = AnalysisConfig::default().time_column;
    export::save_recording_csv(&args.output, &recording, &time_column)?;
    println!(
        "wrote {} samples x {} channels to {}",
        recording.len(),
        recording.channels.len(),
        args.output.display()
    );
    Ok(())
}
fn print_config(args: ConfigArgs) -> Result<()> {
    let config = effective_config(args.config.as_deref(), None)?;
    println!("{}", config.to_json()?);
    Ok(())
}
