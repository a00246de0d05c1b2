//! Signal conditioning for frontal EEG/ECoG recordings: zero-phase Butterworth
//! filtering and threshold detection of blink artifacts.
pub mod config;
pub mod dsp;
pub mod error;
pub mod export;
pub mod loader;
pub mod plot;
pub mod recording;
pub mod session;
pub mod synth;
pub use config::AnalysisConfig;
pub use error::{BlinkError, Result};
pub use recording::{Channel, Recording};
pub use session::{AnalysisSession, ChannelDetection};
