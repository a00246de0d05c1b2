// src/dsp/mod.rs
pub mod butterworth;
pub mod detector;
pub mod filtfilt;
pub mod spectrum;
pub use butterworth::{design_filter, frequency_response, FilterKind, FilterSpec, TransferFunction};
pub use detector::{
    compute_bounds, detect, select_artifacts, ArtifactMask, ArtifactPoint, Bounds, ThresholdSpec,
};
pub use filtfilt::{apply_filter, lfilter, lfilter_zi, min_signal_len};
pub use spectrum::AmplitudeSpectrum;
