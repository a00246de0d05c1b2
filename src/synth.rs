use std::f64::consts::PI;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use crate::error::{BlinkError, Result};
use crate::recording::{Channel, Recording};
#[derive(Clone, Debug)]
pub struct SignalGen {
    pub freq_hz: f64,
    pub phase: f64,
    pub amp_uv: f64,
}
impl SignalGen {
    fn sample(&self, t: f64) -> f64 {
        (2.0 * PI * self.freq_hz * t + self.phase).sin() * self.amp_uv
    }
}
/// One electrode: resting offset, rhythms, uniform noise and the blink deflection it sees.
#[derive(Clone, Debug)]
pub struct ChannelRecipe {
    pub label: String,
    pub offset_uv: f64,
    pub gens: Vec<SignalGen>,
    pub noise_uv: f64,
    /// Peak of each blink on this electrode; the sign sets the polarity.
    pub blink_uv: f64,
}
#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub sample_rate_hz: f64,
    pub duration_s: f64,
    pub seed: u64,
    pub blink_times_s: Vec<f64>,
    /// Standard deviation of the Gaussian blink bump.
    pub blink_width_s: f64,
    pub channels: Vec<ChannelRecipe>,
}
impl Default for SynthConfig {
    fn default() -> Self {
        let rhythms = |phase: f64| {
            vec![
                SignalGen {
                    freq_hz: 1.0,
                    phase,
                    amp_uv: 25.0,
                },
                SignalGen {
                    freq_hz: 10.0,
                    phase: phase * 2.0,
                    amp_uv: 20.0,
                },
            ]
        };
        Self {
            sample_rate_hz: 256.0,
            duration_s: 10.0,
            seed: 42,
            blink_times_s: vec![1.5, 4.0, 6.2, 8.5],
            blink_width_s: 0.06,
            channels: vec![
                ChannelRecipe {
                    label: "FP1".into(),
                    offset_uv: 8500.0,
                    gens: rhythms(0.0),
                    noise_uv: 10.0,
                    blink_uv: 400.0,
                },
                ChannelRecipe {
                    label: "FP2".into(),
                    offset_uv: -8400.0,
                    gens: rhythms(0.6),
                    noise_uv: 10.0,
                    blink_uv: -400.0,
                },
            ],
        }
    }
}
impl SynthConfig {
    pub fn with_sample_rate(mut self, sample_rate_hz: f64) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }
    pub fn with_duration(mut self, duration_s: f64) -> Self {
        self.duration_s = duration_s;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
    /// Deterministic recording for a given seed.
    pub fn generate(&self) -> Result<Recording> {
        if !(self.duration_s.is_finite() && self.duration_s > 0.0) {
            return Err(BlinkError::config(format!(
                "duration must be positive, got {}",
                self.duration_s
            )));
        }
        if !(self.blink_width_s > 0.0) {
            return Err(BlinkError::config("blink width must be positive"));
        }
        let len = (self.sample_rate_hz * self.duration_s).round() as usize;
        let mut rng = StdRng::seed_from_u64(self.seed);
        let channels = self
            .channels
            .iter()
            .map(|recipe| {
                let samples = (0..len)
                    .map(|i| {
                        let t = i as f64 / self.sample_rate_hz;
                        let rhythm: f64 = recipe.gens.iter().map(|g| g.sample(t)).sum();
                        let noise = if recipe.noise_uv > 0.0 {
                            rng.gen_range(-recipe.noise_uv..recipe.noise_uv)
                        } else {
                            0.0
                        };
                        recipe.offset_uv + rhythm + noise + recipe.blink_uv * self.blink_envelope(t)
                    })
                    .collect();
                Channel::new(recipe.label.clone(), samples)
            })
            .collect();
        Recording::with_uniform_time(self.sample_rate_hz, channels)
    }
    fn blink_envelope(&self, t: f64) -> f64 {
        self.blink_times_s
            .iter()
            .map(|&center| {
                let z = (t - center) / self.blink_width_s;
                (-0.5 * z * z).exp()
            })
            .sum()
    }
}
