use rustfft::{num_complex::Complex64, FftPlanner};
/// Single-sided amplitude spectrum of one channel.
#[derive(Clone, Debug)]
pub struct AmplitudeSpectrum {
    pub sample_rate_hz: f64,
    pub frequencies_hz: Vec<f64>,
    pub amplitudes: Vec<f64>, // peak amplitude per bin
}
impl AmplitudeSpectrum {
    pub fn compute(signal: &[f64], sample_rate_hz: f64) -> Self {
        let n = signal.len();
        if n == 0 {
            return Self {
                sample_rate_hz,
                frequencies_hz: Vec::new(),
                amplitudes: Vec::new(),
            };
        }
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(n);
        let mut buffer: Vec<Complex64> = signal.iter().map(|&v| Complex64::new(v, 0.0)).collect();
        fft.process(&mut buffer);
        let bins = n / 2 + 1;
        let frequencies_hz = (0..bins)
            .map(|k| k as f64 * sample_rate_hz / n as f64)
            .collect();
        let amplitudes = buffer
            .iter()
            .take(bins)
            .enumerate()
            .map(|(k, c)| {
                // DC and an even-length Nyquist bin have no mirrored twin.
                let single = k == 0 || (n % 2 == 0 && k == n / 2);
                let scale = if single { 1.0 } else { 2.0 };
                scale * c.norm() / n as f64
            })
            .collect();
        Self {
            sample_rate_hz,
            frequencies_hz,
            amplitudes,
        }
    }
    pub fn resolution_hz(&self) -> f64 {
        match self.frequencies_hz.get(1) {
            Some(f) => *f,
            None => self.sample_rate_hz,
        }
    }
    /// Amplitude of the bin nearest to `freq_hz`, zero for an empty spectrum.
    pub fn amplitude_at(&self, freq_hz: f64) -> f64 {
        if self.amplitudes.is_empty() {
            return 0.0;
        }
        let bin = (freq_hz / self.resolution_hz()).round().max(0.0) as usize;
        self.amplitudes
            .get(bin.min(self.amplitudes.len() - 1))
            .copied()
            .unwrap_or(0.0)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    #[test]
    fn finds_sine_amplitude_on_its_bin() {
        let fs = 256.0;
        let signal: Vec<f64> = (0..2560)
            .map(|i| 3.0 * (2.0 * PI * 10.0 * i as f64 / fs).sin() + 7.0)
            .collect();
        let spectrum = AmplitudeSpectrum::compute(&signal, fs);
        assert!((spectrum.resolution_hz() - 0.1).abs() < 1e-12);
        assert!((spectrum.amplitude_at(10.0) - 3.0).abs() < 1e-9);
        assert!((spectrum.amplitude_at(0.0) - 7.0).abs() < 1e-9);
        assert!(spectrum.amplitude_at(20.0) < 1e-9);
    }
    #[test]
    fn empty_signal_has_empty_spectrum() {
        let spectrum = AmplitudeSpectrum::compute(&[], 256.0);
        assert!(spectrum.amplitudes.is_empty());
        assert_eq!(spectrum.amplitude_at(10.0), 0.0);
    }
}
