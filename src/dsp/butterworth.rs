use std::f64::consts::PI;
use log::debug;
use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};
use crate::dsp::filtfilt::apply_filter;
use crate::error::{BlinkError, Result};
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Highpass,
    Lowpass,
}
/// Band type, cutoff and order of one Butterworth stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub kind: FilterKind,
    pub cutoff_hz: f64,
    pub sample_rate_hz: f64,
    pub order: usize,
}
impl FilterSpec {
    pub fn lowpass(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> Self {
        Self {
            kind: FilterKind::Lowpass,
            cutoff_hz,
            sample_rate_hz,
            order,
        }
    }
    pub fn highpass(cutoff_hz: f64, sample_rate_hz: f64, order: usize) -> Self {
        Self {
            kind: FilterKind::Highpass,
            cutoff_hz,
            sample_rate_hz,
            order,
        }
    }
    pub fn design(&self) -> Result<TransferFunction> {
        design_filter(self.kind, self.cutoff_hz, self.sample_rate_hz, self.order)
    }
    /// Designs the filter and runs it forward and backward over `signal`.
    pub fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        self.design()?.apply(signal)
    }
}
/// Numerator (`b`) and denominator (`a`) coefficients, highest power of z⁻¹ last.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferFunction {
    pub b: Vec<f64>,
    pub a: Vec<f64>,
}
impl TransferFunction {
    pub fn apply(&self, signal: &[f64]) -> Result<Vec<f64>> {
        apply_filter(signal, &self.b, &self.a)
    }
    pub fn dc_gain(&self) -> f64 {
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }
}
/// Designs a digital Butterworth filter through the bilinear transform.
///
/// The analog prototype poles are scaled to the pre-warped cutoff, transformed to the
/// z-plane and expanded into polynomial form. Fails with `InvalidConfiguration` unless
/// `0 < cutoff_hz < sample_rate_hz / 2`, the sample rate is positive and `order >= 1`.
pub fn design_filter(
    kind: FilterKind,
    cutoff_hz: f64,
    sample_rate_hz: f64,
    order: usize,
) -> Result<TransferFunction> {
    if order == 0 {
        return Err(BlinkError::config("filter order must be at least 1"));
    }
    if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
        return Err(BlinkError::config(format!(
            "sample rate must be a positive number of Hz, got {sample_rate_hz}"
        )));
    }
    let nyquist = 0.5 * sample_rate_hz;
    let normalized = cutoff_hz / nyquist;
    if !(normalized > 0.0 && normalized < 1.0) {
        return Err(BlinkError::config(format!(
            "cutoff {cutoff_hz} Hz must lie strictly between 0 and the Nyquist frequency {nyquist} Hz"
        )));
    }
    // Work at fs = 2 so the normalized cutoff maps straight onto the unit circle.
    let fs2 = Complex64::new(4.0, 0.0);
    let warped = 4.0 * (PI * normalized / 2.0).tan();
    let prototype = prototype_poles(order);
    let (zeros, poles, gain) = match kind {
        FilterKind::Lowpass => {
            let poles: Vec<Complex64> = prototype.iter().map(|&p| p * warped).collect();
            (Vec::new(), poles, warped.powi(order as i32))
        }
        FilterKind::Highpass => {
            let poles: Vec<Complex64> = prototype
                .iter()
                .map(|&p| Complex64::new(warped, 0.0) / p)
                .collect();
            let prod: Complex64 = prototype.iter().map(|&p| -p).product();
            (
                vec![Complex64::new(0.0, 0.0); order],
                poles,
                (Complex64::new(1.0, 0.0) / prod).re,
            )
        }
    };
    let mut digital_zeros: Vec<Complex64> =
        zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    let digital_poles: Vec<Complex64> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
    // Zeros at infinity land on Nyquist.
    digital_zeros.resize(poles.len(), Complex64::new(-1.0, 0.0));
    let num: Complex64 = zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex64 = poles.iter().map(|&p| fs2 - p).product();
    let digital_gain = gain * (num / den).re;
    let b: Vec<f64> = poly(&digital_zeros)
        .iter()
        .map(|c| c.re * digital_gain)
        .collect();
    let a: Vec<f64> = poly(&digital_poles).iter().map(|c| c.re).collect();
    debug!(
        "designed {kind:?} butterworth: order {order}, cutoff {cutoff_hz} Hz @ {sample_rate_hz} Hz, {} taps",
        a.len()
    );
    Ok(TransferFunction { b, a })
}
/// Magnitude of the frequency response at `freq_hz`.
pub fn frequency_response(tf: &TransferFunction, freq_hz: f64, sample_rate_hz: f64) -> f64 {
    let omega = 2.0 * PI * freq_hz / sample_rate_hz;
    let eval = |coeffs: &[f64]| -> Complex64 {
        coeffs
            .iter()
            .enumerate()
            .map(|(k, &c)| Complex64::from_polar(c, -omega * k as f64))
            .sum()
    };
    (eval(&tf.b) / eval(&tf.a)).norm()
}
fn prototype_poles(order: usize) -> Vec<Complex64> {
    let n = order as f64;
    (0..order)
        .map(|k| {
            let m = 2.0 * k as f64 - (n - 1.0);
            -Complex64::from_polar(1.0, PI * m / (2.0 * n))
        })
        .collect()
}
/// Expands roots into monic polynomial coefficients, highest power first.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coeffs = next;
    }
    coeffs
}
#[cfg(test)]
mod tests {
    use super::*;
    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-8, "{actual:?} != {expected:?}");
        }
    }
    #[test]
    fn second_order_half_band_matches_reference_coefficients() {
        let lp = design_filter(FilterKind::Lowpass, 64.0, 256.0, 2).unwrap();
        assert_close(&lp.b, &[0.29289321881, 0.58578643763, 0.29289321881]);
        assert_close(&lp.a, &[1.0, 0.0, 0.17157287525]);
        let hp = design_filter(FilterKind::Highpass, 64.0, 256.0, 2).unwrap();
        assert_close(&hp.b, &[0.29289321881, -0.58578643763, 0.29289321881]);
        assert_close(&hp.a, &[1.0, 0.0, 0.17157287525]);
    }
    #[test]
    fn coefficient_count_follows_order() {
        for order in 1..=6 {
            let tf = design_filter(FilterKind::Lowpass, 20.0, 250.0, order).unwrap();
            assert_eq!(tf.b.len(), order + 1);
            assert_eq!(tf.a.len(), order + 1);
            assert!((tf.a[0] - 1.0).abs() < 1e-12);
        }
    }
    #[test]
    fn cutoff_sits_at_half_power() {
        for kind in [FilterKind::Lowpass, FilterKind::Highpass] {
            for order in [4, 5] {
                let tf = design_filter(kind, 15.0, 256.0, order).unwrap();
                let gain = frequency_response(&tf, 15.0, 256.0);
                assert!((gain - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
            }
        }
    }
    #[test]
    fn pass_and_stop_bands() {
        let lp = design_filter(FilterKind::Lowpass, 15.0, 256.0, 4).unwrap();
        assert!((lp.dc_gain() - 1.0).abs() < 1e-9);
        assert!(frequency_response(&lp, 60.0, 256.0) < 5e-3);
        let hp = design_filter(FilterKind::Highpass, 5.0, 250.0, 5).unwrap();
        assert!(hp.dc_gain().abs() < 1e-6);
        assert!(frequency_response(&hp, 1.0, 250.0) < 1e-3);
        let baseline = design_filter(FilterKind::Highpass, 0.1, 250.0, 5).unwrap();
        assert!((frequency_response(&baseline, 10.0, 250.0) - 1.0).abs() < 1e-3);
    }
    #[test]
    fn rejects_cutoff_at_or_above_nyquist() {
        let err = design_filter(FilterKind::Lowpass, 130.0, 256.0, 4).unwrap_err();
        assert!(matches!(err, BlinkError::InvalidConfiguration(_)));
        assert!(design_filter(FilterKind::Lowpass, 128.0, 256.0, 4).is_err());
        assert!(design_filter(FilterKind::Highpass, 0.0, 256.0, 4).is_err());
        assert!(design_filter(FilterKind::Highpass, -1.0, 256.0, 4).is_err());
        assert!(design_filter(FilterKind::Lowpass, f64::NAN, 256.0, 4).is_err());
    }
    #[test]
    fn rejects_bad_rate_and_order() {
        assert!(matches!(
            design_filter(FilterKind::Lowpass, 10.0, 0.0, 4),
            Err(BlinkError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            design_filter(FilterKind::Lowpass, 10.0, 256.0, 0),
            Err(BlinkError::InvalidConfiguration(_))
        ));
    }
}
