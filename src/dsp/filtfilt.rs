use log::trace;
use crate::error::{BlinkError, Result};
/// Shortest signal `apply_filter` accepts for the given coefficient lengths.
pub fn min_signal_len(numerator_len: usize, denominator_len: usize) -> usize {
    padlen(numerator_len, denominator_len) + 1
}
fn padlen(numerator_len: usize, denominator_len: usize) -> usize {
    3 * numerator_len.max(denominator_len)
}
/// Zero-phase filtering: a forward pass, then a pass over the time-reversed result.
///
/// Both ends are padded with an odd reflection of `3 * max(len(b), len(a))` samples and
/// each pass starts from the steady state for its first input sample, so there is no
/// start-up transient at either edge. The output has the same length as `signal`.
pub fn apply_filter(signal: &[f64], numerator: &[f64], denominator: &[f64]) -> Result<Vec<f64>> {
    let (b, a) = normalize(numerator, denominator)?;
    let pad = padlen(numerator.len(), denominator.len());
    if signal.len() <= pad {
        return Err(BlinkError::SignalTooShort {
            len: signal.len(),
            required: pad + 1,
        });
    }
    let extended = odd_extension(signal, pad);
    let zi = steady_state(&b, &a);
    let x0 = extended[0];
    let mut forward = run_df2t(&b, &a, &extended, zi.iter().map(|z| z * x0).collect());
    forward.reverse();
    let y0 = forward[0];
    let mut backward = run_df2t(&b, &a, &forward, zi.iter().map(|z| z * y0).collect());
    backward.reverse();
    trace!(
        "filtfilt: {} samples, {} taps, {} padding",
        signal.len(),
        b.len(),
        pad
    );
    Ok(backward[pad..pad + signal.len()].to_vec())
}
/// Single causal pass starting from rest.
pub fn lfilter(signal: &[f64], numerator: &[f64], denominator: &[f64]) -> Result<Vec<f64>> {
    let (b, a) = normalize(numerator, denominator)?;
    let state = vec![0.0; b.len() - 1];
    Ok(run_df2t(&b, &a, signal, state))
}
/// Initial delay-line state that makes a unit step pass through without transient.
pub fn lfilter_zi(numerator: &[f64], denominator: &[f64]) -> Result<Vec<f64>> {
    let (b, a) = normalize(numerator, denominator)?;
    Ok(steady_state(&b, &a))
}
fn normalize(numerator: &[f64], denominator: &[f64]) -> Result<(Vec<f64>, Vec<f64>)> {
    if numerator.is_empty() || denominator.is_empty() {
        return Err(BlinkError::config("filter coefficients must not be empty"));
    }
    if numerator
        .iter()
        .chain(denominator)
        .any(|c| !c.is_finite())
    {
        return Err(BlinkError::config("filter coefficients must be finite"));
    }
    let a0 = denominator[0];
    if a0 == 0.0 {
        return Err(BlinkError::config(
            "leading denominator coefficient must be non-zero",
        ));
    }
    let taps = numerator.len().max(denominator.len());
    let mut b: Vec<f64> = numerator.iter().map(|c| c / a0).collect();
    let mut a: Vec<f64> = denominator.iter().map(|c| c / a0).collect();
    b.resize(taps, 0.0);
    a.resize(taps, 0.0);
    Ok((b, a))
}
fn odd_extension(signal: &[f64], pad: usize) -> Vec<f64> {
    let len = signal.len();
    let first = signal[0];
    let last = signal[len - 1];
    let mut extended = Vec::with_capacity(len + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * first - signal[i]));
    extended.extend_from_slice(signal);
    extended.extend((1..=pad).map(|i| 2.0 * last - signal[len - 1 - i]));
    extended
}
// With G = sum(b) / sum(a) the settled state is z[k] = sum_{j>k} (b[j] - a[j] * G).
// Very low cutoffs leave sum(a) near 1e-13, so the sums are compensated.
fn steady_state(b: &[f64], a: &[f64]) -> Vec<f64> {
    let taps = b.len();
    if taps < 2 {
        return Vec::new();
    }
    let gain = compensated_sum(b.iter().copied()) / compensated_sum(a.iter().copied());
    (0..taps - 1)
        .map(|k| compensated_sum((k + 1..taps).map(|j| b[j] - a[j] * gain)))
        .collect()
}
fn compensated_sum(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sum = 0.0f64;
    let mut compensation = 0.0f64;
    for value in values {
        let t = sum + value;
        if sum.abs() >= value.abs() {
            compensation += (sum - t) + value;
        } else {
            compensation += (value - t) + sum;
        }
        sum = t;
    }
    sum + compensation
}
// Transposed direct form II; `b` and `a` are normalized and equally long.
fn run_df2t(b: &[f64], a: &[f64], input: &[f64], mut state: Vec<f64>) -> Vec<f64> {
    let taps = b.len();
    input
        .iter()
        .map(|&x| {
            let y = b[0] * x + state.first().copied().unwrap_or(0.0);
            for k in 0..taps.saturating_sub(2) {
                state[k] = b[k + 1] * x + state[k + 1] - a[k + 1] * y;
            }
            if taps > 1 {
                state[taps - 2] = b[taps - 1] * x - a[taps - 1] * y;
            }
            y
        })
        .collect()
}
