use serde::{Deserialize, Serialize};
use crate::error::{BlinkError, Result};
/// Resting level of a channel and the half-width of the band accepted around it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSpec {
    pub base: f64,
    pub tolerance: f64,
}
impl ThresholdSpec {
    pub fn new(base: f64, tolerance: f64) -> Result<Self> {
        let spec = Self { base, tolerance };
        spec.validate()?;
        Ok(spec)
    }
    pub fn validate(&self) -> Result<()> {
        if !self.base.is_finite() {
            return Err(BlinkError::config(format!(
                "threshold base must be finite, got {}",
                self.base
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(BlinkError::config(format!(
                "threshold tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
    pub fn bounds(&self) -> Bounds {
        compute_bounds(self)
    }
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}
impl Bounds {
    /// Strictly above `upper` or strictly below `lower`; NaN is never outside.
    pub fn is_outside(&self, sample: f64) -> bool {
        sample > self.upper || sample < self.lower
    }
}
pub fn compute_bounds(spec: &ThresholdSpec) -> Bounds {
    Bounds {
        lower: spec.base - spec.tolerance,
        upper: spec.base + spec.tolerance,
    }
}
/// One flag per sample; `true` marks a sample outside its bounds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ArtifactMask(Vec<bool>);
impl ArtifactMask {
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
    pub fn count(&self) -> usize {
        self.0.iter().filter(|flag| **flag).count()
    }
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, flag)| flag.then_some(i))
    }
}
impl From<Vec<bool>> for ArtifactMask {
    fn from(flags: Vec<bool>) -> Self {
        Self(flags)
    }
}
pub fn detect(signal: &[f64], bounds: Bounds) -> ArtifactMask {
    ArtifactMask(signal.iter().map(|&s| bounds.is_outside(s)).collect())
}
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArtifactPoint {
    pub index: usize,
    pub time: f64,
    pub amplitude: f64,
}
/// Pairs every flagged sample with its timestamp, in time order.
pub fn select_artifacts(
    signal: &[f64],
    time_base: &[f64],
    mask: &ArtifactMask,
) -> Result<Vec<ArtifactPoint>> {
    for len in [time_base.len(), mask.len()] {
        if len != signal.len() {
            return Err(BlinkError::LengthMismatch {
                expected: signal.len(),
                actual: len,
            });
        }
    }
    Ok(mask
        .indices()
        .map(|index| ArtifactPoint {
            index,
            time: time_base[index],
            amplitude: signal[index],
        })
        .collect())
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bounds_straddle_base() {
        let bounds = ThresholdSpec::new(8500.0, 100.0).unwrap().bounds();
        assert_eq!(bounds.lower, 8400.0);
        assert_eq!(bounds.upper, 8600.0);
        let negative = compute_bounds(&ThresholdSpec::new(-8400.0, 100.0).unwrap());
        assert_eq!(negative.lower, -8500.0);
        assert_eq!(negative.upper, -8300.0);
    }
    #[test]
    fn tolerance_must_be_positive() {
        assert!(matches!(
            ThresholdSpec::new(8500.0, 0.0),
            Err(BlinkError::InvalidConfiguration(_))
        ));
        assert!(ThresholdSpec::new(8500.0, -5.0).is_err());
        assert!(ThresholdSpec::new(f64::NAN, 5.0).is_err());
        assert!(ThresholdSpec::new(8500.0, f64::INFINITY).is_err());
    }
    #[test]
    fn single_excursion_is_flagged() {
        let bounds = ThresholdSpec::new(8500.0, 100.0).unwrap().bounds();
        let mut signal = vec![8500.0; 10];
        signal[4] = 8700.0;
        let mask = detect(&signal, bounds);
        assert_eq!(mask.count(), 1);
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![4]);
        let time: Vec<f64> = (0..10).map(|i| i as f64 / 256.0).collect();
        let points = select_artifacts(&signal, &time, &mask).unwrap();
        assert_eq!(
            points,
            vec![ArtifactPoint {
                index: 4,
                time: 4.0 / 256.0,
                amplitude: 8700.0
            }]
        );
    }
    #[test]
    fn boundaries_are_exclusive() {
        let bounds = Bounds {
            lower: 8400.0,
            upper: 8600.0,
        };
        let eps = 1e-6;
        let mask = detect(
            &[8600.0, 8400.0, 8600.0 + eps, 8400.0 - eps, 8500.0],
            bounds,
        );
        assert_eq!(mask.as_slice(), &[false, false, true, true, false]);
    }
    #[test]
    fn nan_samples_are_not_flagged() {
        let bounds = Bounds {
            lower: -1.0,
            upper: 1.0,
        };
        let mask = detect(&[f64::NAN, 2.0, f64::INFINITY, f64::NEG_INFINITY], bounds);
        assert_eq!(mask.as_slice(), &[false, true, true, true]);
    }
    #[test]
    fn empty_signal_gives_empty_mask() {
        let mask = detect(&[], Bounds { lower: 0.0, upper: 1.0 });
        assert!(mask.is_empty());
        assert!(select_artifacts(&[], &[], &mask).unwrap().is_empty());
    }
    #[test]
    fn mismatched_time_base_is_rejected() {
        let mask = ArtifactMask::from(vec![true, false, true]);
        let err = select_artifacts(&[1.0, 2.0, 3.0], &[0.0, 1.0], &mask).unwrap_err();
        assert!(matches!(
            err,
            BlinkError::LengthMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert!(select_artifacts(&[1.0, 2.0], &[0.0, 1.0], &mask).is_err());
    }
}
