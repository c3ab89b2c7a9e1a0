//! Confusion-matrix counts between a candidate mask and its reference.

use segmask_util::Mask;
use serde::Serialize;

use crate::error::MetricResult;

/// Pixel tallies of a candidate mask against a reference mask.
///
/// `true_positives + false_negatives == positives` and
/// `false_positives + true_negatives == negatives` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ConfusionCounts {
    pub true_positives: u64,
    pub false_positives: u64,
    pub false_negatives: u64,
    pub true_negatives: u64,
    /// Selected pixels in the reference.
    pub positives: u64,
    /// Unselected pixels in the reference.
    pub negatives: u64,
}

impl ConfusionCounts {
    /// Tally two same-shape masks pixel by pixel.
    pub fn from_masks(candidate: &Mask, reference: &Mask) -> MetricResult<Self> {
        candidate.ensure_same_shape(reference)?;

        let mut counts = Self::default();
        for (predicted, actual) in candidate.iter().zip(reference.iter()) {
            match (predicted, actual) {
                (true, true) => counts.true_positives += 1,
                (true, false) => counts.false_positives += 1,
                (false, true) => counts.false_negatives += 1,
                (false, false) => counts.true_negatives += 1,
            }
        }
        counts.positives = counts.true_positives + counts.false_negatives;
        counts.negatives = counts.false_positives + counts.true_negatives;
        Ok(counts)
    }

    /// Total number of pixels.
    pub const fn total(&self) -> u64 {
        self.positives + self.negatives
    }

    /// Selected pixels in the candidate.
    pub const fn predicted_positives(&self) -> u64 {
        self.true_positives + self.false_positives
    }

    /// Cohen's kappa between the candidate and reference labelings.
    ///
    /// `None` when the expected chance agreement is 1, which only happens when
    /// both masks are constant and equal.
    pub fn cohen_kappa(&self) -> Option<f64> {
        let total = self.total() as f64;
        if total == 0.0 {
            return None;
        }

        let observed = (self.true_positives + self.true_negatives) as f64 / total;
        let predicted_positive = self.predicted_positives() as f64;
        let predicted_negative = total - predicted_positive;
        let expected = (predicted_positive * self.positives as f64
            + predicted_negative * self.negatives as f64)
            / (total * total);

        let denominator = 1.0 - expected;
        (denominator != 0.0).then(|| (observed - expected) / denominator)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rstest::*;
    use segmask_util::MaskError;

    use super::*;
    use crate::error::MetricError;

    fn row(bits: &str) -> Mask {
        let flags: Vec<bool> = bits.chars().map(|c| c == '1').collect();
        Mask::from_bools(flags.len() as u32, 1, &flags).unwrap()
    }

    #[test]
    fn counts_each_quadrant() {
        let counts = ConfusionCounts::from_masks(&row("1110010000"), &row("1111100000")).unwrap();

        assert_eq!(
            counts,
            ConfusionCounts {
                true_positives: 3,
                false_positives: 1,
                false_negatives: 2,
                true_negatives: 4,
                positives: 5,
                negatives: 5,
            }
        );
        assert_eq!(counts.total(), 10);
        assert_eq!(counts.predicted_positives(), 4);
    }

    #[rstest]
    #[case(Mask::from_fn(9, 7, |x, y| (x + y) % 3 == 0), Mask::from_fn(9, 7, |x, _| x < 4))]
    #[case(Mask::new(12, 3), Mask::from_fn(12, 3, |x, y| x == y))]
    #[case(Mask::from_fn(5, 5, |_, _| true), Mask::from_fn(5, 5, |x, _| x == 0))]
    #[case(Mask::from_fn(16, 16, |x, y| x * y > 40), Mask::from_fn(16, 16, |x, y| x + y > 14))]
    fn counts_partition_reference_classes(#[case] candidate: Mask, #[case] reference: Mask) {
        let counts = ConfusionCounts::from_masks(&candidate, &reference).unwrap();

        assert_eq!(counts.true_positives + counts.false_negatives, reference.count());
        assert_eq!(
            counts.false_positives + counts.true_negatives,
            reference.pixel_count() as u64 - reference.count()
        );
        assert_eq!(counts.predicted_positives(), candidate.count());
    }

    #[test]
    fn kappa_matches_hand_computation() {
        // observed 0.7, chance 0.5
        let counts = ConfusionCounts::from_masks(&row("1110010000"), &row("1111100000")).unwrap();
        assert_relative_eq!(counts.cohen_kappa().unwrap(), 0.4, epsilon = 1e-12);
    }

    #[test]
    fn kappa_of_identical_masks_is_one() {
        let mask = row("0110100111");
        let counts = ConfusionCounts::from_masks(&mask, &mask).unwrap();
        assert_relative_eq!(counts.cohen_kappa().unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn kappa_of_inverted_masks_is_negative() {
        let mask = row("1100");
        let counts = ConfusionCounts::from_masks(&mask.invert(), &mask).unwrap();
        assert_relative_eq!(counts.cohen_kappa().unwrap(), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn kappa_of_constant_equal_masks_is_undefined() {
        let mask = row("1111");
        let counts = ConfusionCounts::from_masks(&mask, &mask).unwrap();
        assert_eq!(counts.cohen_kappa(), None);
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let err = ConfusionCounts::from_masks(&Mask::new(3, 3), &Mask::new(3, 4)).unwrap_err();
        assert!(matches!(
            err,
            MetricError::Mask(MaskError::ShapeMismatch { .. })
        ));
    }
}
