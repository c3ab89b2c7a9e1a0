//! Manual confusion-matrix scoring with explicit zero guards.

use std::collections::BTreeMap;

use segmask_util::Mask;
use serde::Serialize;
use tracing::debug;

use crate::{
    confusion::ConfusionCounts,
    error::{MaskClass, MetricError, MetricResult},
};

/// Metrics report of [`evaluate`].
///
/// Rates are normalized by the reference class sizes. `f1`, `accuracy` and
/// `cohen_kappa` are only reported when precision and recall are not both zero;
/// absent values are absent keys in [`MaskStats::to_map`] and in the serialized
/// form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaskStats {
    /// False negatives over reference positives.
    #[serde(rename = "FN")]
    pub fn_rate: f64,
    /// True positives over reference positives.
    #[serde(rename = "TP")]
    pub tp_rate: f64,
    /// False positives over reference negatives.
    #[serde(rename = "FP")]
    pub fp_rate: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "F1", skip_serializing_if = "Option::is_none")]
    pub f1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cohen_kappa: Option<f64>,
    #[serde(skip)]
    pub counts: ConfusionCounts,
}

impl MaskStats {
    /// The report as a name-to-value map.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        let mut map = BTreeMap::from([
            ("FN", self.fn_rate),
            ("TP", self.tp_rate),
            ("FP", self.fp_rate),
            ("Recall", self.recall),
            ("Precision", self.precision),
        ]);
        let optional = [
            ("F1", self.f1),
            ("accuracy", self.accuracy),
            ("cohen_kappa", self.cohen_kappa),
        ];
        map.extend(optional.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))));
        map
    }
}

/// Score `candidate` against `reference`.
///
/// The reference must contain both selected and unselected pixels, otherwise
/// [`MetricError::DegenerateReference`] names the missing class. Recall and
/// precision default to 0 when their denominators are zero.
pub fn evaluate(candidate: &Mask, reference: &Mask) -> MetricResult<MaskStats> {
    let counts = ConfusionCounts::from_masks(candidate, reference)?;
    if counts.positives == 0 {
        return Err(MetricError::DegenerateReference {
            missing: MaskClass::Positive,
        });
    }
    if counts.negatives == 0 {
        return Err(MetricError::DegenerateReference {
            missing: MaskClass::Negative,
        });
    }

    let tp = counts.true_positives as f64;
    let fp = counts.false_positives as f64;
    let fn_ = counts.false_negatives as f64;
    let tn = counts.true_negatives as f64;
    let positives = counts.positives as f64;
    let negatives = counts.negatives as f64;

    let recall = if tp + fn_ > 0.0 { tp / (tp + fn_) } else { 0.0 };
    let precision = if tp + fp > 0.0 { tp / (tp + fp) } else { 0.0 };

    let mut stats = MaskStats {
        fn_rate: fn_ / positives,
        tp_rate: tp / positives,
        fp_rate: fp / negatives,
        recall,
        precision,
        f1: None,
        accuracy: None,
        cohen_kappa: None,
        counts,
    };

    if precision != 0.0 || recall != 0.0 {
        stats.f1 = Some(2.0 * precision * recall / (precision + recall));
        stats.accuracy = Some((tp + tn) / (positives + negatives));
        stats.cohen_kappa = counts.cohen_kappa();
    }

    debug!(?counts, recall, precision, f1 = ?stats.f1, "evaluated mask");
    Ok(stats)
}
