//! Tensor-based scoring used as a strict cross-check of [`crate::evaluate`].
//!
//! Both masks are flattened into 1-D float tensors on a burn backend and the
//! counts are reduced with tensor ops. Unlike the manual path there is no
//! zero-default policy: every zero denominator is an error.

use std::collections::BTreeMap;

use burn::{
    config::Config,
    tensor::{backend::Backend, ElementConversion, Tensor},
};
use segmask_util::Mask;
use serde::Serialize;
use tracing::debug;

use crate::error::{MetricError, MetricResult};

#[derive(Config, Debug)]
pub struct LibraryEvaluationConfig {
    /// Weight of recall in the F-beta score.
    #[config(default = 1.0)]
    pub beta: f64,
}

/// Metrics report of [`evaluate_library`]. Every key is always present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LibraryStats {
    #[serde(rename = "Precision")]
    pub precision: f64,
    #[serde(rename = "Recall")]
    pub recall: f64,
    #[serde(rename = "Fbeta")]
    pub fbeta: f64,
    #[serde(rename = "F1")]
    pub f1: f64,
    pub accuracy: f64,
    pub cohen_kappa: f64,
}

impl LibraryStats {
    /// The report as a name-to-value map.
    pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("Precision", self.precision),
            ("Recall", self.recall),
            ("Fbeta", self.fbeta),
            ("F1", self.f1),
            ("accuracy", self.accuracy),
            ("cohen_kappa", self.cohen_kappa),
        ])
    }
}

/// Score `candidate` against `reference` on backend `B` with the default config.
pub fn evaluate_library<B: Backend>(
    candidate: &Mask,
    reference: &Mask,
    device: &B::Device,
) -> MetricResult<LibraryStats> {
    evaluate_library_with::<B>(candidate, reference, &LibraryEvaluationConfig::new(), device)
}

/// Score `candidate` against `reference` on backend `B`.
///
/// Precision, recall and F-beta are micro-averaged over the positive label.
/// Any zero denominator fails with [`MetricError::ZeroDivision`] naming the
/// metric.
pub fn evaluate_library_with<B: Backend>(
    candidate: &Mask,
    reference: &Mask,
    config: &LibraryEvaluationConfig,
    device: &B::Device,
) -> MetricResult<LibraryStats> {
    candidate.ensure_same_shape(reference)?;

    let y_pred = mask_to_tensor::<B>(candidate, device);
    let y_true = mask_to_tensor::<B>(reference, device);
    let total = candidate.pixel_count() as f64;

    let tp = (y_pred.clone() * y_true.clone())
        .sum()
        .into_scalar()
        .elem::<f64>();
    let predicted_positives = y_pred.sum().into_scalar().elem::<f64>();
    let actual_positives = y_true.sum().into_scalar().elem::<f64>();

    let fp = predicted_positives - tp;
    let fn_ = actual_positives - tp;
    let tn = total - tp - fp - fn_;

    let precision = divide(tp, tp + fp, "precision")?;
    let recall = divide(tp, tp + fn_, "recall")?;
    let beta2 = config.beta * config.beta;
    let fbeta = divide(
        (1.0 + beta2) * precision * recall,
        beta2 * precision + recall,
        "fbeta",
    )?;
    let f1 = divide(2.0 * precision * recall, precision + recall, "f1")?;
    let accuracy = divide(tp + tn, total, "accuracy")?;

    let observed = accuracy;
    let expected = (predicted_positives * actual_positives
        + (total - predicted_positives) * (total - actual_positives))
        / (total * total);
    let cohen_kappa = divide(observed - expected, 1.0 - expected, "cohen_kappa")?;

    debug!(tp, fp, fn_, tn, backend = %B::name(device), "evaluated mask on tensors");
    Ok(LibraryStats {
        precision,
        recall,
        fbeta,
        f1,
        accuracy,
        cohen_kappa,
    })
}

/// Flatten a mask into a row-major 0/1 float tensor.
pub fn mask_to_tensor<B: Backend>(mask: &Mask, device: &B::Device) -> Tensor<B, 1> {
    let values: Vec<f32> = mask.iter().map(|s| if s { 1.0 } else { 0.0 }).collect();
    Tensor::<B, 1>::from_floats(values.as_slice(), device)
}

fn divide(numerator: f64, denominator: f64, quantity: &'static str) -> MetricResult<f64> {
    if denominator == 0.0 {
        return Err(MetricError::ZeroDivision { quantity });
    }
    Ok(numerator / denominator)
}
