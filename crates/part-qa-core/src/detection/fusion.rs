//! Fusion of the individual anomaly scores into one defect score.

use crate::domain::AnomalyScores;

/// Weight of the strongest score in the base blend.
const MAX_WEIGHT: f64 = 0.4;
/// Weight of the mean score in the base blend.
const MEAN_WEIGHT: f64 = 0.6;
/// Scale applied to the blend before escalation.
const BASE_SCALE: f64 = 0.55;
/// Extra factor per co-occurring anomaly beyond the second.
const ESCALATION_STEP: f64 = 0.12;
/// Factor for exactly two co-occurring anomalies.
const PAIR_ESCALATION: f64 = 1.08;

/// Combines anomaly scores into a defect score in `0..=1`.
///
/// Several simultaneous anomalies weigh more than one isolated anomaly of the
/// same strength. `penalty` (the brightness penalty) is added last.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn fuse(scores: &AnomalyScores, penalty: f64) -> f64 {
    let fused = if scores.is_empty() {
        0.0
    } else {
        let base = (scores.max() * MAX_WEIGHT + scores.mean() * MEAN_WEIGHT) * BASE_SCALE;
        match scores.len() {
            1 => base,
            2 => (base * PAIR_ESCALATION).min(1.0),
            n => (base * (1.0 + (n - 2) as f64 * ESCALATION_STEP)).min(1.0),
        }
    };
    (fused + penalty).clamp(0.0, 1.0)
}
