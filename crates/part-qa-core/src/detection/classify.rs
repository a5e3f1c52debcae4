//! Defect category selection.

use crate::domain::{AnomalyScores, DefectType};

/// Anomaly count from which the combined label replaces the single strongest one.
const MULTI_INDICATOR_MIN: usize = 3;

/// Picks the defect category for a failed part.
///
/// Returns `None` for qualified parts and when nothing fired. Ties on the top
/// score go to the kind declared first in [`crate::domain::AnomalyKind`].
#[must_use]
pub fn classify(scores: &AnomalyScores, qualified: bool) -> Option<DefectType> {
    if qualified {
        return None;
    }
    if scores.len() >= MULTI_INDICATOR_MIN {
        return Some(DefectType::MultiIndicator);
    }
    scores
        .strongest()
        .map(|(kind, _)| DefectType::for_kind(kind))
}
