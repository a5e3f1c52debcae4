//! Mapping from the defect score to quality, verdict and confidence.

/// Quality score in `0..=100` for a defect score.
///
/// Three linear segments: `0..0.3` keeps clean parts within 85..100,
/// `0.3..0.6` spans 85..55 around the pass threshold, and beyond 0.6 the
/// score falls quickly to zero.
#[must_use]
pub fn quality_score(defect_score: f64) -> f64 {
    let s = defect_score;
    let q = if s < 0.3 {
        100.0 - s * 50.0
    } else if s < 0.6 {
        85.0 - (s - 0.3) * 100.0
    } else {
        (55.0 - (s - 0.6) * 137.5).max(0.0)
    };
    q.clamp(0.0, 100.0)
}

/// Whether an unrounded quality score passes `threshold`.
#[must_use]
pub fn is_qualified(quality: f64, threshold: f64) -> bool {
    quality >= threshold
}

/// Confidence in `0.1..=0.95` for a defect score.
///
/// The curve steps down from 0.95 to 0.85 at 0.2 and is continuous elsewhere.
#[must_use]
pub fn confidence(defect_score: f64) -> f64 {
    let s = defect_score;
    let c = if s < 0.2 {
        0.95
    } else if s < 0.5 {
        0.85 - (s - 0.2) * 0.5
    } else if s < 0.7 {
        0.7 - (s - 0.5) * 1.5
    } else {
        (0.4 - (s - 0.7)).max(0.1)
    };
    c.clamp(0.1, 0.95)
}

/// Rounds half away from zero to `places` decimals.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
