//! Ratio and percentage helpers shared by synthesis and reporting.
//!
//! Every division in the crate goes through [`safe_ratio`] so that an empty
//! base resolves to a documented default instead of `NaN` or infinity.

use crate::model::Sentiment;

/// Sentiment score reported when there is no sentiment data at all.
pub const NEUTRAL_SENTIMENT_SCORE: u32 = 50;

/// Divide `numerator` by `denominator`, returning `default` when the
/// denominator is zero or the result is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        return default;
    }

    let ratio = numerator / denominator;
    if ratio.is_finite() { ratio } else { default }
}

/// Clamp a fraction into `[0, 1]`. `NaN` maps to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Fraction of `part` within `whole`, clamped to `[0, 1]`; 0 for an empty whole.
pub fn fraction(part: u64, whole: u64) -> f64 {
    clamp_unit(safe_ratio(part as f64, whole as f64, 0.0))
}

/// Signed percentage difference of `actual` against `average`.
///
/// Non-negative values carry an explicit `+`. A zero average yields `"0%"`.
///
/// ```
/// use event_metrycs::stats::percent_delta;
///
/// assert_eq!(percent_delta(120.0, 100.0), "+20.0%");
/// assert_eq!(percent_delta(75.0, 100.0), "-25.0%");
/// assert_eq!(percent_delta(10.0, 0.0), "0%");
/// ```
pub fn percent_delta(actual: f64, average: f64) -> String {
    if average == 0.0 {
        return "0%".to_string();
    }

    // Sign follows the displayed value, so tiny negatives print as "+0.0%".
    let diff = (safe_ratio(actual - average, average, 0.0) * 1000.0).round() / 10.0;
    if diff >= 0.0 {
        format!("+{:.1}%", diff.abs())
    } else {
        format!("{:.1}%", diff)
    }
}

/// Map sentiment counts onto a 0..=100 score where 50 is neutral.
pub fn sentiment_score(sentiment: &Sentiment) -> u32 {
    let total = sentiment.total();
    if total == 0 {
        return NEUTRAL_SENTIMENT_SCORE;
    }

    let balance = sentiment.positive as f64 - sentiment.negative as f64;
    let score = safe_ratio(balance, total as f64, 0.0) * 50.0 + 50.0;
    score.clamp(0.0, 100.0).round() as u32
}
