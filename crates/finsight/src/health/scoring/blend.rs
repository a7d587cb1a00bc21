/// Weight of the rule-based score in the blend.
pub const RULE_WEIGHT: f64 = 0.6;
/// Weight of the model's survival probability in the blend.
pub const MODEL_WEIGHT: f64 = 0.4;

/// `hand_score * 0.6 + (1 - distress) * 100 * 0.4`, truncated toward zero and
/// clamped to `0..=100`. Out-of-range or NaN probabilities are absorbed by the
/// clamp rather than reported.
pub fn blend_score(hand_score: u8, distress_prob: f64) -> u8 {
    let combined =
        f64::from(hand_score) * RULE_WEIGHT + (1.0 - distress_prob) * 100.0 * MODEL_WEIGHT;

    // `as` saturates and maps NaN to zero.
    (combined.trunc() as i64).clamp(0, 100) as u8
}
