use crate::betslip::Selection;

/// Rounds half away from zero to two decimal places.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Accumulator price: product of every selection's decimal odds.
///
/// `0.0` for an empty slice, which the receipt treats as "not applicable".
pub fn calculate_total_odds(selections: &[Selection]) -> f64 {
    if selections.is_empty() {
        return 0.0;
    }
    round2(selections.iter().map(|s| s.odds).product())
}

/// Stake times odds. Negative stakes are passed through untouched.
pub fn calculate_returns(stake: f64, total_odds: f64) -> f64 {
    round2(stake * total_odds)
}
