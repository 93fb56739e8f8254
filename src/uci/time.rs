//! Time-budget derivation for clock-driven games.

/// Lower bound on a move budget, in milliseconds
const MIN_BUDGET_MS: u64 = 30;

/// Upper bound on a move budget, in milliseconds
const MAX_BUDGET_MS: u64 = 1200;

/// Fraction of the remaining clock to spend on one move
const REMAINING_DIVISOR: u64 = 28;

/// Derive a per-move time budget from the remaining clock and increment.
///
/// Spends roughly 1/28th of the remaining time plus half the increment,
/// clamped so the engine neither blitzes out instant moves with a full
/// clock nor thinks itself into time trouble.
#[must_use]
pub fn budget_from_clock(remaining_ms: u64, increment_ms: u64) -> u64 {
    (remaining_ms / REMAINING_DIVISOR + increment_ms / 2).clamp(MIN_BUDGET_MS, MAX_BUDGET_MS)
}
