// 💰 Balance Calculator - signed sum of every entry
//
// Exact decimal arithmetic. Rounding happens only in format_balance.
// Sums past Decimal's range saturate instead of panicking.

use crate::entry::Entry;
use rust_decimal::{Decimal, RoundingStrategy};

/// Exact sum, or None if it leaves Decimal's range
pub fn checked_compute<'a, I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = &'a Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| total.checked_add(*amount))
}

/// Sum of all amounts, zero for an empty ledger. Saturates at
/// Decimal::MAX / Decimal::MIN.
pub fn compute(entries: &[Entry]) -> Decimal {
    let mut total = Decimal::ZERO;
    for entry in entries {
        total = match total.checked_add(entry.amount) {
            Some(sum) => sum,
            None => {
                log::warn!("Balance overflowed at entry {}, saturating", entry.id);
                if entry.amount.is_sign_negative() {
                    Decimal::MIN
                } else {
                    Decimal::MAX
                }
            }
        };
    }
    total
}

/// Two fraction digits, half away from zero
pub fn format_balance(total: Decimal) -> String {
    let mut rounded = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    // Pad by hand: rescale cannot widen a 29-digit integer part
    match rounded.scale() {
        0 => format!("{}.00", rounded),
        1 => format!("{}0", rounded),
        _ => rounded.to_string(),
    }
}
