//! Whole-cent apportionment.
//!
//! Dividing an amount of cents by weights almost never comes out even. The
//! functions here hand out the whole-cent floor of each share first, then
//! give the leftover cents one at a time to the shares that lost the most
//! to truncation (largest remainder), breaking ties by position. The result
//! always sums exactly to the amount being divided.

use crate::core::money::Money;

/// Split `total` into `parts` shares that differ by at most one cent.
///
/// The first `total % parts` shares receive the extra cent.
pub fn equal_shares(total: Money, parts: usize) -> Vec<Money> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let base = total.cents().div_euclid(n);
    let leftover = total.cents().rem_euclid(n) as usize;
    (0..parts)
        .map(|i| Money::from_cents(if i < leftover { base + 1 } else { base }))
        .collect()
}

/// Scale `weights` so that they sum exactly to `total`.
///
/// Each share is `weight * total / sum(weights)` truncated to a whole cent;
/// leftover cents go to the largest fractional remainders. Weights must be
/// non-negative and sum to a positive amount.
pub fn proportional_shares(total: Money, weights: &[Money]) -> Vec<Money> {
    let weight_sum: i128 = weights.iter().map(|w| w.cents() as i128).sum();
    if weight_sum <= 0 {
        return vec![Money::ZERO; weights.len()];
    }
    let total_cents = total.cents() as i128;

    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for (index, weight) in weights.iter().enumerate() {
        let scaled = weight.cents() as i128 * total_cents;
        shares.push(scaled.div_euclid(weight_sum));
        remainders.push((scaled.rem_euclid(weight_sum), index));
    }

    let assigned: i128 = shares.iter().sum();
    let leftover = (total_cents - assigned) as usize;
    // Largest remainder first, earliest position on ties.
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    for &(_, index) in remainders.iter().take(leftover) {
        shares[index] += 1;
    }

    shares
        .into_iter()
        .map(|cents| Money::from_cents(cents as i64))
        .collect()
}
