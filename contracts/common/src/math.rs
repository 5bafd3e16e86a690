//! Interest Math for dBank
//!
//! Fixed-point integer arithmetic only. Truncation (floor) is the rounding
//! policy: a fractional reward below one unit is forfeited, never carried.

use crate::constants::interest::{INTEREST_PER_SECOND, RATE_BASE};
use crate::errors::{DBankError, DBankResult};
use crate::types::{RewardUnits, Wei};

/// Reward accrued by `principal` held for `elapsed` seconds at the protocol rate
///
/// reward = floor(principal * INTEREST_PER_SECOND * elapsed / MIN_DEPOSIT)
///
/// # Arguments
/// * `principal` - Base-asset amount in wei
/// * `elapsed` - Seconds the deposit was held
///
/// # Returns
/// Reward units to mint
pub fn accrued_interest(principal: Wei, elapsed: u64) -> DBankResult<RewardUnits> {
    accrued_interest_at_rate(principal, elapsed, INTEREST_PER_SECOND, RATE_BASE)
}

/// Reward accrued at an explicit rate
///
/// `rate_per_second` reward units accrue each second for every `rate_base`
/// wei of principal. The result is the exact floor of
/// `principal * rate_per_second * elapsed / rate_base`.
///
/// The principal is split into whole multiples of `rate_base` and a
/// remainder, and the remainder's share is split again, so no intermediate
/// product exceeds the final reward by more than a factor of `elapsed`.
pub fn accrued_interest_at_rate(
    principal: Wei,
    elapsed: u64,
    rate_per_second: u128,
    rate_base: u128,
) -> DBankResult<RewardUnits> {
    if rate_base == 0 {
        return Err(DBankError::Overflow);
    }
    let elapsed = elapsed as u128;

    // principal = whole * rate_base + rest
    let whole = principal / rate_base;
    let rest = principal % rate_base;

    // rest * rate = carry * rate_base + tail
    let scaled_rest = rest.checked_mul(rate_per_second).ok_or(DBankError::Overflow)?;
    let carry = scaled_rest / rate_base;
    let tail = scaled_rest % rate_base;

    let from_whole = whole
        .checked_mul(rate_per_second)
        .and_then(|v| v.checked_mul(elapsed))
        .ok_or(DBankError::Overflow)?;
    let from_carry = carry.checked_mul(elapsed).ok_or(DBankError::Overflow)?;
    let from_tail = tail.checked_mul(elapsed).ok_or(DBankError::Overflow)? / rate_base;

    from_whole
        .checked_add(from_carry)
        .and_then(|v| v.checked_add(from_tail))
        .ok_or(DBankError::Overflow)
}

/// Seconds between `started_at` and `now`, failing if the clock went backwards
pub fn elapsed_since(started_at: u64, now: u64) -> DBankResult<u64> {
    now.checked_sub(started_at)
        .ok_or(DBankError::InvalidTimestamp {
            timestamp: now,
            earliest: started_at,
        })
}

/// Split an 18-decimal amount into whole and fractional parts for display
pub fn format_amount(amount: u128, one: u128) -> (u128, u128) {
    (amount / one, amount % one)
}
