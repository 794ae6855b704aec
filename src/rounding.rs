//! Integer rounding rules shared by the bank and the harvest bonus roll.
//!
//! All money and XP stay integral. Fractional results are floored here and
//! nowhere else.

use rand::Rng;

pub const BPS_PER_UNIT: u64 = 10_000;

/// `floor(amount * bps / 10_000)`, exact for every `u64` input.
pub fn apply_rate_bps(amount: u64, bps: u64) -> u64 {
    let scaled = amount as u128 * bps as u128 / BPS_PER_UNIT as u128;
    scaled.min(u64::MAX as u128) as u64
}

/// A level-scaled chance in whole percent, capped.
pub fn percent_chance(level: u32, cap_percent: u32) -> u32 {
    level.min(cap_percent).min(100)
}

/// True with probability `percent / 100`.
pub fn roll_percent<R: Rng + ?Sized>(rng: &mut R, percent: u32) -> bool {
    if percent == 0 {
        return false;
    }
    rng.gen_range(0..100) < percent
}
