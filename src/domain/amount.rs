//! Conversions between satoshis and the library's millisatoshi unit.

/// Millisatoshis per satoshi.
pub const MSAT_PER_SAT: u64 = 1000;

/// Convert millisatoshis to whole satoshis, truncating any remainder.
#[must_use]
pub const fn msat_to_sat(msat: u64) -> u64 {
    msat / MSAT_PER_SAT
}

/// Convert satoshis to millisatoshis, `None` on overflow.
#[must_use]
pub const fn sat_to_msat(sat: u64) -> Option<u64> {
    sat.checked_mul(MSAT_PER_SAT)
}
