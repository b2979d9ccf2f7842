use crate::error::{Op20Error, Op20Result};
use crate::Amount;

pub fn overflow_error<T>(v: Option<T>) -> Op20Result<T> {
    v.ok_or(Op20Error::ArithmeticOverflow)
}

/// `raw × 10^decimals`, failing instead of wrapping.
pub fn scale_by_decimals(raw: Amount, decimals: u8) -> Op20Result<Amount> {
    let factor = overflow_error(Amount::from(10u64).checked_pow(Amount::from(decimals)))?;
    overflow_error(raw.checked_mul(factor))
}
