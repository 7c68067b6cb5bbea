// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Checked `Decimal` arithmetic. Every aggregate in the crate goes through
//! here so that values near the 96-bit limit surface as
//! [`NesteggError::InvalidAmount`] instead of a panic.

use crate::error::{NesteggError, Result};
use rust_decimal::Decimal;

fn overflow(op: &str, a: Decimal, b: Decimal) -> NesteggError {
    NesteggError::InvalidAmount(format!("{a} {op} {b} is out of range"))
}

pub fn add(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow("+", a, b))
}

pub fn sub(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow("-", a, b))
}

pub fn mul(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow("*", a, b))
}

/// Division; a zero divisor is reported the same way as an overflow.
pub fn div(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_div(b).ok_or_else(|| overflow("/", a, b))
}

pub fn sum<I>(values: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sums_until_the_limit() {
        let big = Decimal::MAX;
        assert_eq!(sum([Decimal::ONE, Decimal::TWO]).unwrap(), Decimal::from(3));
        assert!(matches!(add(big, Decimal::ONE), Err(NesteggError::InvalidAmount(_))));
        assert!(sub(Decimal::MIN, Decimal::ONE).is_err());
        assert!(mul(big, Decimal::TWO).is_err());
        assert!(div(Decimal::ONE, Decimal::ZERO).is_err());
    }
}
