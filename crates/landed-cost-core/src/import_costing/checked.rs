//! Overflow-checked decimal arithmetic for the costing pipeline.
//!
//! `Decimal` operators panic once a result leaves the 96-bit range. Every
//! product, quotient and sum in the pipeline goes through these helpers so
//! an oversized shipment surfaces as [`LandedCostError::ArithmeticOverflow`].

use rust_decimal::Decimal;

use crate::error::LandedCostError;
use crate::LandedCostResult;

fn overflow(context: &str) -> LandedCostError {
    LandedCostError::ArithmeticOverflow {
        context: context.into(),
    }
}

pub(crate) fn mul(a: Decimal, b: Decimal, context: &str) -> LandedCostResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(context))
}

/// Callers rule out a zero divisor first; `None` here means overflow.
pub(crate) fn div(a: Decimal, b: Decimal, context: &str) -> LandedCostResult<Decimal> {
    a.checked_div(b).ok_or_else(|| overflow(context))
}

pub(crate) fn sum(terms: &[Decimal], context: &str) -> LandedCostResult<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |acc, term| {
        acc.checked_add(*term).ok_or_else(|| overflow(context))
    })
}
