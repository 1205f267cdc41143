//! Utility functions and helper macros used throughout the crate.
//!
//! - Statistical routines ([`stats`]): classification metrics, correlation
//!   coefficients, sample standard deviation and quantiles.
//! - Rounding helpers that follow the round-half-to-even rule both on plain
//!   floats and as Polars expressions.
//! - Macros for builder-style `with_*` setters and getters.

use polars::prelude::*;

pub mod stats;

pub use stats::*;

/// Rounds a copy number to the nearest integer, ties to even.
/// `NaN` and values outside of `i32` have no integer copy number.
pub fn integer_copy_number(value: f64) -> Option<i32> {
    let rounded = value.round_ties_even();
    if rounded.is_finite()
        && rounded >= i32::MIN as f64
        && rounded <= i32::MAX as f64
    {
        Some(rounded as i32)
    }
    else {
        None
    }
}

/// Expression rounding `expr` to the nearest integer with ties to even.
///
/// `Expr::round` rounds halves away from zero, so exact halves are
/// resolved separately as `2 * round(x / 2)`.
pub fn round_half_even_expr(expr: Expr) -> Expr {
    let value = expr.cast(DataType::Float64);
    let is_half = (value.clone() - value.clone().floor()).eq(lit(0.5f64));
    when(is_half)
        .then((value.clone() / lit(2.0f64)).round(0) * lit(2.0f64))
        .otherwise(value.round(0))
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
