//! Core data structures shared by the preprocessing, comparison and plotting
//! modules.
//!
//! - [`chromosome`]: the canonical chromosome order (`1..22, X, Y`) and its
//!   rank lookup.
//! - [`CnColumns`]: canonical column names and data types of normalized
//!   tables.
//! - [`PolarsFrame`]: abstraction over eager ([`polars::prelude::DataFrame`])
//!   and lazy ([`polars::prelude::LazyFrame`]) tables, so that every
//!   transformation returns the kind of table it was given.

pub mod chromosome;
mod columns;
mod frame;

pub use chromosome::{
    chromosome_name,
    chromosome_rank,
    is_canonical,
    CHROMOSOME_NAMES,
};
pub use columns::CnColumns;
pub use frame::PolarsFrame;
