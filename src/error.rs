//! Error type shared by every fallible operation of the crate.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised while normalizing, comparing or laying out copy number
/// tables.
#[derive(Error, Debug)]
pub enum CnvError {
    /// Error reported by the underlying dataframe engine.
    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    /// A column named by the caller is absent from the input table.
    #[error("column \"{0}\" not found in input table")]
    MissingColumn(String),

    /// A CNV type label outside of the declared gain/loss labels.
    #[error(
        "CNV type \"{value}\" is neither the gain label \"{gain}\" nor the \
         loss label \"{loss}\""
    )]
    StrictMapping {
        value: String,
        gain:  String,
        loss:  String,
    },

    /// Region keys of two tables differ where identical regions are
    /// required.
    #[error(
        "the regions of copy number data are inconsistent between index \
         {left} and {right}"
    )]
    RegionMismatch { left: usize, right: usize },

    /// The point layout does not follow the expected coordinate scheme.
    #[error("layout integrity violated: {0}")]
    LayoutIntegrity(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation declared for a table kind but not defined yet.
    #[error("{0} is not implemented for this table kind")]
    Unimplemented(&'static str),
}

pub type Result<T> = std::result::Result<T, CnvError>;

impl CnvError {
    pub fn layout(message: impl Into<String>) -> Self {
        Self::LayoutIntegrity(message.into())
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}
