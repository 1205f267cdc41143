//! # cnvtools
//!
//! `cnvtools` normalizes, compares and plots genome copy number profiles.
//! Input tables come from arbitrary copy number callers and are brought
//! into one canonical, sorted and typed layout; two or more profiles can
//! then be compared region by region, and a window profile can be drawn
//! along a single genome-wide axis with detected CNV segments overlaid.
//!
//! Tables are [`polars`] frames. Every operation accepts either an eager
//! `DataFrame` or a `LazyFrame` and returns the same kind.
//!
//! ## Key Features
//!
//! * **Normalization**: chromosome labels with or without a `chr` prefix,
//!   arbitrary column names, canonical chromosome order `1..22, X, Y`
//!   ([`preprocess`]).
//! * **Comparison**: region consistency, accuracy, precision and recall on
//!   integer copy numbers, spread of differences, Pearson and Spearman
//!   correlation and the N-way mean ([`copy_number`]).
//! * **Manhattan plots**: genome-wide layout with position conversion, tick
//!   placement and baseline segments between CNV calls ([`plots`]).
//!
//! Number of threads used by polars can be configured with the
//! `CNVTOOLS_NUM_THREADS` environment variable.
//!
//! ## Usage
//!
//! ```no_run
//! use cnvtools::prelude::*;
//! use polars::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CopyNumberConfig::default()
//!         .with_chr_col("chrom".into())
//!         .with_copy_number_col("cn".into());
//!     let truth = df!(
//!         "chrom" => ["chr1", "chr1", "chr2"],
//!         "start" => [0i64, 1000, 0],
//!         "end" => [999i64, 1999, 999],
//!         "cn" => [2.0f64, 3.1, 1.9]
//!     )?;
//!     let called = df!(
//!         "chrom" => ["chr1", "chr1", "chr2"],
//!         "start" => [0i64, 1000, 0],
//!         "end" => [999i64, 1999, 999],
//!         "cn" => [2.1f64, 2.9, 2.0]
//!     )?;
//!
//!     let truth = CopyNumberWindow::try_new(truth, &config)?;
//!     let called = CopyNumberWindow::try_new(called, &config)?;
//!     println!("accuracy: {}", accuracy_score(&truth, &called)?);
//!
//!     let plot = called.manhattan_plot()?.add_cnv_line(&truth)?;
//!     std::fs::write("manhattan.html", plot.to_html())?;
//!     Ok(())
//! }
//! ```

#[ctor::ctor]
fn init() {
    if let Ok(n) = std::env::var("CNVTOOLS_NUM_THREADS") {
        std::env::set_var("POLARS_MAX_THREADS", n)
    }
}

pub mod copy_number;
pub mod data_structs;
pub mod error;
pub mod plots;
pub mod prelude;
pub mod preprocess;
pub mod utils;

pub use error::{
    CnvError,
    Result,
};
