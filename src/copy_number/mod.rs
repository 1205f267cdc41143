//! Copy number tables and their cross-sample comparison.
//!
//! [`CopyNumber`] is the capability set shared by every copy number kind:
//! region consistency, classification metrics on integer copy numbers,
//! spread of the differences, correlation and the N-way mean. Each kind
//! only declares which columns identify a region:
//!
//! - [`CopyNumberWindow`]: genome windows, keyed by `chr`, `start`, `end`
//! - [`CopyNumberChromosome`]: whole chromosomes, keyed by `chr`
//!
//! [`Cnv`] holds called copy number variations (gain / loss segments).
//!
//! The free functions of this module ([`region_consistency_check`],
//! [`accuracy_score`], ...) dispatch to the trait and accept any kind.

mod chromosome;
mod cnv;
mod window;

use std::fmt;
use std::str::FromStr;

pub use chromosome::CopyNumberChromosome;
pub use cnv::Cnv;
use itertools::Itertools;
use log::debug;
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};
pub use window::CopyNumberWindow;

use crate::data_structs::{
    CnColumns,
    PolarsFrame,
};
use crate::error::{
    CnvError,
    Result,
};
use crate::utils::{
    integer_copy_number,
    stats,
    Average,
    Score,
};

const TRUE_COL: &str = "__cnvtools_true";
const PRED_COL: &str = "__cnvtools_pred";

/// Correlation coefficient flavour.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
}

impl FromStr for CorrelationMethod {
    type Err = CnvError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            "spearman" => Ok(CorrelationMethod::Spearman),
            other => {
                Err(CnvError::invalid_argument(format!(
                    "unknown correlation method \"{other}\""
                )))
            },
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            CorrelationMethod::Pearson => write!(f, "pearson"),
            CorrelationMethod::Spearman => write!(f, "spearman"),
        }
    }
}

/// Region-key columns of `data`, materialized.
pub(crate) fn region_frame<F: PolarsFrame>(
    data: &F,
    region_cols: &[&str],
) -> Result<DataFrame> {
    Ok(data
        .clone()
        .into_lazy()
        .select(region_cols.iter().map(|name| col(*name)).collect_vec())
        .collect()?)
}

/// Inner join of two tables on `region_cols`, keeping `value` of both sides
/// as [`TRUE_COL`] and [`PRED_COL`].
fn join_values<F: PolarsFrame>(
    data_true: &F,
    data_pred: &F,
    region_cols: &[&str],
    value: CnColumns,
) -> Result<DataFrame> {
    let keys = region_cols.iter().map(|name| col(*name)).collect_vec();
    let select_side = |data: &F, alias: &str| {
        data.clone().into_lazy().select(
            keys.iter()
                .cloned()
                .chain([value.col().alias(alias)])
                .collect_vec(),
        )
    };
    let joined = select_side(data_true, TRUE_COL)
        .join(
            select_side(data_pred, PRED_COL),
            keys.clone(),
            keys.clone(),
            JoinArgs::new(JoinType::Inner),
        )
        .select([col(TRUE_COL), col(PRED_COL)])
        .collect()?;
    debug!("Joined {} matching regions on {:?}", joined.height(), region_cols);
    Ok(joined)
}

/// Aligned integer copy numbers; pairs with a missing side are dropped.
fn aligned_integer_copy_numbers<F: PolarsFrame>(
    data_true: &F,
    data_pred: &F,
    region_cols: &[&str],
) -> Result<(Vec<i32>, Vec<i32>)> {
    let joined = join_values(
        data_true,
        data_pred,
        region_cols,
        CnColumns::IntegerCopyNumber,
    )?;
    let t = joined.column(TRUE_COL)?.i32()?;
    let p = joined.column(PRED_COL)?.i32()?;
    Ok(t.into_iter()
        .zip(p.into_iter())
        .filter_map(|(t, p)| Some((t?, p?)))
        .unzip())
}

/// `copy_number` values of a table in row order. Missing values become
/// `NaN`.
fn copy_number_values<F: PolarsFrame>(data: &F) -> Result<Vec<f64>> {
    let df = data
        .clone()
        .into_lazy()
        .select([CnColumns::CopyNumber.col().cast(DataType::Float64)])
        .collect()?;
    Ok(df
        .column(CnColumns::CopyNumber.as_str())?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Capability set of copy number data kinds.
///
/// Implementors hold a normalized table (see [`crate::preprocess`]) and
/// name the columns that identify a region. All comparison operations are
/// provided on top of that.
pub trait CopyNumber: Sized {
    type Frame: PolarsFrame;

    /// Columns identifying a comparable region.
    const REGION_COLS: &'static [&'static str];

    /// The normalized table.
    fn data(&self) -> &Self::Frame;

    /// Wraps a table that is already in the normalized form of this kind.
    fn from_normalized(data: Self::Frame) -> Self;

    /// Returns `true` when the region keys of both tables are equal row for
    /// row: same values, same order, same number of rows.
    fn region_consistency_check(
        copy_number_x: &Self,
        copy_number_y: &Self,
    ) -> Result<bool> {
        let x = region_frame(copy_number_x.data(), Self::REGION_COLS)?;
        let y = region_frame(copy_number_y.data(), Self::REGION_COLS)?;
        Ok(x.equals_missing(&y))
    }

    /// Accuracy of the integer copy numbers over the regions present in
    /// both tables.
    fn accuracy_score(
        copy_number_true: &Self,
        copy_number_pred: &Self,
    ) -> Result<f64> {
        let (t, p) = aligned_integer_copy_numbers(
            copy_number_true.data(),
            copy_number_pred.data(),
            Self::REGION_COLS,
        )?;
        stats::accuracy(&t, &p)
    }

    /// Recall of the integer copy numbers over the regions present in both
    /// tables. `None` returns the per-class recall.
    fn recall_score(
        copy_number_true: &Self,
        copy_number_pred: &Self,
        average: Option<Average>,
    ) -> Result<Score> {
        let (t, p) = aligned_integer_copy_numbers(
            copy_number_true.data(),
            copy_number_pred.data(),
            Self::REGION_COLS,
        )?;
        stats::recall(&t, &p, average)
    }

    /// Precision of the integer copy numbers over the regions present in
    /// both tables. `None` returns the per-class precision.
    fn precision_score(
        copy_number_true: &Self,
        copy_number_pred: &Self,
        average: Option<Average>,
    ) -> Result<Score> {
        let (t, p) = aligned_integer_copy_numbers(
            copy_number_true.data(),
            copy_number_pred.data(),
            Self::REGION_COLS,
        )?;
        stats::precision(&t, &p, average)
    }

    /// Sample standard deviation of `pred - true` copy numbers over the
    /// regions present in both tables. `NaN` for fewer than two regions.
    fn difference_std(
        copy_number_true: &Self,
        copy_number_pred: &Self,
    ) -> Result<f64> {
        let joined = join_values(
            copy_number_true.data(),
            copy_number_pred.data(),
            Self::REGION_COLS,
            CnColumns::CopyNumber,
        )?;
        let t = joined.column(TRUE_COL)?.f32()?;
        let p = joined.column(PRED_COL)?.f32()?;
        let differences = t
            .into_iter()
            .zip(p.into_iter())
            .filter_map(|(t, p)| Some(p? as f64 - t? as f64))
            .collect_vec();
        Ok(stats::sample_std(&differences))
    }

    /// Correlation between the copy numbers of two tables with identical
    /// regions. Missing copy numbers are read as `NaN`, and any `NaN` copy
    /// number makes the result `NaN`.
    fn correlation_coefficient(
        copy_number_x: &Self,
        copy_number_y: &Self,
        method: CorrelationMethod,
    ) -> Result<f64> {
        if !Self::region_consistency_check(copy_number_x, copy_number_y)? {
            return Err(CnvError::RegionMismatch { left: 0, right: 1 });
        }
        let x = copy_number_values(copy_number_x.data())?;
        let y = copy_number_values(copy_number_y.data())?;
        Ok(match method {
            CorrelationMethod::Pearson => stats::pearson_r(&x, &y),
            CorrelationMethod::Spearman => stats::spearman_r(&x, &y),
        })
    }

    /// Element-wise mean copy number of several tables with identical
    /// regions.
    ///
    /// Consecutive tables are checked with
    /// [`CopyNumber::region_consistency_check`]; the first mismatch is
    /// reported with its index pair. The first table provides the regions
    /// and any extra columns of the result, `integer_copy_number` is
    /// re-derived from the mean.
    fn mean(copy_numbers: &[Self]) -> Result<Self> {
        let first = copy_numbers.first().ok_or_else(|| {
            CnvError::invalid_argument("mean of zero copy number tables")
        })?;
        for (idx, pair) in copy_numbers.windows(2).enumerate() {
            if !Self::region_consistency_check(&pair[0], &pair[1])? {
                return Err(CnvError::RegionMismatch {
                    left:  idx,
                    right: idx + 1,
                });
            }
        }

        let n = copy_numbers.len() as f64;
        let mut mean = copy_number_values(first.data())?
            .into_iter()
            .map(|v| v / n)
            .collect_vec();
        for other in &copy_numbers[1..] {
            let values = copy_number_values(other.data())?;
            mean.iter_mut()
                .zip(values)
                .for_each(|(acc, v)| *acc += v / n);
        }
        debug!(
            "Averaged {} copy number tables over {} regions",
            copy_numbers.len(),
            mean.len()
        );

        let copy_number = mean
            .iter()
            .map(|v| if v.is_nan() { None } else { Some(*v as f32) })
            .collect::<Vec<Option<f32>>>();
        let integer = mean
            .iter()
            .map(|v| integer_copy_number(*v))
            .collect::<Vec<Option<i32>>>();

        let mut df = first.data().collect_df()?;
        df.with_column(Series::new(
            CnColumns::CopyNumber.as_str().into(),
            copy_number,
        ))?;
        df.with_column(Series::new(
            CnColumns::IntegerCopyNumber.as_str().into(),
            integer,
        ))?;
        Ok(Self::from_normalized(Self::Frame::from_lazy(df.lazy())?))
    }
}

/// See [`CopyNumber::region_consistency_check`].
pub fn region_consistency_check<C: CopyNumber>(
    copy_number_x: &C,
    copy_number_y: &C,
) -> Result<bool> {
    C::region_consistency_check(copy_number_x, copy_number_y)
}

/// See [`CopyNumber::accuracy_score`].
pub fn accuracy_score<C: CopyNumber>(
    copy_number_true: &C,
    copy_number_pred: &C,
) -> Result<f64> {
    C::accuracy_score(copy_number_true, copy_number_pred)
}

/// See [`CopyNumber::recall_score`].
pub fn recall_score<C: CopyNumber>(
    copy_number_true: &C,
    copy_number_pred: &C,
    average: Option<Average>,
) -> Result<Score> {
    C::recall_score(copy_number_true, copy_number_pred, average)
}

/// See [`CopyNumber::precision_score`].
pub fn precision_score<C: CopyNumber>(
    copy_number_true: &C,
    copy_number_pred: &C,
    average: Option<Average>,
) -> Result<Score> {
    C::precision_score(copy_number_true, copy_number_pred, average)
}

/// See [`CopyNumber::difference_std`].
pub fn difference_std<C: CopyNumber>(
    copy_number_true: &C,
    copy_number_pred: &C,
) -> Result<f64> {
    C::difference_std(copy_number_true, copy_number_pred)
}

/// See [`CopyNumber::correlation_coefficient`].
pub fn correlation_coefficient<C: CopyNumber>(
    copy_number_x: &C,
    copy_number_y: &C,
    method: CorrelationMethod,
) -> Result<f64> {
    C::correlation_coefficient(copy_number_x, copy_number_y, method)
}

/// See [`CopyNumber::mean`].
pub fn mean<C: CopyNumber>(copy_numbers: &[C]) -> Result<C> {
    C::mean(copy_numbers)
}
