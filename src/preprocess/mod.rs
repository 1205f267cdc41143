//! Normalization of arbitrary chromosome / position / copy number tables
//! into the canonical schema used by the rest of the crate.
//!
//! Normalized copy number tables have the columns
//!
//! - `chr`: [`DataType::String`], one of `"1".."22"`, `"X"`, `"Y"`
//! - `start`, `end`: [`DataType::Int64`] (window-level data only)
//! - `copy_number`: [`DataType::Float32`]
//! - `integer_copy_number`: [`DataType::Int32`], `copy_number` rounded
//!   half to even
//!
//! followed by any other input column, unmodified. Rows are sorted by
//! chromosome rank, then by `start`; rows on other chromosomes are removed.
//! CNV tables carry `cnv_type` ([`CnColumns::CnvType`]) instead of the copy
//! number columns.

mod config;

pub use config::{
    CnvConfig,
    CopyNumberConfig,
};
use itertools::Itertools;
use log::{
    debug,
    warn,
};
use polars::prelude::*;

use crate::data_structs::chromosome::join_chromosome_rank;
use crate::data_structs::{
    is_canonical,
    CnColumns,
    PolarsFrame,
};
use crate::error::{
    CnvError,
    Result,
};
use crate::utils::round_half_even_expr;

const RANK_COL: &str = "__cnvtools_chr_rank";
const ROW_INDEX_COL: &str = "__cnvtools_row_index";

/// Chromosome label prefixes that are stripped when every label carries
/// them.
pub const CHR_PREFIXES: [&str; 2] = ["chr", "Chr"];

/// Returns the prefix shared by all `labels`, if any.
///
/// A prefix carried by only part of the labels is not stripped; such input
/// is left as is and reported with a warning.
pub fn detect_chr_prefix<S: AsRef<str>>(labels: &[S]) -> Option<&'static str> {
    if labels.is_empty() {
        return None;
    }
    for prefix in CHR_PREFIXES {
        if labels.iter().all(|l| l.as_ref().starts_with(prefix)) {
            return Some(prefix);
        }
    }
    if labels
        .iter()
        .any(|l| CHR_PREFIXES.iter().any(|p| l.as_ref().starts_with(p)))
    {
        warn!(
            "Chromosome labels use the \"chr\"/\"Chr\" prefix inconsistently; \
             labels are left unmodified"
        );
    }
    None
}

fn require_columns<'a>(
    schema: &Schema,
    names: impl IntoIterator<Item = &'a str>,
) -> Result<()> {
    for name in names {
        if !schema.contains(name) {
            return Err(CnvError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Canonical chromosome label expression for `chr_col`.
fn chr_label_expr(
    data: &LazyFrame,
    chr_col: &str,
) -> Result<Expr> {
    let unique = data
        .clone()
        .select([col(chr_col)
            .cast(DataType::String)
            .unique()
            .alias(CnColumns::Chr.as_str())])
        .collect()?;
    let labels = unique
        .column(CnColumns::Chr.as_str())?
        .str()?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect_vec();

    let prefix = detect_chr_prefix(&labels);
    let dropped = labels
        .iter()
        .filter(|l| {
            let l = prefix
                .and_then(|p| l.strip_prefix(p))
                .unwrap_or(l.as_str());
            !is_canonical(l)
        })
        .count();
    if dropped > 0 {
        debug!("{dropped} non-canonical chromosome label(s) will be dropped");
    }

    let label = col(chr_col).cast(DataType::String);
    let label = match prefix {
        Some(prefix) => {
            debug!("Stripping chromosome prefix \"{prefix}\"");
            label.str().strip_prefix(lit(prefix))
        },
        None => label,
    };
    Ok(label.alias(CnColumns::Chr.as_str()))
}

/// Input columns that are carried through unmodified: everything that is
/// neither a source nor a canonical output column.
fn passthrough_columns(
    schema: &Schema,
    sources: &[&str],
    outputs: &[&str],
) -> Vec<String> {
    schema
        .iter_names()
        .map(|name| name.as_str())
        .filter(|name| {
            if sources.contains(name) {
                return false;
            }
            if outputs.contains(name) {
                debug!("Dropping column \"{name}\" shadowed by a canonical column");
                return false;
            }
            true
        })
        .map(str::to_string)
        .collect()
}

/// Keeps canonical chromosomes and sorts by (rank, start). Equal keys keep
/// their input order.
fn filter_and_sort(
    data: LazyFrame,
    has_start: bool,
    output_names: &[String],
) -> Result<LazyFrame> {
    let data = data.with_row_index(ROW_INDEX_COL, None);
    let mut by = vec![col(RANK_COL)];
    if has_start {
        by.push(CnColumns::Start.col());
    }
    by.push(col(ROW_INDEX_COL));

    Ok(join_chromosome_rank(data, RANK_COL)?
        .sort_by_exprs(by, SortMultipleOptions::default())
        .select(output_names.iter().map(|name| col(name.as_str())).collect_vec()))
}

/// Preprocesses a table holding genome copy number information.
///
/// Columns named in `config` are renamed to the canonical names and cast
/// to the canonical types (see the [module docs](self)). The output is of
/// the same kind as `data`: an eager [`DataFrame`] stays eager, a
/// [`LazyFrame`] stays lazy. Detecting the chromosome prefix evaluates the
/// unique chromosome labels eagerly.
pub fn copy_number_preprocess<F: PolarsFrame>(
    data: F,
    config: &CopyNumberConfig,
) -> Result<F> {
    let mut data = data.into_lazy();
    let schema = data.collect_schema()?;

    let coords = match (&config.start_col, &config.end_col) {
        (Some(start), Some(end)) => Some((start.as_str(), end.as_str())),
        _ => None,
    };
    let mut sources = vec![config.chr_col.as_str(), config.copy_number_col.as_str()];
    if let Some((start, end)) = coords {
        sources.extend([start, end]);
    }
    require_columns(&schema, sources.iter().copied())?;

    let mut exprs = vec![chr_label_expr(&data, &config.chr_col)?];
    if let Some((start, end)) = coords {
        exprs.push(col(start).cast(DataType::Int64).alias(CnColumns::Start.as_str()));
        exprs.push(col(end).cast(DataType::Int64).alias(CnColumns::End.as_str()));
    }
    let copy_number = col(config.copy_number_col.as_str());
    exprs.push(
        copy_number
            .clone()
            .cast(DataType::Float32)
            .alias(CnColumns::CopyNumber.as_str()),
    );
    // rounded from the source precision, not from the Float32 column
    exprs.push(
        round_half_even_expr(copy_number)
            .cast(DataType::Int32)
            .alias(CnColumns::IntegerCopyNumber.as_str()),
    );

    let canonical = if coords.is_some() {
        CnColumns::window_colnames().to_vec()
    }
    else {
        CnColumns::chromosome_colnames().to_vec()
    };
    let extra = passthrough_columns(&schema, &sources, &canonical);
    exprs.extend(extra.iter().map(|name| col(name.as_str())));

    let output_names = canonical
        .iter()
        .map(|s| s.to_string())
        .chain(extra)
        .collect_vec();
    let data = filter_and_sort(data.select(exprs), coords.is_some(), &output_names)?;
    debug!(
        "Prepared copy number preprocessing: {} columns, coordinates: {}",
        output_names.len(),
        coords.is_some()
    );
    Ok(F::from_lazy(data)?)
}

/// Preprocesses a table of copy number variations.
///
/// Values of `cnv_type_col` are mapped strictly: `gain_value` becomes
/// `"gain"`, `loss_value` becomes `"loss"` and any other non-null value
/// fails with [`CnvError::StrictMapping`]. The mapping is validated eagerly,
/// also for lazy input.
pub fn cnv_preprocess<F: PolarsFrame>(
    data: F,
    config: &CnvConfig,
) -> Result<F> {
    let mut data = data.into_lazy();
    let schema = data.collect_schema()?;
    let sources = [
        config.chr_col.as_str(),
        config.start_col.as_str(),
        config.end_col.as_str(),
        config.cnv_type_col.as_str(),
    ];
    require_columns(&schema, sources)?;

    let source_type = col(config.cnv_type_col.as_str()).cast(DataType::String);
    let mapped_type = when(source_type.clone().eq(lit(config.gain_value.as_str())))
        .then(lit("gain"))
        .when(source_type.clone().eq(lit(config.loss_value.as_str())))
        .then(lit("loss"))
        .otherwise(lit(NULL).cast(DataType::String));

    let unmapped = data
        .clone()
        .filter(mapped_type.clone().is_null().and(source_type.clone().is_not_null()))
        .select([source_type.alias(CnColumns::CnvType.as_str())])
        .limit(1)
        .collect()?;
    if unmapped.height() > 0 {
        let value = unmapped
            .column(CnColumns::CnvType.as_str())?
            .str()?
            .get(0)
            .unwrap_or_default()
            .to_string();
        return Err(CnvError::StrictMapping {
            value,
            gain: config.gain_value.clone(),
            loss: config.loss_value.clone(),
        });
    }

    let mut exprs = vec![
        chr_label_expr(&data, &config.chr_col)?,
        col(config.start_col.as_str())
            .cast(DataType::Int64)
            .alias(CnColumns::Start.as_str()),
        col(config.end_col.as_str())
            .cast(DataType::Int64)
            .alias(CnColumns::End.as_str()),
        mapped_type
            .cast(CnColumns::CnvType.dtype())
            .alias(CnColumns::CnvType.as_str()),
    ];
    let canonical = CnColumns::cnv_colnames();
    let extra = passthrough_columns(&schema, &sources, &canonical);
    exprs.extend(extra.iter().map(|name| col(name.as_str())));

    let output_names = canonical
        .iter()
        .map(|s| s.to_string())
        .chain(extra)
        .collect_vec();
    let data = filter_and_sort(data.select(exprs), true, &output_names)?;
    Ok(F::from_lazy(data)?)
}

/// Collapses a normalized window-level table into one row per chromosome.
///
/// `copy_number` is the arithmetic mean over the windows of the chromosome
/// and `integer_copy_number` is re-derived by rounding that mean (not by
/// averaging the rounded window values). Chromosomes keep their order of
/// first appearance.
pub fn chromosome_copy_number<F: PolarsFrame>(data: F) -> Result<F> {
    let mut data = data.into_lazy();
    let schema = data.collect_schema()?;
    require_columns(&schema, [
        CnColumns::Chr.as_str(),
        CnColumns::CopyNumber.as_str(),
    ])?;

    let data = data
        .select([CnColumns::Chr.col(), CnColumns::CopyNumber.col()])
        .group_by_stable([CnColumns::Chr.col()])
        .agg([CnColumns::CopyNumber
            .col()
            .mean()
            .cast(DataType::Float32)
            .alias(CnColumns::CopyNumber.as_str())])
        .with_column(
            round_half_even_expr(CnColumns::CopyNumber.col())
                .cast(DataType::Int32)
                .alias(CnColumns::IntegerCopyNumber.as_str()),
        );
    Ok(F::from_lazy(data)?)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(&["chr1", "chr2", "chrX"], Some("chr"))]
    #[case(&["Chr1", "Chr22"], Some("Chr"))]
    #[case(&["1", "2", "X"], None)]
    #[case(&["chr1", "2"], None)]
    #[case(&["chr1", "Chr2"], None)]
    #[case(&[], None)]
    fn test_detect_chr_prefix(
        #[case] labels: &[&str],
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(detect_chr_prefix(labels), expected);
    }

    #[rstest]
    #[case::above_half(2.500000001, 3)]
    #[case::below_half(2.499999999, 2)]
    #[case::exact_half(2.5, 2)]
    fn test_integer_copy_number_uses_source_precision(
        #[case] value: f64,
        #[case] expected: i32,
    ) {
        let df = df!(
            "chr" => ["1"],
            "start" => [0i64],
            "end" => [10i64],
            "copy_number" => [value]
        )
        .unwrap();
        let out = copy_number_preprocess(df, &CopyNumberConfig::default())
            .unwrap();
        let integer = out.column("integer_copy_number").unwrap().i32().unwrap();
        assert_eq!(integer.get(0), Some(expected));
    }

    #[test]
    fn test_missing_column() {
        let df = df!(
            "chr" => ["1"],
            "start" => [0i64],
            "end" => [10i64]
        )
        .unwrap();
        let err = copy_number_preprocess(df, &CopyNumberConfig::default())
            .unwrap_err();
        assert!(matches!(err, CnvError::MissingColumn(name) if name == "copy_number"));
    }

    #[test]
    fn test_shadowed_column_is_dropped() {
        let df = df!(
            "chromosome" => ["1", "1"],
            "chr" => ["junk", "junk"],
            "pos" => [10i64, 0],
            "cn" => [2.0f64, 3.0]
        )
        .unwrap();
        let config = CopyNumberConfig::default()
            .with_chr_col("chromosome".into())
            .with_start_col(Some("pos".into()))
            .with_end_col(Some("pos".into()))
            .with_copy_number_col("cn".into());
        let out = copy_number_preprocess(df, &config).unwrap();
        let names = out
            .get_column_names()
            .iter()
            .map(|name| name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, CnColumns::window_colnames().to_vec());
        let chr = out.column("chr").unwrap().str().unwrap();
        assert_eq!(chr.get(0), Some("1"));
        let start = out.column("start").unwrap().i64().unwrap();
        let end = out.column("end").unwrap().i64().unwrap();
        assert_eq!(start.get(0), Some(0));
        assert_eq!(end.get(0), Some(0));
        assert_eq!(start.get(1), Some(10));
    }
}
