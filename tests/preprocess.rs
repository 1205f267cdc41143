mod common;

use assert_approx_eq::assert_approx_eq;
use cnvtools::data_structs::chromosome_rank;
use cnvtools::prelude::*;
use common::{
    init_logger,
    DemoProfileBuilder,
};
use itertools::Itertools;
use polars::prelude::*;
use rstest::{
    fixture,
    rstest,
};

#[fixture]
fn profile_builder() -> DemoProfileBuilder {
    DemoProfileBuilder::new(5, 1_000)
}

fn chr_values(df: &DataFrame) -> Vec<String> {
    df.column("chr")
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .map(str::to_string)
        .collect()
}

#[rstest]
fn normalization_is_idempotent(
    profile_builder: DemoProfileBuilder
) -> anyhow::Result<()> {
    init_logger();
    let raw = profile_builder.build(|chr, window| (chr + window) as f64 * 0.37);
    let config = CopyNumberConfig::default();
    let once = copy_number_preprocess(raw, &config)?;
    let twice = copy_number_preprocess(once.clone(), &config)?;
    assert!(once.equals_missing(&twice));
    Ok(())
}

#[rstest]
fn output_is_sorted_and_typed(
    profile_builder: DemoProfileBuilder
) -> anyhow::Result<()> {
    let raw = profile_builder.build(|_, window| 2.0 + window as f64 * 0.25);
    let out = copy_number_preprocess(raw, &CopyNumberConfig::default())?;

    assert_eq!(out.height(), 24 * 5);
    assert_eq!(out.column("start")?.dtype(), &DataType::Int64);
    assert_eq!(out.column("copy_number")?.dtype(), &DataType::Float32);
    assert_eq!(out.column("integer_copy_number")?.dtype(), &DataType::Int32);

    let ranks = chr_values(&out)
        .iter()
        .map(|chr| chromosome_rank(chr).unwrap())
        .collect_vec();
    let starts = out.column("start")?.i64()?.into_no_null_iter().collect_vec();
    for (i, j) in (0..out.height()).tuple_windows() {
        assert!(ranks[i] < ranks[j] || (ranks[i] == ranks[j] && starts[i] <= starts[j]));
    }
    Ok(())
}

#[test]
fn non_canonical_chromosomes_are_dropped() -> anyhow::Result<()> {
    let raw = df!(
        "chr" => ["chrMT", "chr1", "chrUn_gl000220", "chrX", "chr1_random"],
        "start" => [0i64, 0, 0, 0, 0],
        "end" => [10i64, 10, 10, 10, 10],
        "copy_number" => [1.0f64, 2.0, 3.0, 4.0, 5.0]
    )?;
    let out = copy_number_preprocess(raw, &CopyNumberConfig::default())?;
    assert_eq!(chr_values(&out), vec!["1", "X"]);
    Ok(())
}

#[rstest]
#[case::lower_prefix(&["chr2", "chr1", "chrY"], vec!["1", "2", "Y"])]
#[case::upper_prefix(&["Chr2", "Chr1", "ChrY"], vec!["1", "2", "Y"])]
#[case::bare(&["2", "1", "Y"], vec!["1", "2", "Y"])]
#[case::mixed(&["chr2", "1", "Y"], vec!["1", "Y"])]
fn chromosome_prefix(
    #[case] labels: &[&str],
    #[case] expected: Vec<&str>,
) -> anyhow::Result<()> {
    init_logger();
    let raw = df!(
        "chr" => labels,
        "start" => [0i64, 0, 0],
        "end" => [10i64, 10, 10],
        "copy_number" => [2.0f64, 2.0, 2.0]
    )?;
    let out = copy_number_preprocess(raw, &CopyNumberConfig::default())?;
    assert_eq!(chr_values(&out), expected);
    Ok(())
}

#[test]
fn custom_columns_and_passthrough() -> anyhow::Result<()> {
    let raw = df!(
        "sample" => ["a", "b", "c"],
        "chrom" => ["2", "1", "1"],
        "from" => [0i32, 500, 0],
        "to" => [99i32, 599, 99],
        "ratio" => [2.5f64, 0.5, 1.5]
    )?;
    let config = CopyNumberConfig::default()
        .with_chr_col("chrom".into())
        .with_start_col(Some("from".into()))
        .with_end_col(Some("to".into()))
        .with_copy_number_col("ratio".into());
    let out = copy_number_preprocess(raw, &config)?;

    let names = out
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect_vec();
    assert_eq!(names, vec![
        "chr",
        "start",
        "end",
        "copy_number",
        "integer_copy_number",
        "sample"
    ]);
    let sample = out.column("sample")?.str()?.into_no_null_iter().collect_vec();
    assert_eq!(sample, vec!["c", "b", "a"]);
    // halves round to even
    let integer = out
        .column("integer_copy_number")?
        .i32()?
        .into_no_null_iter()
        .collect_vec();
    assert_eq!(integer, vec![2, 0, 2]);
    Ok(())
}

#[rstest]
fn lazy_input_stays_lazy(profile_builder: DemoProfileBuilder) -> anyhow::Result<()> {
    let raw = profile_builder.build(|chr, _| chr as f64 / 10.0);
    let config = CopyNumberConfig::default();
    let eager = copy_number_preprocess(raw.clone(), &config)?;
    let lazy: LazyFrame = copy_number_preprocess(raw.lazy(), &config)?;
    assert!(lazy.collect()?.equals_missing(&eager));
    Ok(())
}

#[test]
fn chromosome_aggregate() -> anyhow::Result<()> {
    let raw = df!(
        "chr" => ["1", "1", "1", "2"],
        "start" => [0i64, 100, 200, 0],
        "end" => [99i64, 199, 299, 99],
        "copy_number" => [1.0f64, 1.0, 3.0, 2.0]
    )?;
    let windows = CopyNumberWindow::from_frame(raw)?;
    let chromosomes = windows.to_chromosome()?;
    let data = chromosomes.data();
    assert_eq!(chr_values(data), vec!["1", "2"]);

    let copy_number = data.column("copy_number")?.f32()?;
    assert_approx_eq!(copy_number.get(0).unwrap(), 1.6667f32, 1e-4);
    let integer = data.column("integer_copy_number")?.i32()?;
    assert_eq!(integer.get(0), Some(2));
    assert_eq!(integer.get(1), Some(2));
    Ok(())
}

#[test]
fn chromosome_level_input() -> anyhow::Result<()> {
    let raw = df!(
        "chr" => ["chrX", "chr3"],
        "copy_number" => [1.0f64, 2.0]
    )?;
    let chromosomes = CopyNumberChromosome::from_frame(raw)?;
    let names = chromosomes
        .data()
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect_vec();
    assert_eq!(names, vec!["chr", "copy_number", "integer_copy_number"]);
    assert_eq!(chr_values(chromosomes.data()), vec!["3", "X"]);
    Ok(())
}

#[test]
fn cnv_strict_mapping() -> anyhow::Result<()> {
    let raw = df!(
        "chr" => ["chr1", "chr1"],
        "start" => [0i64, 100],
        "end" => [50i64, 150],
        "cnv_type" => ["DUP", "AMP"]
    )?;
    let config = CnvConfig::default()
        .with_gain_value("DUP".into())
        .with_loss_value("DEL".into());
    let err = Cnv::try_new(raw, &config).unwrap_err();
    match err {
        CnvError::StrictMapping { value, gain, loss } => {
            assert_eq!(value, "AMP");
            assert_eq!(gain, "DUP");
            assert_eq!(loss, "DEL");
        },
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}
