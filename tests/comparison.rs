mod common;

use assert_approx_eq::assert_approx_eq;
use cnvtools::copy_number::CorrelationMethod;
use cnvtools::prelude::*;
use common::{
    init_logger,
    DemoProfileBuilder,
};
use polars::prelude::*;
use rstest::{
    fixture,
    rstest,
};

fn windows(
    chr: &[&str],
    start: &[i64],
    copy_number: &[f64],
) -> CopyNumberWindow {
    let end = start.iter().map(|s| s + 99).collect::<Vec<_>>();
    let df = df!(
        "chr" => chr,
        "start" => start,
        "end" => end,
        "copy_number" => copy_number
    )
    .unwrap();
    CopyNumberWindow::from_frame(df).unwrap()
}

#[fixture]
fn truth() -> CopyNumberWindow {
    windows(
        &["1", "1", "2", "2", "X"],
        &[0, 100, 0, 100, 0],
        &[2.0, 2.0, 3.0, 1.0, 1.0],
    )
}

#[rstest]
fn consistency_ignores_input_order(truth: CopyNumberWindow) -> anyhow::Result<()> {
    let shuffled = windows(
        &["X", "2", "1", "2", "1"],
        &[0, 100, 100, 0, 0],
        &[1.0, 1.0, 2.0, 3.0, 2.0],
    );
    assert!(region_consistency_check(&truth, &shuffled)?);
    Ok(())
}

#[rstest]
fn consistency_is_row_wise(truth: CopyNumberWindow) -> anyhow::Result<()> {
    assert!(region_consistency_check(&truth, &truth.clone())?);

    let reversed = CopyNumberWindow::from_normalized(truth.data().reverse());
    assert!(!region_consistency_check(&truth, &reversed)?);
    Ok(())
}

#[rstest]
fn consistency_detects_missing_region(truth: CopyNumberWindow) -> anyhow::Result<()> {
    let dropped = windows(&["1", "1", "2", "2"], &[0, 100, 0, 100], &[2.0; 4]);
    assert!(!region_consistency_check(&truth, &dropped)?);

    let moved = windows(
        &["1", "1", "2", "2", "X"],
        &[0, 200, 0, 100, 0],
        &[2.0; 5],
    );
    assert!(!region_consistency_check(&truth, &moved)?);
    Ok(())
}

#[rstest]
fn classification_scores(truth: CopyNumberWindow) -> anyhow::Result<()> {
    init_logger();
    // integer copy numbers: truth [2, 2, 3, 1, 1], pred [2, 3, 3, 1, 2]
    let pred = windows(
        &["1", "1", "2", "2", "X"],
        &[0, 100, 0, 100, 0],
        &[2.2, 2.6, 2.9, 0.8, 1.5],
    );
    assert_approx_eq!(accuracy_score(&truth, &pred)?, 0.6);

    // per class: 1 -> p 1/1 r 1/2, 2 -> p 1/2 r 1/2, 3 -> p 1/2 r 1/1
    let precision = precision_score(&truth, &pred, None)?;
    match precision {
        Score::PerClass(scores) => {
            let labels = scores.iter().map(|(label, _)| *label).collect::<Vec<_>>();
            assert_eq!(labels, vec![1, 2, 3]);
            assert_approx_eq!(scores[0].1, 1.0);
            assert_approx_eq!(scores[1].1, 0.5);
            assert_approx_eq!(scores[2].1, 0.5);
        },
        other => panic!("expected per-class scores, got {other:?}"),
    }
    let macro_precision = precision_score(&truth, &pred, Some(Average::Macro))?;
    assert_approx_eq!(macro_precision.value().unwrap(), 2.0 / 3.0);
    let macro_recall = recall_score(&truth, &pred, Some(Average::Macro))?;
    assert_approx_eq!(macro_recall.value().unwrap(), 2.0 / 3.0);
    let micro_recall = recall_score(&truth, &pred, Some(Average::Micro))?;
    assert_approx_eq!(micro_recall.value().unwrap(), 0.6);
    Ok(())
}

#[rstest]
fn scores_use_matching_regions_only(truth: CopyNumberWindow) -> anyhow::Result<()> {
    let partial = windows(&["2", "X", "Y"], &[0, 0, 0], &[3.0, 2.0, 2.0]);
    assert_approx_eq!(accuracy_score(&truth, &partial)?, 0.5);
    Ok(())
}

#[rstest]
fn difference_std(truth: CopyNumberWindow) -> anyhow::Result<()> {
    let pred = windows(
        &["1", "1", "2", "2", "X"],
        &[0, 100, 0, 100, 0],
        &[3.0, 2.0, 4.0, 1.0, 1.0],
    );
    // differences [1, 0, 1, 0, 0]
    let std = cnvtools::copy_number::difference_std(&truth, &pred)?;
    assert_approx_eq!(std, (0.3f64).sqrt(), 1e-6);

    let single = windows(&["1"], &[0], &[2.5]);
    assert!(cnvtools::copy_number::difference_std(&truth, &single)?.is_nan());
    Ok(())
}

#[rstest]
fn correlation(truth: CopyNumberWindow) -> anyhow::Result<()> {
    let scaled = windows(
        &["1", "1", "2", "2", "X"],
        &[0, 100, 0, 100, 0],
        &[4.0, 4.0, 6.0, 2.0, 2.0],
    );
    let r = correlation_coefficient(&truth, &scaled, CorrelationMethod::Pearson)?;
    assert_approx_eq!(r, 1.0);
    let rho = correlation_coefficient(&truth, &scaled, CorrelationMethod::Spearman)?;
    assert_approx_eq!(rho, 1.0);

    let with_nan = windows(
        &["1", "1", "2", "2", "X"],
        &[0, 100, 0, 100, 0],
        &[f64::NAN, 4.0, 6.0, 2.0, 2.0],
    );
    assert!(correlation_coefficient(&truth, &with_nan, CorrelationMethod::Pearson)?.is_nan());
    Ok(())
}

#[rstest]
fn correlation_requires_identical_regions(truth: CopyNumberWindow) {
    let other = windows(&["1", "1"], &[0, 100], &[2.0, 2.0]);
    let err = correlation_coefficient(&truth, &other, CorrelationMethod::Pearson).unwrap_err();
    assert!(matches!(err, CnvError::RegionMismatch { left: 0, right: 1 }));
}

#[test]
fn mean_of_profiles() -> anyhow::Result<()> {
    init_logger();
    let builder = DemoProfileBuilder::new(3, 500);
    let profiles = [1.0, 2.0, 3.0]
        .into_iter()
        .map(|value| {
            CopyNumberWindow::from_frame(builder.build(move |_, _| value))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let averaged = cnvtools::copy_number::mean(&profiles)?;

    assert!(region_consistency_check(&averaged, &profiles[0])?);
    let data = averaged.data();
    let copy_number = data.column("copy_number")?.f32()?;
    assert!(copy_number.into_no_null_iter().all(|v| (v - 2.0).abs() < 1e-6));
    let integer = data.column("integer_copy_number")?.i32()?;
    assert!(integer.into_no_null_iter().all(|v| v == 2));
    Ok(())
}

#[test]
fn mean_keeps_frame_kind() -> anyhow::Result<()> {
    let builder = DemoProfileBuilder::new(2, 100);
    let lazy = [0.5, 1.0]
        .into_iter()
        .map(|value| {
            CopyNumberWindow::from_frame(builder.build(move |_, _| value).lazy())
        })
        .collect::<Result<Vec<_>, _>>()?;
    let averaged: CopyNumberWindow<LazyFrame> = cnvtools::copy_number::mean(&lazy)?;
    let collected = averaged.collect()?;
    let integer = collected.data().column("integer_copy_number")?.i32()?;
    // 0.75 rounds to 1
    assert!(integer.into_no_null_iter().all(|v| v == 1));
    Ok(())
}

#[test]
fn mean_reports_mismatch_index() {
    let a = windows(&["1", "2"], &[0, 0], &[1.0, 1.0]);
    let b = windows(&["1", "2"], &[0, 0], &[2.0, 2.0]);
    let c = windows(&["1", "3"], &[0, 0], &[2.0, 2.0]);
    let err = cnvtools::copy_number::mean(&[a.clone(), b, c]).unwrap_err();
    assert!(matches!(err, CnvError::RegionMismatch { left: 1, right: 2 }));

    let empty: [CopyNumberWindow; 0] = [];
    assert!(matches!(cnvtools::copy_number::mean(&empty), Err(CnvError::InvalidArgument(_))));
    assert!(cnvtools::copy_number::mean(&[a]).is_ok());
}

#[test]
fn chromosome_level_comparison() -> anyhow::Result<()> {
    let truth = CopyNumberChromosome::from_frame(df!(
        "chr" => ["1", "2", "3"],
        "copy_number" => [2.0f64, 2.0, 3.0]
    )?)?;
    let pred = CopyNumberChromosome::from_frame(df!(
        "chr" => ["3", "1", "2"],
        "copy_number" => [3.2f64, 1.9, 1.2]
    )?)?;
    assert!(region_consistency_check(&truth, &pred)?);
    assert_approx_eq!(accuracy_score(&truth, &pred)?, 2.0 / 3.0);
    Ok(())
}
