use std::fmt;
use std::str::FromStr;

use hashbrown::HashMap;
use itertools::Itertools;
use log::*;
use num::ToPrimitive;
use serde::{
    Deserialize,
    Serialize,
};
use statrs::statistics::Statistics;

use crate::error::{
    CnvError,
    Result,
};

/// Averaging applied to per-class precision and recall.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Average {
    /// Global counts of true positives, false positives and false
    /// negatives.
    Micro,
    /// Unweighted mean of per-class scores.
    #[default]
    Macro,
    /// Mean of per-class scores weighted by class support.
    Weighted,
    /// Per-instance average. Only meaningful for multilabel targets.
    Samples,
}

impl FromStr for Average {
    type Err = CnvError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "micro" => Ok(Average::Micro),
            "macro" => Ok(Average::Macro),
            "weighted" => Ok(Average::Weighted),
            "samples" => Ok(Average::Samples),
            other => {
                Err(CnvError::invalid_argument(format!(
                    "unknown average \"{other}\""
                )))
            },
        }
    }
}

impl fmt::Display for Average {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Average::Micro => write!(f, "micro"),
            Average::Macro => write!(f, "macro"),
            Average::Weighted => write!(f, "weighted"),
            Average::Samples => write!(f, "samples"),
        }
    }
}

/// Result of precision or recall: one averaged value, or one value per
/// integer copy number class when no averaging is requested.
#[derive(Debug, Clone, PartialEq)]
pub enum Score {
    Averaged(f64),
    PerClass(Vec<(i32, f64)>),
}

impl Score {
    /// The averaged value, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            Score::Averaged(value) => Some(*value),
            Score::PerClass(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ClassMetric {
    Precision,
    Recall,
}

impl fmt::Display for ClassMetric {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ClassMetric::Precision => write!(f, "precision"),
            ClassMetric::Recall => write!(f, "recall"),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ClassCounts {
    true_positive: usize,
    predicted:     usize,
    support:       usize,
}

fn check_lengths<T, P>(
    y_true: &[T],
    y_pred: &[P],
) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(CnvError::invalid_argument(format!(
            "label sequences differ in length: {} vs {}",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

/// Fraction of positions where the two label sequences agree.
pub fn accuracy(
    y_true: &[i32],
    y_pred: &[i32],
) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    if y_true.is_empty() {
        warn!("Accuracy of empty label sequences is undefined");
        return Ok(f64::NAN);
    }
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Multiclass precision.
pub fn precision(
    y_true: &[i32],
    y_pred: &[i32],
    average: Option<Average>,
) -> Result<Score> {
    class_score(y_true, y_pred, average, ClassMetric::Precision)
}

/// Multiclass recall.
pub fn recall(
    y_true: &[i32],
    y_pred: &[i32],
    average: Option<Average>,
) -> Result<Score> {
    class_score(y_true, y_pred, average, ClassMetric::Recall)
}

fn class_score(
    y_true: &[i32],
    y_pred: &[i32],
    average: Option<Average>,
    metric: ClassMetric,
) -> Result<Score> {
    check_lengths(y_true, y_pred)?;
    if matches!(average, Some(Average::Samples)) {
        return Err(CnvError::invalid_argument(
            "samplewise metrics are not available outside of multilabel \
             classification",
        ));
    }

    let mut counts: HashMap<i32, ClassCounts> = HashMap::new();
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        counts.entry(*t).or_default().support += 1;
        counts.entry(*p).or_default().predicted += 1;
        if t == p {
            counts.entry(*t).or_default().true_positive += 1;
        }
    }
    let labels = counts.keys().copied().sorted().collect_vec();

    let ratio = |numerator: usize, denominator: usize, label: i32| -> f64 {
        if denominator == 0 {
            warn!(
                "{metric} is ill-defined for label {label} and being set to \
                 0.0"
            );
            0.0
        }
        else {
            numerator as f64 / denominator as f64
        }
    };
    let denominator = |c: &ClassCounts| -> usize {
        match metric {
            ClassMetric::Precision => c.predicted,
            ClassMetric::Recall => c.support,
        }
    };

    let per_class = labels
        .iter()
        .map(|label| {
            let c = &counts[label];
            (*label, ratio(c.true_positive, denominator(c), *label))
        })
        .collect_vec();

    let score = match average {
        None => return Ok(Score::PerClass(per_class)),
        Some(Average::Micro) => {
            let tp: usize = counts.values().map(|c| c.true_positive).sum();
            let total: usize = counts.values().map(denominator).sum();
            if total == 0 {
                warn!("{metric} of empty label sequences is set to 0.0");
                0.0
            }
            else {
                tp as f64 / total as f64
            }
        },
        Some(Average::Macro) => {
            if per_class.is_empty() {
                f64::NAN
            }
            else {
                per_class.iter().map(|(_, s)| *s).sum::<f64>()
                    / per_class.len() as f64
            }
        },
        Some(Average::Weighted) => {
            let total_support: usize =
                counts.values().map(|c| c.support).sum();
            if total_support == 0 {
                0.0
            }
            else {
                per_class
                    .iter()
                    .map(|(label, s)| s * counts[label].support as f64)
                    .sum::<f64>()
                    / total_support as f64
            }
        },
        Some(Average::Samples) => unreachable!(),
    };
    debug!("{metric} ({average:?}) over {} labels = {score}", labels.len());
    Ok(Score::Averaged(score))
}

/// Sample standard deviation (`n - 1` denominator). `NaN` for fewer than
/// two values.
pub fn sample_std(values: &[f64]) -> f64 {
    values.iter().std_dev()
}

/// Pearson correlation coefficient. Any `NaN` input, fewer than two pairs
/// or a constant sequence yields `NaN`.
pub fn pearson_r<X, Y>(
    x: &[X],
    y: &[Y],
) -> f64
where
    X: ToPrimitive,
    Y: ToPrimitive, {
    if x.len() != y.len() {
        warn!(
            "Cannot calculate Pearson's r: x length ({}) doesn't match y \
             length ({})",
            x.len(),
            y.len()
        );
        return f64::NAN;
    }
    let x_f64 = x
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect_vec();
    let y_f64 = y
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect_vec();
    if x_f64.len() < 2 || x_f64.iter().chain(y_f64.iter()).any(|v| v.is_nan())
    {
        return f64::NAN;
    }

    let x_mean = x_f64.iter().mean();
    let y_mean = y_f64.iter().mean();

    let numerator = x_f64
        .iter()
        .zip(y_f64.iter())
        .map(|(valx, valy)| (valx - x_mean) * (valy - y_mean))
        .sum::<f64>();
    let denominator = {
        let x_dev: f64 = x_f64.iter().map(|valx| (valx - x_mean).powi(2)).sum();
        let y_dev: f64 = y_f64.iter().map(|valy| (valy - y_mean).powi(2)).sum();
        (x_dev * y_dev).sqrt()
    };

    if denominator == 0.0 {
        debug!("Denominator is zero, returning r=NaN");
        return f64::NAN;
    }
    numerator / denominator
}

/// Spearman rank correlation coefficient (Pearson on average ranks).
pub fn spearman_r<X, Y>(
    x: &[X],
    y: &[Y],
) -> f64
where
    X: ToPrimitive,
    Y: ToPrimitive, {
    let x_f64 = x
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect_vec();
    let y_f64 = y
        .iter()
        .map(|v| v.to_f64().unwrap_or(f64::NAN))
        .collect_vec();
    if x_f64.iter().chain(y_f64.iter()).any(|v| v.is_nan()) {
        return f64::NAN;
    }
    pearson_r(&average_ranks(&x_f64), &average_ranks(&y_f64))
}

/// 1-based ranks; tied values share the mean of their ranks.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let order = (0..values.len())
        .sorted_by(|a, b| values[*a].total_cmp(&values[*b]))
        .collect_vec();
    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i + 1;
        while j < order.len() && values[order[j]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + 1 + j) as f64 / 2.0;
        for idx in &order[i..j] {
            ranks[*idx] = rank;
        }
        i = j;
    }
    ranks
}

/// Quantile of ascending `sorted` values taking the element just below the
/// exact quantile position (numpy "lower" method).
pub fn quantile_lower(
    sorted: &[f64],
    q: f64,
) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    sorted.get(position.floor() as usize).copied()
}

/// Quantile of ascending `sorted` values taking the element just above the
/// exact quantile position (numpy "higher" method).
pub fn quantile_higher(
    sorted: &[f64],
    q: f64,
) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    sorted.get(position.ceil() as usize).copied()
}

/// Mean of the values inside the interquartile range `[q1, q3]`, with `q1`
/// taken by [`quantile_lower`] and `q3` by [`quantile_higher`]. `NaN`
/// values are ignored.
pub fn interquartile_mean(values: &[f64]) -> Option<f64> {
    let sorted = values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .sorted_by(f64::total_cmp)
        .collect_vec();
    let lower = quantile_lower(&sorted, 0.25)?;
    let upper = quantile_higher(&sorted, 0.75)?;
    let retained = sorted
        .iter()
        .copied()
        .filter(|v| *v >= lower && *v <= upper)
        .collect_vec();
    Some(retained.iter().mean())
}
