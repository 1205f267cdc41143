//! Closed integer intervals on the genome axis and the baseline copy
//! number drawn under them.

use itertools::Itertools;

use crate::utils::{
    integer_copy_number,
    interquartile_mean,
};

/// Highest baseline copy number.
pub const MAX_BASELINE: i32 = 2;

/// Compacts ascending integers into maximal closed intervals.
///
/// `[1, 2, 3, 5, 6, 9]` becomes `[[1, 3], [5, 6], [9, 9]]`. Repeated values
/// extend the current interval.
pub fn integers_to_intervals(integers: &[i64]) -> Vec<[i64; 2]> {
    let Some((first, rest)) = integers.split_first()
    else {
        return Vec::new();
    };
    let mut intervals = Vec::new();
    let (mut left, mut right) = (*first, *first);
    for value in rest {
        if value - right > 1 {
            intervals.push([left, right]);
            left = *value;
        }
        right = *value;
    }
    intervals.push([left, right]);
    intervals
}

/// Integers of the closed `range` not covered by any closed interval of
/// `covered`, as maximal closed intervals.
///
/// Equal to materializing the range, removing every covered integer and
/// calling [`integers_to_intervals`], without the materialization.
pub fn subtract_intervals(
    range: [i64; 2],
    covered: &[[i64; 2]],
) -> Vec<[i64; 2]> {
    let [range_start, range_end] = range;
    let mut remaining = Vec::new();
    if range_start > range_end {
        return remaining;
    }
    let mut cursor = range_start;
    for [start, end] in covered
        .iter()
        .copied()
        .filter(|[start, end]| start <= end)
        .sorted_unstable()
    {
        if cursor > range_end || start > range_end {
            break;
        }
        if start > cursor {
            remaining.push([cursor, start - 1]);
        }
        cursor = cursor.max(end.saturating_add(1));
    }
    if cursor <= range_end {
        remaining.push([cursor, range_end]);
    }
    remaining
}

/// Baseline copy number of a chromosome: mean of the interquartile values
/// rounded half to even and clamped to `0..=2`. `None` when no finite
/// value is present.
pub fn baseline_copy_number(copy_numbers: &[f64]) -> Option<i32> {
    let mean = interquartile_mean(copy_numbers)?;
    integer_copy_number(mean).map(|value| value.clamp(0, MAX_BASELINE))
}
