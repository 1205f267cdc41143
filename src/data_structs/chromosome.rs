use hashbrown::HashMap;
use once_cell::sync::Lazy;
use polars::prelude::*;

use super::columns::CnColumns;

/// Canonical human chromosome labels in karyotype order.
pub const CHROMOSOME_NAMES: [&str; 24] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14",
    "15", "16", "17", "18", "19", "20", "21", "22", "X", "Y",
];

static CHROMOSOME_RANKS: Lazy<HashMap<&'static str, u8>> = Lazy::new(|| {
    CHROMOSOME_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| (*name, idx as u8 + 1))
        .collect()
});

/// Sort rank of a chromosome label: `1..22 -> 1..22`, `X -> 23`, `Y -> 24`.
/// Labels outside of the canonical set are unranked.
pub fn chromosome_rank(label: &str) -> Option<u8> {
    CHROMOSOME_RANKS.get(label).copied()
}

/// Inverse of [`chromosome_rank`].
pub fn chromosome_name(rank: u8) -> Option<&'static str> {
    match rank {
        1..=24 => Some(CHROMOSOME_NAMES[rank as usize - 1]),
        _ => None,
    }
}

#[inline]
pub fn is_canonical(label: &str) -> bool {
    CHROMOSOME_RANKS.contains_key(label)
}

/// Lookup table with the canonical labels in `chr` and their ranks in
/// `rank_col`.
pub fn rank_frame(rank_col: &str) -> PolarsResult<DataFrame> {
    let ranks = (1..=CHROMOSOME_NAMES.len() as u8).collect::<Vec<_>>();
    df!(
        CnColumns::Chr.as_str() => CHROMOSOME_NAMES.as_slice(),
        rank_col => ranks
    )
}

/// Attaches the chromosome rank as `rank_col`. The inner join drops every
/// row whose `chr` is not canonical.
pub(crate) fn join_chromosome_rank(
    data: LazyFrame,
    rank_col: &str,
) -> PolarsResult<LazyFrame> {
    let ranks = rank_frame(rank_col)?.lazy();
    Ok(data.join(
        ranks,
        [CnColumns::Chr.col()],
        [CnColumns::Chr.col()],
        JoinArgs::new(JoinType::Inner),
    ))
}
