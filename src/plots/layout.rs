//! Placement of window copy numbers on a single genome-wide x axis.

use hashbrown::HashMap;
use itertools::{
    izip,
    Itertools,
};
use log::debug;
use polars::prelude::*;

use crate::data_structs::{
    chromosome_name,
    chromosome_rank,
    CnColumns,
};
use crate::error::{
    CnvError,
    Result,
};

const TRACE_PREFIX: &str = "Chr";

/// Points of one chromosome, already shifted to genome coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct ChromosomeTrace {
    /// `Chr<rank>`, e.g. `Chr1`, `Chr23` for X.
    pub name: String,
    pub x:    Vec<i64>,
    pub y:    Vec<f64>,
}

impl ChromosomeTrace {
    pub fn new(
        rank: u8,
        x: Vec<i64>,
        y: Vec<f64>,
    ) -> Self {
        Self {
            name: format!("{TRACE_PREFIX}{rank}"),
            x,
            y,
        }
    }

    /// Chromosome rank encoded in the trace name.
    pub fn rank(&self) -> Option<u8> {
        self.name.strip_prefix(TRACE_PREFIX)?.parse().ok()
    }

    /// Canonical chromosome label of the trace.
    pub fn chromosome(&self) -> Option<&'static str> {
        chromosome_name(self.rank()?)
    }

    pub fn x_min(&self) -> Option<i64> {
        self.x.iter().copied().min()
    }

    pub fn x_max(&self) -> Option<i64> {
        self.x.iter().copied().max()
    }
}

/// Strategy turning Manhattan plot data into one trace per chromosome.
///
/// `data` holds `chr_number`, `position` and `copy_number`, sorted by
/// chromosome rank and position. The traces returned must shift every
/// chromosome by a single offset equal to the sum of the last positions of
/// the chromosomes before it; [`PositionConverter::from_traces`] rejects
/// anything else.
pub trait TraceLayout {
    fn layout(
        &self,
        data: &DataFrame,
    ) -> Result<Vec<ChromosomeTrace>>;
}

/// Concatenates chromosomes in rank order.
#[derive(Debug, Clone, Copy, Default)]
pub struct CumulativeLayout;

impl TraceLayout for CumulativeLayout {
    fn layout(
        &self,
        data: &DataFrame,
    ) -> Result<Vec<ChromosomeTrace>> {
        let mut traces: Vec<ChromosomeTrace> = Vec::new();
        let mut offset = 0i64;
        for (rank, points) in &ranked_points(data)?
            .into_iter()
            .chunk_by(|(rank, _, _)| *rank)
        {
            let (x, y): (Vec<i64>, Vec<f64>) = points
                .map(|(_, position, copy_number)| (position, copy_number))
                .unzip();
            let last = x.iter().copied().max().unwrap_or_default();
            let x = x.into_iter().map(|pos| pos + offset).collect_vec();
            traces.push(ChromosomeTrace::new(rank, x, y));
            offset += last;
        }
        debug!("Cumulative layout produced {} traces", traces.len());
        Ok(traces)
    }
}

/// `(chr_number, position, copy_number)` rows of Manhattan plot data.
/// Rows without a rank or position are skipped; a missing copy number
/// becomes `NaN`.
fn ranked_points(data: &DataFrame) -> Result<Vec<(u8, i64, f64)>> {
    let chr_number = data
        .column(CnColumns::ChrNumber.as_str())?
        .cast(&DataType::UInt8)?;
    let position = data
        .column(CnColumns::Position.as_str())?
        .cast(&DataType::Int64)?;
    let copy_number = data
        .column(CnColumns::CopyNumber.as_str())?
        .cast(&DataType::Float64)?;
    Ok(izip!(
        chr_number.u8()?.into_iter(),
        position.i64()?.into_iter(),
        copy_number.f64()?.into_iter()
    )
    .filter_map(|(rank, position, copy_number)| {
        Some((rank?, position?, copy_number.unwrap_or(f64::NAN)))
    })
    .collect())
}

/// Offsets between chromosome positions and genome coordinates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PositionConverter {
    offsets: Vec<(String, i64)>,
    index:   HashMap<String, usize>,
}

impl PositionConverter {
    /// Recovers the offset of every trace and checks that the traces follow
    /// the cumulative scheme.
    ///
    /// Requires one trace for each of the 24 chromosomes, or 23 when a sex
    /// chromosome is absent. Each trace must be named after a chromosome
    /// present in `data`, hold as many points as that chromosome and be
    /// shifted by a single offset equal to the sum of the last positions of
    /// the preceding traces.
    pub fn from_traces(
        traces: &[ChromosomeTrace],
        data: &DataFrame,
    ) -> Result<Self> {
        if !matches!(traces.len(), 23 | 24) {
            return Err(CnvError::layout(format!(
                "expected 24 (or 23) chromosome traces, got {}",
                traces.len()
            )));
        }

        let positions = ranked_points(data)?
            .into_iter()
            .into_group_map_by(|(rank, _, _)| *rank);
        let mut converter = Self::default();
        let mut last_base = 0i64;
        for trace in traces {
            let rank = trace.rank().ok_or_else(|| {
                CnvError::layout(format!("unexpected trace name \"{}\"", trace.name))
            })?;
            let chr = chromosome_name(rank).ok_or_else(|| {
                CnvError::layout(format!("no chromosome with rank {rank}"))
            })?;
            let points = positions.get(&rank).ok_or_else(|| {
                CnvError::layout(format!("no data for chromosome {chr}"))
            })?;
            if points.len() != trace.x.len() {
                return Err(CnvError::layout(format!(
                    "trace {} has {} points, chromosome {chr} has {}",
                    trace.name,
                    trace.x.len(),
                    points.len()
                )));
            }

            let shifted_by = |(x, (_, pos, _)): (&i64, &(u8, i64, f64))| x - pos;
            let mut diffs = trace.x.iter().zip(points.iter()).map(shifted_by);
            if let Some(first) = diffs.next() {
                if diffs.any(|diff| diff != first) {
                    return Err(CnvError::layout(format!(
                        "trace {} is not shifted by a single offset",
                        trace.name
                    )));
                }
                if first != last_base {
                    return Err(CnvError::layout(format!(
                        "trace {} is shifted by {first}, expected {last_base}",
                        trace.name
                    )));
                }
            }
            converter.push(chr, last_base);
            last_base += points
                .iter()
                .map(|(_, pos, _)| *pos)
                .max()
                .unwrap_or_default();
        }
        Ok(converter)
    }

    fn push(
        &mut self,
        chr: &str,
        offset: i64,
    ) {
        self.index.insert(chr.to_string(), self.offsets.len());
        self.offsets.push((chr.to_string(), offset));
    }

    /// Offset of `chr`, `None` if the chromosome is not plotted.
    pub fn offset(
        &self,
        chr: &str,
    ) -> Option<i64> {
        self.index.get(chr).map(|idx| self.offsets[*idx].1)
    }

    /// Genome coordinate of `position` on `chr`.
    pub fn convert(
        &self,
        chr: &str,
        position: i64,
    ) -> Option<i64> {
        self.offset(chr).map(|offset| offset + position)
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// `(chr, offset)` pairs in plot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.offsets
            .iter()
            .map(|(chr, offset)| (chr.as_str(), *offset))
    }

    /// The offsets as a table with columns `chr` and `position_diff`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let (chr, offset): (Vec<&str>, Vec<i64>) = self.iter().unzip();
        df!(
            CnColumns::Chr.as_str() => chr,
            "position_diff" => offset
        )
    }
}

/// X axis ticks of a Manhattan plot: one labelled tick in the middle of
/// each chromosome and minor ticks (drawn as grid lines) on the
/// chromosome boundaries.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AxisTicks {
    pub values:       Vec<i64>,
    pub labels:       Vec<String>,
    pub minor_values: Vec<i64>,
}

impl AxisTicks {
    /// The first chromosome spans its own points; every following one starts
    /// halfway between the previous chromosome's last point and its own
    /// first point.
    pub fn from_traces(traces: &[ChromosomeTrace]) -> Self {
        let mut ticks = Self::default();
        let mut previous_max: Option<i64> = None;
        for trace in traces {
            let (Some(x_min), Some(x_max)) = (trace.x_min(), trace.x_max())
            else {
                continue;
            };
            let start = match previous_max {
                Some(prev) => (x_min + prev).div_euclid(2),
                None => {
                    ticks.minor_values.push(x_min);
                    x_min
                },
            };
            ticks.minor_values.push(x_max);
            ticks.values.push((start + x_max).div_euclid(2));
            ticks.labels.push(
                trace
                    .chromosome()
                    .map(str::to_string)
                    .unwrap_or_else(|| trace.name.clone()),
            );
            previous_max = Some(x_max);
        }
        ticks
    }
}

/// Ranks of the canonical chromosomes that are missing from `data`.
pub fn missing_chromosomes(data: &DataFrame) -> Result<Vec<&'static str>> {
    let present = ranked_points(data)?
        .into_iter()
        .map(|(rank, _, _)| rank)
        .unique()
        .collect_vec();
    Ok(crate::data_structs::CHROMOSOME_NAMES
        .iter()
        .copied()
        .filter(|name| {
            chromosome_rank(name).is_some_and(|rank| !present.contains(&rank))
        })
        .collect())
}
