//! Genome-wide (Manhattan) plots of window copy numbers.
//!
//! Chromosomes are concatenated on one x axis by a [`TraceLayout`]; the
//! resulting [`PositionConverter`] maps chromosome positions to that axis so
//! CNV segments can be overlaid as lines. Rendering to plotly is available
//! with the `plots` feature.

mod layout;
mod manhattan;
mod segments;

pub use layout::{
    missing_chromosomes,
    AxisTicks,
    ChromosomeTrace,
    CumulativeLayout,
    PositionConverter,
    TraceLayout,
};
pub use manhattan::{
    LineSegment,
    ManhattanConfig,
    ManhattanPlot,
};
pub use segments::{
    baseline_copy_number,
    integers_to_intervals,
    subtract_intervals,
    MAX_BASELINE,
};
