use itertools::{
    izip,
    Itertools,
};
use log::{
    debug,
    info,
    warn,
};
use polars::prelude::*;
use serde::{
    Deserialize,
    Serialize,
};

use super::layout::{
    AxisTicks,
    ChromosomeTrace,
    PositionConverter,
    TraceLayout,
};
use super::segments::{
    baseline_copy_number,
    subtract_intervals,
};
use crate::copy_number::CopyNumberWindow;
use crate::data_structs::{
    CnColumns,
    PolarsFrame,
};
use crate::error::Result;
use crate::{
    getter_fn,
    with_field_fn,
};

/// Appearance of a Manhattan plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManhattanConfig {
    pub width:         usize,
    pub height:        usize,
    /// Upper bound of the copy number axis.
    pub y_max:         f64,
    pub point_size:    usize,
    /// Cycled over the chromosomes.
    pub point_colours: Vec<String>,
    pub line_colour:   String,
    pub line_width:    f64,
    /// Colour of the chromosome boundary lines.
    pub grid_colour:   String,
    pub x_title:       String,
    pub y_title:       String,
}

impl ManhattanConfig {
    with_field_fn!(width, usize);
    with_field_fn!(height, usize);
    with_field_fn!(y_max, f64);
    with_field_fn!(point_size, usize);
    with_field_fn!(point_colours, Vec<String>);
    with_field_fn!(line_colour, String);
    with_field_fn!(line_width, f64);
    with_field_fn!(grid_colour, String);
    with_field_fn!(x_title, String);
    with_field_fn!(y_title, String);

    /// Colour of the `index`-th chromosome trace.
    pub fn point_colour(
        &self,
        index: usize,
    ) -> Option<&str> {
        if self.point_colours.is_empty() {
            return None;
        }
        Some(self.point_colours[index % self.point_colours.len()].as_str())
    }
}

impl Default for ManhattanConfig {
    fn default() -> Self {
        Self {
            width:         1600,
            height:        400,
            y_max:         4.0,
            point_size:    4,
            point_colours: [
                "rgba(99,110,250,0.4)",
                "rgba(239,85,59,0.4)",
                "rgba(0,204,150,0.4)",
                "rgba(171,99,250,0.4)",
                "rgba(255,161,90,0.4)",
                "rgba(25,211,243,0.4)",
                "rgba(255,102,146,0.4)",
                "rgba(182,232,128,0.4)",
                "rgba(255,151,255,0.4)",
                "rgba(254,203,82,0.4)",
            ]
            .map(String::from)
            .to_vec(),
            line_colour:   "rgba(42,63,95,0.7)".to_string(),
            line_width:    4.0,
            grid_colour:   "#EBF0F8".to_string(),
            x_title:       "Chromosome".to_string(),
            y_title:       "Copy number".to_string(),
        }
    }
}

/// Horizontal line on the genome axis.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    /// `cnv_<chr>_<x0>_<x1>` or `non_cnv_<chr>_<x0>_<x1>`.
    pub name: String,
    pub chr:  String,
    /// Closed range in genome coordinates.
    pub x:    [i64; 2],
    pub y:    f64,
}

impl LineSegment {
    fn new(
        kind: &str,
        chr: &str,
        x: [i64; 2],
        y: f64,
    ) -> Self {
        Self {
            name: format!("{kind}_{chr}_{}_{}", x[0], x[1]),
            chr: chr.to_string(),
            x,
            y,
        }
    }
}

/// Genome-wide copy number plot: one trace per chromosome on a single
/// concatenated axis, plus optional CNV and baseline lines.
#[derive(Debug, Clone)]
pub struct ManhattanPlot {
    config:             ManhattanConfig,
    traces:             Vec<ChromosomeTrace>,
    ticks:              AxisTicks,
    position_converter: PositionConverter,
    cnv_lines:          Vec<LineSegment>,
    baseline_lines:     Vec<LineSegment>,
}

impl ManhattanPlot {
    getter_fn!(config, ManhattanConfig);
    getter_fn!(traces, Vec<ChromosomeTrace>);
    getter_fn!(ticks, AxisTicks);
    getter_fn!(position_converter, PositionConverter);
    getter_fn!(cnv_lines, Vec<LineSegment>);
    getter_fn!(baseline_lines, Vec<LineSegment>);

    /// Lays out Manhattan plot data (see
    /// [`CopyNumberWindow::manhattan_plot_preprocess`]) and verifies the
    /// result.
    pub fn try_new<L: TraceLayout>(
        data: &DataFrame,
        config: ManhattanConfig,
        layout: &L,
    ) -> Result<Self> {
        let traces = layout.layout(data)?;
        let position_converter = PositionConverter::from_traces(&traces, data)?;
        let ticks = AxisTicks::from_traces(&traces);
        info!(
            "Manhattan plot with {} chromosomes, genome axis [{}, {}]",
            traces.len(),
            traces.first().and_then(ChromosomeTrace::x_min).unwrap_or_default(),
            traces.last().and_then(ChromosomeTrace::x_max).unwrap_or_default()
        );
        Ok(Self {
            config,
            traces,
            ticks,
            position_converter,
            cnv_lines: Vec::new(),
            baseline_lines: Vec::new(),
        })
    }

    pub fn from_copy_number<F: PolarsFrame>(
        copy_number: &CopyNumberWindow<F>
    ) -> Result<Self> {
        copy_number.manhattan_plot()
    }

    /// `chr` and `position_diff` (the offset added to positions of `chr`).
    pub fn position_converter_frame(&self) -> Result<DataFrame> {
        Ok(self.position_converter.to_frame()?)
    }

    /// Lines for the segments of `cnv` and for the baseline between them.
    ///
    /// Every CNV segment becomes a line at its copy number. Each chromosome
    /// trace then gets baseline lines over the part of its x range not
    /// covered by a CNV line of the same chromosome. Segments on
    /// chromosomes absent from the plot are skipped.
    pub fn cnv_line_traces<F: PolarsFrame>(
        &self,
        cnv: &CopyNumberWindow<F>,
    ) -> Result<(Vec<LineSegment>, Vec<LineSegment>)> {
        let segments = cnv.manhattan_plot_preprocess()?.collect_df()?;
        let copy_number = segments
            .column(CnColumns::CopyNumber.as_str())?
            .cast(&DataType::Float64)?;

        let mut cnv_lines = Vec::with_capacity(segments.height());
        for (chr, start, end, value) in izip!(
            segments.column(CnColumns::Chr.as_str())?.str()?.into_iter(),
            segments.column(CnColumns::Start.as_str())?.i64()?.into_iter(),
            segments.column(CnColumns::End.as_str())?.i64()?.into_iter(),
            copy_number.f64()?.into_iter()
        ) {
            let (Some(chr), Some(start), Some(end)) = (chr, start, end)
            else {
                continue;
            };
            let Some(offset) = self.position_converter.offset(chr)
            else {
                warn!("Chromosome {chr} is not plotted, skipping CNV segment {start}-{end}");
                continue;
            };
            cnv_lines.push(LineSegment::new(
                "cnv",
                chr,
                [start + offset, end + offset],
                value.unwrap_or(f64::NAN),
            ));
        }

        let mut baseline_lines = Vec::new();
        for trace in &self.traces {
            let (Some(chr), Some(x_min), Some(x_max)) =
                (trace.chromosome(), trace.x_min(), trace.x_max())
            else {
                continue;
            };
            let Some(baseline) = baseline_copy_number(&trace.y)
            else {
                warn!("No finite copy number on chromosome {chr}, no baseline drawn");
                continue;
            };
            let covered = cnv_lines
                .iter()
                .filter(|line| line.chr == chr)
                .map(|line| line.x)
                .collect_vec();
            baseline_lines.extend(
                subtract_intervals([x_min, x_max], &covered)
                    .into_iter()
                    .map(|x| LineSegment::new("non_cnv", chr, x, baseline as f64)),
            );
        }
        debug!(
            "{} CNV lines, {} baseline lines",
            cnv_lines.len(),
            baseline_lines.len()
        );
        Ok((cnv_lines, baseline_lines))
    }

    /// Adds the lines of [`ManhattanPlot::cnv_line_traces`] to the plot.
    pub fn add_cnv_line<F: PolarsFrame>(
        mut self,
        cnv: &CopyNumberWindow<F>,
    ) -> Result<Self> {
        let (cnv_lines, baseline_lines) = self.cnv_line_traces(cnv)?;
        self.cnv_lines.extend(cnv_lines);
        self.baseline_lines.extend(baseline_lines);
        Ok(self)
    }
}

#[cfg(feature = "plots")]
mod render {
    use plotly::common::{
        Line,
        Marker,
        Mode,
        Title,
    };
    use plotly::layout::themes::PLOTLY_WHITE;
    use plotly::layout::{
        Axis,
        Layout,
    };
    use plotly::{
        Plot,
        Scatter,
    };

    use super::*;

    impl ManhattanPlot {
        /// Builds the plotly figure.
        pub fn to_plot(&self) -> Plot {
            let config = &self.config;
            let mut plot = Plot::new();

            for boundary in &self.ticks.minor_values {
                let trace = Scatter::new(vec![*boundary; 2], vec![0.0, config.y_max])
                    .mode(Mode::Lines)
                    .line(Line::new().color(config.grid_colour.clone()).width(1.0))
                    .show_legend(false);
                plot.add_trace(trace);
            }

            for (idx, trace) in self.traces.iter().enumerate() {
                let mut marker = Marker::new().size(config.point_size);
                if let Some(colour) = config.point_colour(idx) {
                    marker = marker.color(colour.to_string());
                }
                let points = Scatter::new(trace.x.clone(), trace.y.clone())
                    .name(&trace.name)
                    .mode(Mode::Markers)
                    .marker(marker)
                    .show_legend(false);
                plot.add_trace(points);
            }

            for segment in self.cnv_lines.iter().chain(self.baseline_lines.iter()) {
                let line = Scatter::new(segment.x.to_vec(), vec![segment.y; 2])
                    .name(&segment.name)
                    .mode(Mode::Lines)
                    .line(
                        Line::new()
                            .color(config.line_colour.clone())
                            .width(config.line_width),
                    )
                    .show_legend(false);
                plot.add_trace(line);
            }

            let x_axis = Axis::new()
                .title(Title::from(config.x_title.as_str()))
                .tick_values(
                    self.ticks
                        .values
                        .iter()
                        .map(|v| *v as f64)
                        .collect_vec(),
                )
                .tick_text(self.ticks.labels.clone())
                .tick_length(0)
                .show_grid(false)
                .zero_line(false);
            let y_axis = Axis::new()
                .title(Title::from(config.y_title.as_str()))
                .range(vec![0.0, config.y_max]);
            let layout = Layout::new()
                .template(&*PLOTLY_WHITE)
                .width(config.width)
                .height(config.height)
                .show_legend(false)
                .x_axis(x_axis)
                .y_axis(y_axis);
            plot.set_layout(layout);
            plot
        }

        /// Standalone HTML document of the figure.
        pub fn to_html(&self) -> String {
            self.to_plot().to_html()
        }
    }
}
