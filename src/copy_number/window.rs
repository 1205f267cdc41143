use log::info;
use polars::prelude::*;

use super::{
    CopyNumber,
    CopyNumberChromosome,
};
use crate::data_structs::chromosome::join_chromosome_rank;
use crate::data_structs::{
    CnColumns,
    PolarsFrame,
};
use crate::error::{
    CnvError,
    Result,
};
use crate::plots::{
    CumulativeLayout,
    ManhattanConfig,
    ManhattanPlot,
    TraceLayout,
};
use crate::preprocess::{
    chromosome_copy_number,
    copy_number_preprocess,
    CopyNumberConfig,
};

/// Copy numbers of genome windows, one row per `chr`/`start`/`end`.
#[derive(Debug, Clone)]
pub struct CopyNumberWindow<F: PolarsFrame = DataFrame> {
    data: F,
}

impl<F: PolarsFrame> CopyNumberWindow<F> {
    /// Normalizes `data` using the column names of `config`.
    ///
    /// Both coordinate columns must be configured.
    pub fn try_new(
        data: F,
        config: &CopyNumberConfig,
    ) -> Result<Self> {
        if !config.has_coordinates() {
            return Err(CnvError::invalid_argument(
                "window copy number data needs both start and end columns",
            ));
        }
        let data = copy_number_preprocess(data, config)?;
        Ok(Self { data })
    }

    /// Normalizes `data` whose columns already carry the canonical names.
    pub fn from_frame(data: F) -> Result<Self> {
        Self::try_new(data, &CopyNumberConfig::default())
    }

    pub fn into_inner(self) -> F {
        self.data
    }

    /// Materializes the table.
    pub fn collect(self) -> Result<CopyNumberWindow<DataFrame>> {
        Ok(CopyNumberWindow {
            data: self.data.collect_df()?,
        })
    }

    pub fn lazy(self) -> CopyNumberWindow<LazyFrame> {
        CopyNumberWindow {
            data: self.data.into_lazy(),
        }
    }

    /// Averages the windows of each chromosome.
    pub fn to_chromosome(&self) -> Result<CopyNumberChromosome<F>> {
        let data = chromosome_copy_number(self.data.clone())?;
        Ok(CopyNumberChromosome::from_normalized(data))
    }

    /// Adds the window midpoint as `position` and the chromosome rank as
    /// `chr_number`, sorted by both.
    pub fn manhattan_plot_preprocess(&self) -> Result<F> {
        let data = self.data.clone().into_lazy().with_column(
            (CnColumns::Start.col() + CnColumns::End.col())
                .floor_div(lit(2i64))
                .cast(CnColumns::Position.dtype())
                .alias(CnColumns::Position.as_str()),
        );
        let data = join_chromosome_rank(data, CnColumns::ChrNumber.as_str())?
            .with_column(
                CnColumns::ChrNumber
                    .col()
                    .cast(CnColumns::ChrNumber.dtype()),
            )
            .sort_by_exprs(
                [CnColumns::ChrNumber.col(), CnColumns::Position.col()],
                SortMultipleOptions::default().with_maintain_order(true),
            );
        Ok(F::from_lazy(data)?)
    }

    /// Manhattan plot of the window copy numbers with the default
    /// configuration.
    pub fn manhattan_plot(&self) -> Result<ManhattanPlot> {
        self.manhattan_plot_with(ManhattanConfig::default(), &CumulativeLayout)
    }

    /// Manhattan plot with an explicit configuration and point layout.
    pub fn manhattan_plot_with<L: TraceLayout>(
        &self,
        config: ManhattanConfig,
        layout: &L,
    ) -> Result<ManhattanPlot> {
        let data = self.manhattan_plot_preprocess()?.collect_df()?;
        info!("Laying out {} windows for the Manhattan plot", data.height());
        ManhattanPlot::try_new(&data, config, layout)
    }
}

impl<F: PolarsFrame> CopyNumber for CopyNumberWindow<F> {
    type Frame = F;

    const REGION_COLS: &'static [&'static str] = &[
        CnColumns::Chr.as_str(),
        CnColumns::Start.as_str(),
        CnColumns::End.as_str(),
    ];

    fn data(&self) -> &F {
        &self.data
    }

    fn from_normalized(data: F) -> Self {
        Self { data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows() -> DataFrame {
        df!(
            "chr" => ["chr2", "chr1", "chr1", "chrMT"],
            "start" => [0i64, 100, 0, 0],
            "end" => [99i64, 199, 99, 99],
            "copy_number" => [3.0f64, 1.0, 2.0, 5.0]
        )
        .unwrap()
    }

    #[test]
    fn test_manhattan_plot_preprocess() {
        let cn = CopyNumberWindow::from_frame(windows()).unwrap();
        let data = cn.manhattan_plot_preprocess().unwrap();

        let position = data.column("position").unwrap().i64().unwrap();
        assert_eq!(position.into_no_null_iter().collect::<Vec<_>>(), vec![
            49, 149, 49
        ]);
        let chr_number = data.column("chr_number").unwrap().u8().unwrap();
        assert_eq!(chr_number.into_no_null_iter().collect::<Vec<_>>(), vec![
            1, 1, 2
        ]);
    }

    #[test]
    fn test_to_chromosome() {
        let cn = CopyNumberWindow::from_frame(windows().lazy()).unwrap();
        let chromosome = cn.to_chromosome().unwrap().collect().unwrap();
        let data = chromosome.data();
        assert_eq!(data.height(), 2);
        let copy_number = data.column("copy_number").unwrap().f32().unwrap();
        assert_eq!(copy_number.get(0), Some(1.5));
        assert_eq!(copy_number.get(1), Some(3.0));
        let integer = data.column("integer_copy_number").unwrap().i32().unwrap();
        assert_eq!(integer.get(0), Some(2));
    }

    #[test]
    fn test_requires_coordinates() {
        let err =
            CopyNumberWindow::try_new(windows(), &CopyNumberConfig::chromosome())
                .unwrap_err();
        assert!(matches!(err, CnvError::InvalidArgument(_)));
    }
}
