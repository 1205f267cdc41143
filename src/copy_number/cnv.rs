use polars::prelude::*;

use super::region_frame;
use crate::data_structs::{
    CnColumns,
    PolarsFrame,
};
use crate::error::{
    CnvError,
    Result,
};
use crate::preprocess::{
    cnv_preprocess,
    CnvConfig,
};
use crate::utils::{
    Average,
    Score,
};

const REGION_COLS: [&str; 3] = [
    CnColumns::Chr.as_str(),
    CnColumns::Start.as_str(),
    CnColumns::End.as_str(),
];

/// Called copy number variations: `gain` / `loss` segments.
///
/// Scores between two CNV call sets have no agreed definition yet and
/// return [`CnvError::Unimplemented`].
#[derive(Debug, Clone)]
pub struct Cnv<F: PolarsFrame = DataFrame> {
    data: F,
}

impl<F: PolarsFrame> Cnv<F> {
    pub fn try_new(
        data: F,
        config: &CnvConfig,
    ) -> Result<Self> {
        let data = cnv_preprocess(data, config)?;
        Ok(Self { data })
    }

    pub fn from_frame(data: F) -> Result<Self> {
        Self::try_new(data, &CnvConfig::default())
    }

    pub fn data(&self) -> &F {
        &self.data
    }

    pub fn into_inner(self) -> F {
        self.data
    }

    pub fn collect(self) -> Result<Cnv<DataFrame>> {
        Ok(Cnv {
            data: self.data.collect_df()?,
        })
    }

    pub fn lazy(self) -> Cnv<LazyFrame> {
        Cnv {
            data: self.data.into_lazy(),
        }
    }

    /// Returns `true` when both call sets hold the same segments in the
    /// same order.
    pub fn region_consistency_check(
        cnv_x: &Self,
        cnv_y: &Self,
    ) -> Result<bool> {
        let x = region_frame(&cnv_x.data, &REGION_COLS)?;
        let y = region_frame(&cnv_y.data, &REGION_COLS)?;
        Ok(x.equals_missing(&y))
    }

    pub fn accuracy_score(
        _cnv_true: &Self,
        _cnv_pred: &Self,
    ) -> Result<f64> {
        Err(CnvError::Unimplemented("accuracy_score"))
    }

    pub fn recall_score(
        _cnv_true: &Self,
        _cnv_pred: &Self,
        _average: Option<Average>,
    ) -> Result<Score> {
        Err(CnvError::Unimplemented("recall_score"))
    }

    pub fn precision_score(
        _cnv_true: &Self,
        _cnv_pred: &Self,
        _average: Option<Average>,
    ) -> Result<Score> {
        Err(CnvError::Unimplemented("precision_score"))
    }

    pub fn difference_std(
        _cnv_true: &Self,
        _cnv_pred: &Self,
    ) -> Result<f64> {
        Err(CnvError::Unimplemented("difference_std"))
    }

    pub fn mean(_cnvs: &[Self]) -> Result<Self> {
        Err(CnvError::Unimplemented("mean"))
    }
}
