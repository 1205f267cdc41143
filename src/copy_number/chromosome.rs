use polars::prelude::*;

use super::CopyNumber;
use crate::data_structs::{
    CnColumns,
    PolarsFrame,
};
use crate::error::Result;
use crate::preprocess::{
    copy_number_preprocess,
    CopyNumberConfig,
};

/// Copy numbers of whole chromosomes, one row per `chr`.
#[derive(Debug, Clone)]
pub struct CopyNumberChromosome<F: PolarsFrame = DataFrame> {
    data: F,
}

impl<F: PolarsFrame> CopyNumberChromosome<F> {
    /// Normalizes `data` using the column names of `config`. Coordinate
    /// columns of `config` are ignored.
    pub fn try_new(
        data: F,
        config: &CopyNumberConfig,
    ) -> Result<Self> {
        let config = config.clone().with_start_col(None).with_end_col(None);
        let data = copy_number_preprocess(data, &config)?;
        Ok(Self { data })
    }

    /// Normalizes `data` whose columns already carry the canonical names.
    pub fn from_frame(data: F) -> Result<Self> {
        Self::try_new(data, &CopyNumberConfig::chromosome())
    }

    pub fn into_inner(self) -> F {
        self.data
    }

    pub fn collect(self) -> Result<CopyNumberChromosome<DataFrame>> {
        Ok(CopyNumberChromosome {
            data: self.data.collect_df()?,
        })
    }

    pub fn lazy(self) -> CopyNumberChromosome<LazyFrame> {
        CopyNumberChromosome {
            data: self.data.into_lazy(),
        }
    }
}

impl<F: PolarsFrame> CopyNumber for CopyNumberChromosome<F> {
    type Frame = F;

    const REGION_COLS: &'static [&'static str] = &[CnColumns::Chr.as_str()];

    fn data(&self) -> &F {
        &self.data
    }

    fn from_normalized(data: F) -> Self {
        Self { data }
    }
}
