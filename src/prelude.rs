pub use crate::copy_number::{
    accuracy_score,
    correlation_coefficient,
    difference_std,
    mean,
    precision_score,
    recall_score,
    region_consistency_check,
    Cnv,
    CopyNumber,
    CopyNumberChromosome,
    CopyNumberWindow,
    CorrelationMethod,
};
pub use crate::data_structs::{
    chromosome_name,
    chromosome_rank,
    CnColumns,
    PolarsFrame,
    CHROMOSOME_NAMES,
};
pub use crate::error::CnvError;
pub use crate::plots::{
    integers_to_intervals,
    ChromosomeTrace,
    CumulativeLayout,
    LineSegment,
    ManhattanConfig,
    ManhattanPlot,
    PositionConverter,
    TraceLayout,
};
pub use crate::preprocess::{
    chromosome_copy_number,
    cnv_preprocess,
    copy_number_preprocess,
    CnvConfig,
    CopyNumberConfig,
};
pub use crate::utils::{
    Average,
    Score,
};
