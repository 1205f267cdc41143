use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::CnColumns;
use crate::with_field_fn;

/// Names of the input columns holding copy number information.
///
/// `start_col` or `end_col` set to `None` describes chromosome-level data
/// without coordinates. When both name the same column it is copied into
/// both `start` and `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyNumberConfig {
    pub chr_col:         String,
    pub start_col:       Option<String>,
    pub end_col:         Option<String>,
    pub copy_number_col: String,
}

impl CopyNumberConfig {
    with_field_fn!(chr_col, String);
    with_field_fn!(start_col, Option<String>);
    with_field_fn!(end_col, Option<String>);
    with_field_fn!(copy_number_col, String);

    /// Defaults for chromosome-level tables: no coordinate columns.
    pub fn chromosome() -> Self {
        Self {
            start_col: None,
            end_col: None,
            ..Default::default()
        }
    }

    /// Both coordinate columns are set.
    pub fn has_coordinates(&self) -> bool {
        self.start_col.is_some() && self.end_col.is_some()
    }
}

impl Default for CopyNumberConfig {
    fn default() -> Self {
        Self {
            chr_col:         CnColumns::Chr.as_str().to_string(),
            start_col:       Some(CnColumns::Start.as_str().to_string()),
            end_col:         Some(CnColumns::End.as_str().to_string()),
            copy_number_col: CnColumns::CopyNumber.as_str().to_string(),
        }
    }
}

/// Names of the input columns of a CNV table and the labels used for gains
/// and losses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CnvConfig {
    pub chr_col:      String,
    pub start_col:    String,
    pub end_col:      String,
    pub cnv_type_col: String,
    pub gain_value:   String,
    pub loss_value:   String,
}

impl CnvConfig {
    with_field_fn!(chr_col, String);
    with_field_fn!(start_col, String);
    with_field_fn!(end_col, String);
    with_field_fn!(cnv_type_col, String);
    with_field_fn!(gain_value, String);
    with_field_fn!(loss_value, String);
}

impl Default for CnvConfig {
    fn default() -> Self {
        Self {
            chr_col:      CnColumns::Chr.as_str().to_string(),
            start_col:    CnColumns::Start.as_str().to_string(),
            end_col:      CnColumns::End.as_str().to_string(),
            cnv_type_col: CnColumns::CnvType.as_str().to_string(),
            gain_value:   "gain".to_string(),
            loss_value:   "loss".to_string(),
        }
    }
}
