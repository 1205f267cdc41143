use polars::prelude::*;

/// Canonical column names of normalized copy number and CNV tables.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum CnColumns {
    Chr,
    Start,
    End,
    CopyNumber,
    IntegerCopyNumber,
    CnvType,
    /// Window midpoint, only present in Manhattan plot data.
    Position,
    /// Chromosome rank, only present in Manhattan plot data.
    ChrNumber,
}

impl CnColumns {
    /// Returns the string representation of the column name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CnColumns::Chr => "chr",
            CnColumns::Start => "start",
            CnColumns::End => "end",
            CnColumns::CopyNumber => "copy_number",
            CnColumns::IntegerCopyNumber => "integer_copy_number",
            CnColumns::CnvType => "cnv_type",
            CnColumns::Position => "position",
            CnColumns::ChrNumber => "chr_number",
        }
    }

    /// Returns the Polars DataType for the column.
    pub const fn dtype(&self) -> DataType {
        match self {
            CnColumns::Chr => DataType::String,
            CnColumns::Start => DataType::Int64,
            CnColumns::End => DataType::Int64,
            CnColumns::CopyNumber => DataType::Float32,
            CnColumns::IntegerCopyNumber => DataType::Int32,
            CnColumns::CnvType => {
                DataType::Categorical(None, CategoricalOrdering::Lexical)
            },
            CnColumns::Position => DataType::Int64,
            CnColumns::ChrNumber => DataType::UInt8,
        }
    }

    /// Column names of a window-level copy number table.
    pub const fn window_colnames() -> [&'static str; 5] {
        [
            CnColumns::Chr.as_str(),
            CnColumns::Start.as_str(),
            CnColumns::End.as_str(),
            CnColumns::CopyNumber.as_str(),
            CnColumns::IntegerCopyNumber.as_str(),
        ]
    }

    /// Column names of a chromosome-level copy number table.
    pub const fn chromosome_colnames() -> [&'static str; 3] {
        [
            CnColumns::Chr.as_str(),
            CnColumns::CopyNumber.as_str(),
            CnColumns::IntegerCopyNumber.as_str(),
        ]
    }

    /// Column names of a CNV table.
    pub const fn cnv_colnames() -> [&'static str; 4] {
        [
            CnColumns::Chr.as_str(),
            CnColumns::Start.as_str(),
            CnColumns::End.as_str(),
            CnColumns::CnvType.as_str(),
        ]
    }

    /// Creates a Polars expression (Expr) referencing this column.
    #[inline(always)]
    pub fn col(&self) -> Expr {
        col(self.as_str())
    }
}

impl std::fmt::Display for CnColumns {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
