use polars::prelude::*;

/// A table that is either materialized ([`DataFrame`]) or described lazily
/// ([`LazyFrame`]).
///
/// Every transformation in this crate goes through [`LazyFrame`] and hands
/// the result back in the kind it received, so an eager input yields an
/// eager output and a lazy input stays lazy until the caller collects it.
pub trait PolarsFrame: Clone + Sized {
    /// Converts the frame into a lazy query.
    fn into_lazy(self) -> LazyFrame;

    /// Rebuilds the frame kind from a lazy query. Eager frames collect here.
    fn from_lazy(lazy: LazyFrame) -> PolarsResult<Self>;

    /// Materializes the frame without consuming it.
    fn collect_df(&self) -> PolarsResult<DataFrame>;
}

impl PolarsFrame for DataFrame {
    #[inline(always)]
    fn into_lazy(self) -> LazyFrame {
        self.lazy()
    }

    fn from_lazy(lazy: LazyFrame) -> PolarsResult<Self> {
        lazy.collect()
    }

    fn collect_df(&self) -> PolarsResult<DataFrame> {
        Ok(self.clone())
    }
}

impl PolarsFrame for LazyFrame {
    #[inline(always)]
    fn into_lazy(self) -> LazyFrame {
        self
    }

    #[inline(always)]
    fn from_lazy(lazy: LazyFrame) -> PolarsResult<Self> {
        Ok(lazy)
    }

    fn collect_df(&self) -> PolarsResult<DataFrame> {
        self.clone().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_preserved() {
        let df = df!("a" => [1i64, 2, 3]).unwrap();

        let eager = DataFrame::from_lazy(df.clone().into_lazy()).unwrap();
        assert!(eager.equals(&df));

        let lazy = LazyFrame::from_lazy(df.clone().lazy()).unwrap();
        assert!(lazy.collect_df().unwrap().equals(&df));
    }
}
