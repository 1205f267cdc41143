#![allow(dead_code)]

use cnvtools::data_structs::CHROMOSOME_NAMES;
use polars::prelude::*;

pub fn init_logger() {
    let _ = pretty_env_logger::formatted_builder()
        .is_test(true)
        .try_init();
}

/// Window copy number profiles covering the canonical chromosomes.
pub struct DemoProfileBuilder {
    chromosomes:     Vec<&'static str>,
    windows_per_chr: usize,
    window_size:     i64,
    chr_prefix:      &'static str,
}

impl DemoProfileBuilder {
    pub fn new(
        windows_per_chr: usize,
        window_size: i64,
    ) -> Self {
        Self {
            chromosomes: CHROMOSOME_NAMES.to_vec(),
            windows_per_chr,
            window_size,
            chr_prefix: "chr",
        }
    }

    pub fn without(
        mut self,
        chr: &str,
    ) -> Self {
        self.chromosomes.retain(|name| *name != chr);
        self
    }

    pub fn with_prefix(
        mut self,
        prefix: &'static str,
    ) -> Self {
        self.chr_prefix = prefix;
        self
    }

    /// Columns `chr`, `start`, `end`, `copy_number`. Chromosomes are emitted
    /// in reverse order and window copy numbers follow `copy_number(chr_idx,
    /// window_idx)`.
    pub fn build<C: Fn(usize, usize) -> f64>(
        &self,
        copy_number: C,
    ) -> DataFrame {
        let mut chr = Vec::new();
        let mut start = Vec::new();
        let mut end = Vec::new();
        let mut values = Vec::new();
        for (chr_idx, name) in self.chromosomes.iter().enumerate().rev() {
            for window in 0..self.windows_per_chr {
                chr.push(format!("{}{}", self.chr_prefix, name));
                start.push(window as i64 * self.window_size);
                end.push((window as i64 + 1) * self.window_size - 1);
                values.push(copy_number(chr_idx, window));
            }
        }
        df!(
            "chr" => chr,
            "start" => start,
            "end" => end,
            "copy_number" => values
        )
        .expect("valid demo frame")
    }
}
