//! Benchmark runner configuration.
//!
//! Defaults reproduce the classic demo sizes. Any field can be overridden
//! through a `CACHEBLOCK_*` environment variable, which keeps quick runs
//! (`CACHEBLOCK_MATMUL_N=256 cargo run --release`) a one-liner.

use std::str::FromStr;

use crate::error::{Result, config_error, invalid_parameter};
use crate::probe::STANDARD_STRIDES;

/// Where results go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned tables on stdout.
    Console,
    /// `log::info!` records.
    Log,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "console" => Ok(ReportFormat::Console),
            "log" => Ok(ReportFormat::Log),
            other => Err(format!("expected `console` or `log`, got `{}`", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BenchConfig {
    /// Edge of the square matrices for naive vs blocked multiply.
    pub matmul_n: usize,
    /// Tile edge for the blocked kernels.
    pub block: usize,
    /// Edge of the square matrix for the transpose comparison.
    pub transpose_n: usize,
    /// Edge of the square matrices for blocked vs cache-oblivious multiply.
    pub oblivious_n: usize,
    /// Probe buffer length, in `f32` elements.
    pub probe_len: usize,
    /// Particle count for the AoS vs SoA update.
    pub particles: usize,
    /// Record count for the padded vs aligned sum.
    pub records: usize,
    pub strides: Vec<usize>,
    /// Tolerance for multiply verification.
    pub epsilon: f32,
    pub seed: u64,
    pub report: ReportFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            matmul_n: 1024,
            block: 64,
            transpose_n: 4096,
            oblivious_n: 512,
            probe_len: 64 * 1024 * 1024,
            particles: 1_000_000,
            records: 1_000_000,
            strides: STANDARD_STRIDES.to_vec(),
            epsilon: 1e-5,
            seed: 42,
            report: ReportFormat::Console,
        }
    }
}

impl BenchConfig {
    /// Defaults overridden by whatever `CACHEBLOCK_*` variables are set,
    /// then validated.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = BenchConfig::default();
        override_parsed(&lookup, "CACHEBLOCK_MATMUL_N", &mut cfg.matmul_n)?;
        override_parsed(&lookup, "CACHEBLOCK_BLOCK", &mut cfg.block)?;
        override_parsed(&lookup, "CACHEBLOCK_TRANSPOSE_N", &mut cfg.transpose_n)?;
        override_parsed(&lookup, "CACHEBLOCK_OBLIVIOUS_N", &mut cfg.oblivious_n)?;
        override_parsed(&lookup, "CACHEBLOCK_PROBE_LEN", &mut cfg.probe_len)?;
        override_parsed(&lookup, "CACHEBLOCK_PARTICLES", &mut cfg.particles)?;
        override_parsed(&lookup, "CACHEBLOCK_RECORDS", &mut cfg.records)?;
        override_parsed(&lookup, "CACHEBLOCK_EPSILON", &mut cfg.epsilon)?;
        override_parsed(&lookup, "CACHEBLOCK_SEED", &mut cfg.seed)?;
        override_parsed(&lookup, "CACHEBLOCK_REPORT", &mut cfg.report)?;

        if let Some(raw) = lookup("CACHEBLOCK_STRIDES") {
            cfg.strides = raw
                .split(',')
                .map(|s| s.trim().parse::<usize>())
                .collect::<std::result::Result<Vec<usize>, _>>()
                .map_err(|e| config_error("CACHEBLOCK_STRIDES", raw.as_str(), e.to_string()))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Rejects zero sizes, a zero block or stride, and a negative or
    /// non-finite epsilon.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("matmul_n", self.matmul_n),
            ("block", self.block),
            ("transpose_n", self.transpose_n),
            ("oblivious_n", self.oblivious_n),
            ("probe_len", self.probe_len),
            ("particles", self.particles),
            ("records", self.records),
        ];
        for (name, v) in sizes {
            if v == 0 {
                return Err(invalid_parameter(name, v, "must be at least 1"));
            }
        }
        if self.strides.is_empty() {
            return Err(invalid_parameter("strides", "[]", "need at least one stride"));
        }
        if let Some(&s) = self.strides.iter().find(|&&s| s == 0) {
            return Err(invalid_parameter("stride", s, "must be at least 1"));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(invalid_parameter(
                "epsilon",
                self.epsilon,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

fn override_parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, slot: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = lookup(key) {
        *slot = raw
            .trim()
            .parse()
            .map_err(|e: T::Err| config_error(key, raw.as_str(), e.to_string()))?;
        log::debug!("{} overridden to {}", key, raw.trim());
    }
    Ok(())
}
