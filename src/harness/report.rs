//! Result sinks.
//!
//! Kernels and probes only produce [`BenchmarkResult`]s and
//! [`Comparison`]s; presentation is the reporter's job.

use std::io::{self, Write};

use super::compare::Comparison;
use super::result::BenchmarkResult;

/// Receives finished runs and comparisons.
pub trait Reporter {
    /// A single run, e.g. one stride of the access probe.
    fn run(&mut self, result: &BenchmarkResult) -> io::Result<()>;

    /// A baseline-versus-candidate comparison under a section title.
    fn comparison(&mut self, title: &str, cmp: &Comparison) -> io::Result<()>;

    /// Called once after the last result.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Emits every result as a `log::info!` record with `key=value` fields.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn run(&mut self, r: &BenchmarkResult) -> io::Result<()> {
        log::info!(
            "run name={:?} elapsed_ms={:.4} throughput={} checksum={} verdict={}",
            r.name,
            r.millis(),
            opt(r.throughput),
            opt(r.checksum),
            opt(r.verdict)
        );
        Ok(())
    }

    fn comparison(&mut self, title: &str, cmp: &Comparison) -> io::Result<()> {
        log::info!(
            "compare title={:?} baseline={:?} baseline_ms={:.4} candidate={:?} candidate_ms={:.4} speedup={} verdict={}",
            title,
            cmp.baseline.name,
            cmp.baseline.millis(),
            cmp.candidate.name,
            cmp.candidate.millis(),
            opt(cmp.speedup().map(|s| format!("{:.2}", s))),
            opt(cmp.verdict)
        );
        Ok(())
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Plain-text tables, one section per comparison plus a closing summary.
pub struct ConsoleReporter<W: Write> {
    out: W,
    rows: Vec<(String, Comparison)>,
}

impl ConsoleReporter<io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleReporter::new(io::stdout())
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter {
            out,
            rows: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, r: &BenchmarkResult) -> io::Result<()> {
        write!(self.out, "{:>24}: {:10.4} ms", r.name, r.millis())?;
        if let Some(t) = r.throughput {
            write!(self.out, "  {:>14}", t.to_string())?;
        }
        if let Some(c) = r.checksum {
            write!(self.out, "  (sum: {:.1})", c)?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn run(&mut self, result: &BenchmarkResult) -> io::Result<()> {
        self.line(result)
    }

    fn comparison(&mut self, title: &str, cmp: &Comparison) -> io::Result<()> {
        writeln!(self.out, "\n=== {} ===", title)?;
        self.line(&cmp.baseline)?;
        self.line(&cmp.candidate)?;
        if let Some(s) = cmp.speedup() {
            writeln!(self.out, "{:>24}: {:.2}×", "Speedup", s)?;
        }
        match cmp.verdict {
            Some(v) if v.passed() => writeln!(self.out, "✓ Results match!")?,
            Some(v) => writeln!(self.out, "✗ Results differ: {}", v)?,
            None => {}
        }
        self.rows.push((title.to_string(), cmp.clone()));
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.rows.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "\n{}", "=".repeat(90))?;
        writeln!(self.out, "SUMMARY")?;
        writeln!(self.out, "{}", "=".repeat(90))?;
        writeln!(
            self.out,
            "\n{:<32} {:>14} {:>14} {:>10} {:>12}",
            "Comparison", "Baseline ms", "Candidate ms", "Speedup", "Verdict"
        )?;
        writeln!(self.out, "{}", "-".repeat(90))?;
        for (title, cmp) in &self.rows {
            writeln!(
                self.out,
                "{:<32} {:>14.2} {:>14.2} {:>9}× {:>12}",
                title,
                cmp.baseline.millis(),
                cmp.candidate.millis(),
                opt(cmp.speedup().map(|s| format!("{:.2}", s))),
                opt(cmp.verdict.map(|v| if v.passed() { "match" } else { "DIVERGED" }))
            )?;
        }
        writeln!(self.out, "{}", "=".repeat(90))?;
        writeln!(
            self.out,
            "\nSpeedup is baseline time / candidate time. Higher is better.\n"
        )?;
        self.out.flush()
    }
}
