use crate::error::BenchError;
use crate::scanner::{Scanner, TokenType};
use std::fmt;
use std::time::{Duration, Instant};

/// Mix of keywords, operators, literals and identifiers.
const PATTERN: &str = "var x = 123.45 + variable; if (true) return null; ";

/// Repeats the benchmark pattern `iterations` times. Fails instead of
/// aborting when the source cannot be sized or allocated.
pub fn generate_source(iterations: usize) -> Result<String, BenchError> {
    let bytes = PATTERN
        .len()
        .checked_mul(iterations)
        .ok_or(BenchError::SourceTooLarge { iterations })?;

    let mut source = String::new();
    source
        .try_reserve_exact(bytes)
        .map_err(|_| BenchError::OutOfMemory { bytes })?;
    for _ in 0..iterations {
        source.push_str(PATTERN);
    }
    Ok(source)
}

#[derive(Debug, Clone, Copy)]
pub struct BenchReport {
    pub bytes: usize,
    pub tokens: usize,
    pub elapsed: Duration,
}

impl BenchReport {
    pub fn megabytes_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return f64::INFINITY;
        }
        (self.bytes as f64 / 1024.0 / 1024.0) / secs
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "--------------------------------")?;
        writeln!(f, "BENCHMARK COMPLETE")?;
        writeln!(f, "Characters:   {}", self.bytes)?;
        writeln!(f, "Tokens:       {}", self.tokens)?;
        writeln!(f, "Elapsed Time: {:.4} seconds", self.elapsed.as_secs_f64())?;
        writeln!(f, "Throughput:   {:.2} MB/s", self.megabytes_per_second())?;
        write!(f, "--------------------------------")
    }
}

/// Scans `source` to the end, timing only the scan loop.
pub fn measure(source: &str) -> BenchReport {
    let mut scanner = Scanner::new(source);
    let mut tokens = 0;

    let started = Instant::now();
    loop {
        tokens += 1;
        if scanner.scan_token().token_type == TokenType::Eof {
            break;
        }
    }
    let elapsed = started.elapsed();

    BenchReport {
        bytes: source.len(),
        tokens,
        elapsed,
    }
}

pub fn run(iterations: usize) -> Result<BenchReport, BenchError> {
    tracing::info!(iterations, "generating benchmark source");
    let source = generate_source(iterations)?;
    tracing::info!(bytes = source.len(), "starting benchmark");
    Ok(measure(&source))
}
