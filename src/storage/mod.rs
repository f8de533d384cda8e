//! Batch result persistence and timing summary
//!
//! The results file is a JSON array with one record per line, rewritten in
//! full after every instance: a batch killed mid-run loses at most the
//! instance in flight, and a restarted batch counts the records already on
//! disk and resumes after them.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use statrs::statistics::{Data, Distribution, Median};

use crate::harness::InstanceReport;

/// Load previously persisted results, or an empty batch if the file is
/// missing or empty (a fresh run).
pub fn load_results(path: &Path) -> Result<Vec<InstanceReport>> {
    if !path.is_file() || fs::metadata(path)?.len() == 0 {
        return Ok(Vec::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading results file {}", path.display()))?;
    let results: Vec<InstanceReport> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing results file {}", path.display()))?;
    Ok(results)
}

/// Write the whole batch, one record per line.
pub fn write_results(path: &Path, results: &[InstanceReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut file = File::create(path)
        .with_context(|| format!("creating results file {}", path.display()))?;
    file.write_all(b"[\n")?;
    for (i, report) in results.iter().enumerate() {
        let line = serde_json::to_string(report)?;
        file.write_all(line.as_bytes())?;
        if i + 1 == results.len() {
            file.write_all(b"\n]")?;
        } else {
            file.write_all(b",\n")?;
        }
    }
    if results.is_empty() {
        file.write_all(b"]")?;
    }
    Ok(())
}

/// Aggregate solve-time statistics for one model across a batch
#[derive(Debug, Clone)]
pub struct TimingSummary {
    /// Formulation name
    pub model: String,
    /// Median solve seconds
    pub median: f64,
    /// Mean solve seconds
    pub mean: f64,
    /// Standard deviation of solve seconds
    pub std_dev: f64,
}

/// Summarize per-model solve times across a batch, in first-seen model order
pub fn timing_summary(results: &[InstanceReport]) -> Vec<TimingSummary> {
    let mut order: Vec<String> = Vec::new();
    let mut times: Vec<Vec<f64>> = Vec::new();
    for report in results {
        for model in &report.models {
            match order.iter().position(|name| *name == model.name) {
                Some(idx) => times[idx].push(model.seconds),
                None => {
                    order.push(model.name.clone());
                    times.push(vec![model.seconds]);
                }
            }
        }
    }

    order
        .into_iter()
        .zip(times)
        .map(|(model, seconds)| {
            let data = Data::new(seconds);
            TimingSummary {
                model,
                median: data.median(),
                mean: data.mean().unwrap_or(0.0),
                std_dev: data.std_dev().unwrap_or(0.0),
            }
        })
        .collect()
}
