use crate::routing::estimator::EtaBreakdown;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One displayed estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtaRecord {
    pub timestamp: u64,
    pub route_index: usize,
    pub active: bool,
    pub base_seconds: f64,
    pub penalty_seconds: f64,
    pub red_signals: usize,
    pub total_seconds: f64,
}

impl EtaRecord {
    pub fn new(timestamp: u64, route_index: usize, active: bool, eta: &EtaBreakdown) -> Self {
        Self {
            timestamp,
            route_index,
            active,
            base_seconds: eta.base_seconds,
            penalty_seconds: eta.penalty_seconds,
            red_signals: eta.red_signals,
            total_seconds: eta.total_seconds,
        }
    }
}

/// Aggregate over an ETA history file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EtaReport {
    pub records: usize,
    pub active_records: usize,
    pub mean_active_total_seconds: f64,
    pub max_red_signals: usize,
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Appends a record to a CSV file, writing the header if the file is new.
fn log_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), Box<dyn Error>> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// CSV history of displayed ETAs.
#[derive(Debug, Clone)]
pub struct EtaLog {
    path: PathBuf,
}

impl EtaLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records every estimate of the current candidates. Failures are logged
    /// and otherwise ignored.
    pub fn record_all(&self, estimates: &[EtaBreakdown], active_index: Option<usize>) {
        let timestamp = current_timestamp();
        for (index, eta) in estimates.iter().enumerate() {
            let record = EtaRecord::new(timestamp, index, Some(index) == active_index, eta);
            if let Err(e) = log_to_csv(&self.path, &record) {
                log::error!("Error logging ETA to {}: {}", self.path.display(), e);
                return;
            }
        }
    }

    pub fn read(&self) -> Result<Vec<EtaRecord>, Box<dyn Error>> {
        let file = File::open(&self.path)?;
        let mut rdr = csv::Reader::from_reader(file);
        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: EtaRecord = result?;
            records.push(record);
        }
        Ok(records)
    }
}

pub fn summarize(records: &[EtaRecord]) -> EtaReport {
    let active: Vec<&EtaRecord> = records.iter().filter(|r| r.active).collect();
    let mean_active_total_seconds = if active.is_empty() {
        0.0
    } else {
        active.iter().map(|r| r.total_seconds).sum::<f64>() / active.len() as f64
    };
    EtaReport {
        records: records.len(),
        active_records: active.len(),
        mean_active_total_seconds,
        max_red_signals: records.iter().map(|r| r.red_signals).max().unwrap_or(0),
    }
}
