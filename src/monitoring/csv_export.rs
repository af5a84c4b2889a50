// monitoring/csv_export.rs

use crate::error::StorageError;
use crate::pipeline::recorder::EventRecorder;
use crate::shared_data::TrafficEvent;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One flat CSV row per traffic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEventRecord {
    pub timestamp: String,
    pub device_id: String,
    pub location: String,
    pub vehicle_count: u32,
    pub average_speed_kmh: u32,
    pub congestion_level: String,
    pub congestion_percentage: f64,
    pub processed_by: String,
    pub edge_to_fog_latency_ms: u32,
    pub forwarded_to_cloud: bool,
    pub fog_to_cloud_latency_ms: Option<u32>,
    pub cloud_action: Option<String>,
    pub cloud_recommendation: Option<String>,
}

impl From<&TrafficEvent> for TrafficEventRecord {
    fn from(event: &TrafficEvent) -> Self {
        Self {
            timestamp: event
                .reading
                .timestamp
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            device_id: event.reading.device_id.clone(),
            location: event.reading.location.clone(),
            vehicle_count: event.reading.vehicle_count,
            average_speed_kmh: event.reading.average_speed_kmh,
            congestion_level: event.classification.congestion_level.to_string(),
            congestion_percentage: event.classification.congestion_percentage,
            processed_by: event.processed_by.clone(),
            edge_to_fog_latency_ms: event.routing.edge_to_fog_latency_ms,
            forwarded_to_cloud: event.routing.forwarded_to_cloud,
            fog_to_cloud_latency_ms: event.routing.fog_to_cloud_latency_ms,
            cloud_action: event.analytics.as_ref().map(|a| a.action.to_string()),
            cloud_recommendation: event.analytics.as_ref().map(|a| a.recommendation.clone()),
        }
    }
}

// Appends one record, writing the header only when the file is new.
fn append_to_csv<T: Serialize>(path: &Path, record: &T) -> Result<(), StorageError> {
    let file_exists = path.exists();
    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(!file_exists)
        .from_writer(file);
    wtr.serialize(record)?;
    wtr.flush()?;
    Ok(())
}

/// Appends every recorded event to a CSV file.
#[derive(Debug)]
pub struct CsvEventLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvEventLog {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventRecorder for CsvEventLog {
    fn record(&self, event: &TrafficEvent) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("CSV writer lock poisoned".to_string()))?;
        append_to_csv(&self.path, &TrafficEventRecord::from(event))
    }
}

/// Writes a full export, replacing whatever was at `path`. Returns the row count.
pub fn export_events<P: AsRef<Path>>(path: P, events: &[TrafficEvent]) -> Result<usize, StorageError> {
    let file = File::create(path.as_ref())?;
    let mut wtr = csv::Writer::from_writer(file);
    for event in events {
        wtr.serialize(TrafficEventRecord::from(event))?;
    }
    wtr.flush()?;
    log::info!(
        "[Export] wrote {} events to {}",
        events.len(),
        path.as_ref().display()
    );
    Ok(events.len())
}

pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<TrafficEventRecord>, StorageError> {
    let mut rdr = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: TrafficEventRecord = result?;
        records.push(record);
    }
    Ok(records)
}
