// pipeline/recorder.rs

use crate::error::StorageError;
use crate::shared_data::TrafficEvent;
use std::sync::Arc;

/// The persistence/reporting side of the pipeline. Implementations own any
/// aggregate state and must serialize concurrent `record` calls themselves.
///
/// `record` is synchronous and is called from inside the per-device tokio
/// tasks. File-backed recorders such as `CsvEventLog` block a runtime worker
/// for the duration of one append, which is acceptable for batches bounded
/// by `max_batch_size`.
pub trait EventRecorder: Send + Sync {
    fn record(&self, event: &TrafficEvent) -> Result<(), StorageError>;
}

/// Accepts and drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardRecorder;

impl EventRecorder for DiscardRecorder {
    fn record(&self, _event: &TrafficEvent) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Hands each event to several recorders in order, stopping at the first failure.
#[derive(Clone, Default)]
pub struct FanOutRecorder {
    recorders: Vec<Arc<dyn EventRecorder>>,
}

impl FanOutRecorder {
    pub fn new(recorders: Vec<Arc<dyn EventRecorder>>) -> Self {
        Self { recorders }
    }

    pub fn push(&mut self, recorder: Arc<dyn EventRecorder>) {
        self.recorders.push(recorder);
    }
}

impl EventRecorder for FanOutRecorder {
    fn record(&self, event: &TrafficEvent) -> Result<(), StorageError> {
        for recorder in &self.recorders {
            recorder.record(event)?;
        }
        Ok(())
    }
}
