// pipeline/mod.rs
pub mod orchestrator;
pub mod recorder;

pub use orchestrator::{
    batch_device_id, default_random_factory, device_seed, BatchReport, DeviceOutcome,
    PipelineOrchestrator, RandomFactory,
};
pub use recorder::{DiscardRecorder, EventRecorder, FanOutRecorder};
