//! Edge → Fog → Cloud traffic monitoring pipeline.
//!
//! Edge sensors produce synthetic readings, the fog tier classifies congestion
//! and decides whether to escalate, and the cloud tier maps escalated readings
//! to an action. [`pipeline::PipelineOrchestrator`] wires the tiers together and
//! hands every [`shared_data::TrafficEvent`] to an [`pipeline::EventRecorder`].

pub mod cloud;
pub mod config;
pub mod edge;
pub mod error;
pub mod fog;
pub mod global_variables;
pub mod monitoring;
pub mod pipeline;
pub mod shared_data;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult, StorageError};
pub use pipeline::{EventRecorder, PipelineOrchestrator};
pub use shared_data::{
    AnalyticsResult, Classification, CloudAction, CongestionLevel, Reading, RoutingDecision,
    TrafficEvent,
};
