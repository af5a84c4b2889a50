// monitoring/mod.rs
pub mod cli;
pub mod console_log;
pub mod csv_export;
pub mod event_store;
pub mod report;

pub use cli::{run_cli, MonitoringApp};
pub use console_log::{narrate, ConsoleEntry, ConsoleLog, LogKind};
pub use csv_export::{export_events, read_records, CsvEventLog, TrafficEventRecord};
pub use event_store::{CloudSummary, FogStats, InMemoryEventStore, Trend};
pub use report::{draw_congestion_chart, level_totals, render_congestion_chart, ReportError};
