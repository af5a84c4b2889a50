// monitoring/cli.rs

use crate::config::PipelineConfig;
use crate::edge::reading_generator::{create_sample_devices, EdgeDevice};
use crate::error::PipelineResult;
use crate::global_variables::{CONGESTION_CHART_PNG, TRAFFIC_EVENTS_CSV};
use crate::monitoring::console_log::{ConsoleLog, LogKind};
use crate::monitoring::csv_export::{export_events, CsvEventLog};
use crate::monitoring::event_store::InMemoryEventStore;
use crate::monitoring::report::render_congestion_chart;
use crate::pipeline::orchestrator::{BatchReport, PipelineOrchestrator};
use crate::pipeline::recorder::{EventRecorder, FanOutRecorder};
use crate::shared_data::TrafficEvent;
use rand::Rng;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the operator console needs: the pipeline, its store and the log.
pub struct MonitoringApp {
    pipeline: PipelineOrchestrator,
    store: Arc<InMemoryEventStore>,
    console: ConsoleLog,
    devices: Vec<EdgeDevice>,
}

impl MonitoringApp {
    /// Records into memory, and also appends to `csv_log` when given.
    pub fn new(config: PipelineConfig, csv_log: Option<PathBuf>) -> PipelineResult<Self> {
        let store = Arc::new(InMemoryEventStore::new(&config.fog_node_id));
        let mut recorder = FanOutRecorder::default();
        recorder.push(store.clone());
        if let Some(path) = csv_log {
            recorder.push(Arc::new(CsvEventLog::new(path)));
        }
        let recorder: Arc<dyn EventRecorder> = Arc::new(recorder);
        let pipeline = PipelineOrchestrator::new(config, recorder)?;

        Ok(Self {
            pipeline,
            store,
            console: ConsoleLog::default(),
            devices: create_sample_devices(),
        })
    }

    pub fn store(&self) -> &InMemoryEventStore {
        &self.store
    }

    pub fn console(&self) -> &ConsoleLog {
        &self.console
    }

    /// Picks a random sample device and pushes one reading through the tiers.
    pub async fn send_edge_data(&mut self) -> PipelineResult<TrafficEvent> {
        let index = rand::rng().random_range(0..self.devices.len());
        let device = self.devices[index].clone();
        match self
            .pipeline
            .run_once(&device.device_id, &device.location)
            .await
        {
            Ok(event) => {
                self.console.push_event(&event);
                Ok(event)
            }
            Err(e) => {
                self.console.push(LogKind::Error, format!("[ERROR] {}", e));
                Err(e)
            }
        }
    }

    pub async fn run_batch(&mut self, n: usize) -> PipelineResult<BatchReport> {
        let locations: Vec<&str> = self.devices.iter().map(|d| d.location.as_str()).collect();
        let report = match self.pipeline.run_batch(n, &locations).await {
            Ok(report) => report,
            Err(e) => {
                self.console.push(LogKind::Error, format!("[ERROR] {}", e));
                return Err(e);
            }
        };
        for outcome in &report.outcomes {
            match &outcome.result {
                Ok(event) => self.console.push_event(event),
                Err(e) => self.console.push(
                    LogKind::Error,
                    format!("[ERROR] {}: {}", outcome.device_id, e),
                ),
            }
        }
        Ok(report)
    }

    pub fn print_stats(&self) {
        println!("\nEdge Devices:");
        for device in &self.devices {
            println!("  {}", device.info());
        }

        let fog = self.store.fog_stats();
        println!("\nFog Node {}:", fog.node_id);
        println!("  Processed: {}", fog.total_processed);
        println!("  Forwarded to cloud: {}", fog.forwarded_to_cloud);
        println!("  Filtered locally: {}", fog.filtered_locally);
        println!("  Cloud reduction: {:.2}%", fog.cloud_reduction_percentage);

        let cloud = self.store.cloud_summary();
        println!("\nCloud:");
        println!("  Records: {}", cloud.total_records);
        println!("  Average of last 10: {:.2}", cloud.average_last_10);
        if let Some(trend) = cloud.latest_trend {
            println!("  Latest trend: {:?}", trend);
        }
        if let Some(analytics) = cloud.latest_analytics {
            println!(
                "  Latest action: {} ({})",
                analytics.action, analytics.recommendation
            );
        }

        println!("\nCongestion levels:");
        for (level, count) in self.store.level_counts() {
            println!("  {}: {}", level, count);
        }
    }

    pub fn print_console(&self) {
        if self.console.is_empty() {
            println!("Console is empty.");
            return;
        }
        for entry in self.console.entries() {
            println!("{} [{:?}] {}", entry.timestamp, entry.kind, entry.message);
        }
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
    }

    pub fn clear_events(&mut self) {
        self.store.clear_all();
        self.console.push(LogKind::Warning, "[STORE] All traffic events cleared");
    }
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    if stdout().flush().is_err() {
        return None;
    }
    let mut input = String::new();
    match stdin().read_line(&mut input) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(input.trim().to_string()),
    }
}

fn print_event(event: &TrafficEvent) {
    println!(
        "{} | {} vehicles at {} | {} ({:.1}%) | {} | {}ms",
        event.reading.device_id,
        event.reading.vehicle_count,
        event.reading.location,
        event.classification.congestion_level,
        event.classification.congestion_percentage,
        event.flow(),
        event.total_latency_ms()
    );
    if let Some(analytics) = &event.analytics {
        println!("    Cloud: {} - {}", analytics.action, analytics.recommendation);
    }
}

/// Interactive operator menu. Returns when the operator exits or stdin closes.
pub async fn run_cli(mut app: MonitoringApp) {
    loop {
        println!("\nEdge → Fog → Cloud Traffic Monitor");
        println!("1. Send data from a random edge device");
        println!("2. Run a multi-device batch");
        println!("3. Show statistics");
        println!("4. Show console log");
        println!("5. Clear console log");
        println!("6. Export events to CSV");
        println!("7. Render congestion chart");
        println!("8. Clear all events");
        println!("9. Exit");
        let Some(input) = prompt("Enter your choice: ") else {
            break;
        };
        let choice = input.parse::<u32>().unwrap_or(0);
        match choice {
            1 => match app.send_edge_data().await {
                Ok(event) => print_event(&event),
                Err(e) => eprintln!("Error processing reading: {}", e),
            },
            2 => {
                let max = app.pipeline.config().max_batch_size;
                let n = prompt(&format!("Number of devices (1-{}): ", max))
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(0);
                match app.run_batch(n).await {
                    Ok(report) => {
                        for outcome in &report.outcomes {
                            match &outcome.result {
                                Ok(event) => print_event(event),
                                Err(e) => println!("{} failed: {}", outcome.device_id, e),
                            }
                        }
                    }
                    Err(e) => eprintln!("Error running batch: {}", e),
                }
            }
            3 => app.print_stats(),
            4 => app.print_console(),
            5 => {
                app.clear_console();
                println!("Console cleared.");
            }
            6 => match export_events(TRAFFIC_EVENTS_CSV, &app.store.events()) {
                Ok(count) => println!("Exported {} events to {}", count, TRAFFIC_EVENTS_CSV),
                Err(e) => eprintln!("Error exporting events: {}", e),
            },
            7 => match render_congestion_chart(CONGESTION_CHART_PNG, &app.store.events()) {
                Ok(()) => println!("Congestion chart saved to {}", CONGESTION_CHART_PNG),
                Err(e) => eprintln!("Error rendering chart: {}", e),
            },
            8 => {
                app.clear_events();
                println!("All events cleared.");
            }
            9 => {
                println!("Exiting CLI.");
                break;
            }
            _ => println!("Invalid choice. Try again."),
        }
    }
}
