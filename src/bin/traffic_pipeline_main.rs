// traffic_pipeline_main.rs
use fog_traffic_pipeline::edge::create_sample_devices;
use fog_traffic_pipeline::global_variables::TRAFFIC_EVENTS_CSV;
use fog_traffic_pipeline::monitoring::{CsvEventLog, InMemoryEventStore};
use fog_traffic_pipeline::pipeline::{EventRecorder, FanOutRecorder, PipelineOrchestrator};
use fog_traffic_pipeline::{PipelineConfig, PipelineResult};
use std::sync::Arc;

async fn run() -> PipelineResult<()> {
    let config = PipelineConfig::load_or_default(std::env::args().nth(1))?;
    let batch_size = config.max_batch_size;

    let store = Arc::new(InMemoryEventStore::new(&config.fog_node_id));
    let memory: Arc<dyn EventRecorder> = store.clone();
    let csv_log: Arc<dyn EventRecorder> = Arc::new(CsvEventLog::new(TRAFFIC_EVENTS_CSV));
    let recorder: Arc<dyn EventRecorder> = Arc::new(FanOutRecorder::new(vec![memory, csv_log]));
    let pipeline = PipelineOrchestrator::new(config, recorder)?;

    let locations: Vec<String> = create_sample_devices()
        .into_iter()
        .map(|d| d.location)
        .collect();
    let report = pipeline.run_batch(batch_size, &locations).await?;

    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(event) => println!(
                "{} @ {}: {} vehicles, {} ({:.1}%), {}{}",
                outcome.device_id,
                outcome.location,
                event.reading.vehicle_count,
                event.classification.congestion_level,
                event.classification.congestion_percentage,
                event.flow(),
                event
                    .analytics
                    .as_ref()
                    .map(|a| format!(" -> {}", a.action))
                    .unwrap_or_default()
            ),
            Err(e) => eprintln!("{} @ {} failed: {}", outcome.device_id, outcome.location, e),
        }
    }

    let stats = store.fog_stats();
    println!(
        "Fog {}: processed {}, forwarded {}, filtered {} ({:.2}% cloud reduction)",
        stats.node_id,
        stats.total_processed,
        stats.forwarded_to_cloud,
        stats.filtered_locally,
        stats.cloud_reduction_percentage
    );
    println!("Events appended to {}", TRAFFIC_EVENTS_CSV);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    println!("Starting edge → fog → cloud pipeline...");
    if let Err(e) = run().await {
        eprintln!("Pipeline error: {}", e);
        std::process::exit(1);
    }
}
