// pipeline/orchestrator.rs

use crate::cloud::analytics::analyze;
use crate::config::PipelineConfig;
use crate::edge::reading_generator::ReadingGenerator;
use crate::edge::sources::{Clock, RandomSource, SeededRandom, SystemClock, ThreadRandom};
use crate::error::{PipelineError, PipelineResult};
use crate::fog::classifier::CongestionClassifier;
use crate::fog::router::RoutingEngine;
use crate::pipeline::recorder::EventRecorder;
use crate::shared_data::{Reading, TrafficEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

/// Builds the random source for one device, given the orchestrator's run
/// number and the device's index inside that run.
pub type RandomFactory = Arc<dyn Fn(u64, usize) -> Box<dyn RandomSource> + Send + Sync>;

const RUN_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seed for device `index` of run `run`. Distinct runs get unrelated streams.
pub fn device_seed(seed: u64, run: u64, index: usize) -> u64 {
    seed.wrapping_add(run.wrapping_mul(RUN_SEED_STRIDE))
        .wrapping_add(index as u64)
}

/// Seeded runs derive every device's seed from `(seed, run, index)`; unseeded
/// runs use the thread RNG.
pub fn default_random_factory(seed: Option<u64>) -> RandomFactory {
    match seed {
        Some(seed) => Arc::new(move |run: u64, index: usize| -> Box<dyn RandomSource> {
            Box::new(SeededRandom::new(device_seed(seed, run, index)))
        }),
        None => Arc::new(|_run: u64, _index: usize| -> Box<dyn RandomSource> {
            Box::new(ThreadRandom)
        }),
    }
}

/// Result of one device inside a batch.
#[derive(Debug)]
pub struct DeviceOutcome {
    pub index: usize,
    pub device_id: String,
    pub location: String,
    pub result: PipelineResult<TrafficEvent>,
}

/// Per-device outcomes, in input device order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<DeviceOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn events(&self) -> Vec<&TrafficEvent> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }

    pub fn failures(&self) -> Vec<&DeviceOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err()).collect()
    }

    pub fn forwarded_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.forwarded_to_cloud())
            .count()
    }

    pub fn into_events(self) -> Vec<TrafficEvent> {
        self.outcomes
            .into_iter()
            .filter_map(|o| o.result.ok())
            .collect()
    }
}

pub fn batch_device_id(index: usize) -> String {
    format!("EDGE_SENSOR_{:02}", index + 1)
}

/// Sequences edge -> fog -> cloud for single readings and device batches.
#[derive(Clone)]
pub struct PipelineOrchestrator {
    config: Arc<PipelineConfig>,
    generator: ReadingGenerator,
    classifier: CongestionClassifier,
    router: RoutingEngine,
    recorder: Arc<dyn EventRecorder>,
    random_factory: RandomFactory,
    // Shared by clones. Run numbers are taken before any device task spawns.
    runs: Arc<AtomicU64>,
}

impl PipelineOrchestrator {
    pub fn new(config: PipelineConfig, recorder: Arc<dyn EventRecorder>) -> PipelineResult<Self> {
        config.validate()?;
        let generator = ReadingGenerator::new(&config, Arc::new(SystemClock));
        let classifier = CongestionClassifier::from_config(&config);
        let router = RoutingEngine::from_config(&config);
        let random_factory = default_random_factory(config.seed);
        Ok(Self {
            config: Arc::new(config),
            generator,
            classifier,
            router,
            recorder,
            random_factory,
            runs: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.generator = ReadingGenerator::new(&self.config, clock);
        self
    }

    pub fn with_random_factory(mut self, random_factory: RandomFactory) -> Self {
        self.random_factory = random_factory;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fog + cloud stages for an existing reading. Nothing is recorded.
    pub fn evaluate(
        &self,
        reading: Reading,
        rng: &mut dyn RandomSource,
    ) -> PipelineResult<TrafficEvent> {
        let classification = self.classifier.classify(i64::from(reading.vehicle_count))?;
        let routing = self.router.decide(&reading, &classification, rng);
        let analytics = routing.forwarded_to_cloud.then(|| analyze(&classification));

        Ok(TrafficEvent {
            reading,
            classification,
            routing,
            analytics,
            processed_by: self.config.fog_node_id.clone(),
        })
    }

    fn next_run(&self) -> u64 {
        self.runs.fetch_add(1, Ordering::Relaxed)
    }

    /// Runs a single device through the whole pipeline and records the event.
    pub async fn run_once(&self, device_id: &str, location: &str) -> PipelineResult<TrafficEvent> {
        let run = self.next_run();
        self.run_device(run, 0, device_id, location).await
    }

    /// Runs `n` devices concurrently, one task each. Locations are reused
    /// round-robin when there are fewer of them than devices.
    pub async fn run_batch<L: AsRef<str>>(
        &self,
        n: usize,
        locations: &[L],
    ) -> PipelineResult<BatchReport> {
        if n == 0 || n > self.config.max_batch_size {
            return Err(PipelineError::InvalidBatchSize {
                requested: n,
                max: self.config.max_batch_size,
            });
        }
        if locations.is_empty() {
            return Err(PipelineError::InvalidInput(
                "batch needs at least one location".to_string(),
            ));
        }

        let run = self.next_run();
        let mut handles = Vec::with_capacity(n);
        for index in 0..n {
            let device_id = batch_device_id(index);
            let location = locations[index % locations.len()].as_ref().to_string();
            let pipeline = self.clone();
            let (task_device, task_location) = (device_id.clone(), location.clone());
            let handle = tokio::spawn(async move {
                pipeline
                    .run_device(run, index, &task_device, &task_location)
                    .await
            });
            handles.push((index, device_id, location, handle));
        }

        // Awaiting in spawn order keeps the report in input order.
        let mut outcomes = Vec::with_capacity(n);
        for (index, device_id, location, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PipelineError::WorkerFailed(format!("{}: {}", device_id, e))),
            };
            if let Err(e) = &result {
                log::warn!("[Pipeline] {} failed: {}", device_id, e);
            }
            outcomes.push(DeviceOutcome {
                index,
                device_id,
                location,
                result,
            });
        }

        let report = BatchReport { outcomes };
        log::info!(
            "[Pipeline] batch of {} finished: {} forwarded, {} failed",
            report.len(),
            report.forwarded_count(),
            report.failures().len()
        );
        Ok(report)
    }

    async fn run_device(
        &self,
        run: u64,
        index: usize,
        device_id: &str,
        location: &str,
    ) -> PipelineResult<TrafficEvent> {
        let mut rng = (self.random_factory)(run, index);
        let reading = self.generator.generate(device_id, location, rng.as_mut());
        let event = self.evaluate(reading, rng.as_mut())?;

        if self.config.simulate_latency {
            sleep(Duration::from_millis(u64::from(
                event.routing.edge_to_fog_latency_ms,
            )))
            .await;
            if let Some(cloud_ms) = event.routing.fog_to_cloud_latency_ms {
                sleep(Duration::from_millis(u64::from(cloud_ms))).await;
            }
        }

        self.recorder.record(&event)?;
        Ok(event)
    }
}
