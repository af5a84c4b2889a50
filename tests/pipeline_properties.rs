use fog_traffic_pipeline::cloud::analyze;
use fog_traffic_pipeline::edge::{FixedClock, RandomSource, SeededRandom};
use fog_traffic_pipeline::fog::{classify, RoutingEngine};
use fog_traffic_pipeline::monitoring::{export_events, read_records, InMemoryEventStore};
use fog_traffic_pipeline::pipeline::{DiscardRecorder, PipelineOrchestrator, RandomFactory};
use fog_traffic_pipeline::{
    CloudAction, CongestionLevel, EventRecorder, PipelineConfig, PipelineError, Reading,
};
use chrono::{Local, TimeZone};
use std::collections::VecDeque;
use std::sync::Arc;

fn reading(vehicle_count: u32) -> Reading {
    Reading {
        device_id: "EDGE_CAM_01".to_string(),
        location: "Main Street & 1st Avenue".to_string(),
        vehicle_count,
        average_speed_kmh: 40,
        timestamp: Local.with_ymd_and_hms(2024, 9, 12, 7, 55, 0).unwrap(),
    }
}

// Replays draws in call order: vehicle count, speed, edge->fog ms, fog->cloud ms.
// Values are clamped into the requested range; missing draws take the floor.
struct Scripted(VecDeque<u32>);

impl RandomSource for Scripted {
    fn uniform_inclusive(&mut self, low: u32, high: u32) -> u32 {
        self.0.pop_front().unwrap_or(low).clamp(low, high)
    }
}

fn fixed_count(count: u32) -> RandomFactory {
    Arc::new(move |_run: u64, _index: usize| -> Box<dyn RandomSource> {
        Box::new(Scripted(VecDeque::from([count, 40, 12, 60])))
    })
}

#[test]
fn every_count_lands_in_exactly_one_band() {
    let router = RoutingEngine::default();
    for count in 0..=120u32 {
        let classification = classify(i64::from(count)).unwrap();
        let decision = router.decide(&reading(count), &classification, &mut SeededRandom::new(5));
        match count {
            0..=29 => {
                assert_eq!(classification.congestion_level, CongestionLevel::Low);
                assert!(!decision.forwarded_to_cloud);
            }
            30..=69 => {
                assert_eq!(classification.congestion_level, CongestionLevel::Medium);
                assert!(!decision.forwarded_to_cloud);
            }
            _ => {
                assert_eq!(classification.congestion_level, CongestionLevel::High);
                assert!(decision.forwarded_to_cloud);
                assert_eq!(analyze(&classification).action, CloudAction::AlertTrafficControl);
            }
        }
    }
}

#[tokio::test]
async fn seventy_five_vehicles_alert_traffic_control() {
    let pipeline = PipelineOrchestrator::new(PipelineConfig::default(), Arc::new(DiscardRecorder))
        .unwrap()
        .with_random_factory(fixed_count(75));
    let event = pipeline.run_once("EDGE_CAM_01", "Main Street").await.unwrap();

    assert_eq!(event.congestion_level(), CongestionLevel::High);
    assert_eq!(event.classification.congestion_percentage, 62.5);
    assert!(event.forwarded_to_cloud());
    assert_eq!(event.routing.edge_to_fog_latency_ms, 12);
    assert_eq!(event.routing.fog_to_cloud_latency_ms, Some(60));
    assert_eq!(
        event.analytics.map(|a| a.action),
        Some(CloudAction::AlertTrafficControl)
    );
}

#[tokio::test]
async fn scripted_draws_follow_configured_ranges_that_start_at_zero() {
    let config = PipelineConfig {
        edge_to_fog_latency_range_ms: [0, 5].into(),
        ..PipelineConfig::default()
    };
    let pipeline = PipelineOrchestrator::new(config, Arc::new(DiscardRecorder))
        .unwrap()
        .with_random_factory(fixed_count(20));
    let event = pipeline.run_once("EDGE_CAM_03", "Market Square").await.unwrap();

    assert_eq!(event.reading.vehicle_count, 20);
    assert_eq!(event.reading.average_speed_kmh, 40);
    assert_eq!(event.routing.edge_to_fog_latency_ms, 5);
    assert_eq!(event.routing.fog_to_cloud_latency_ms, None);
}

#[tokio::test]
async fn twenty_vehicles_stay_at_the_fog() {
    let pipeline = PipelineOrchestrator::new(PipelineConfig::default(), Arc::new(DiscardRecorder))
        .unwrap()
        .with_random_factory(fixed_count(20));
    let event = pipeline.run_once("EDGE_CAM_02", "Highway 101").await.unwrap();

    assert_eq!(event.congestion_level(), CongestionLevel::Low);
    assert_eq!(event.classification.congestion_percentage, 16.7);
    assert!(!event.forwarded_to_cloud());
    assert!(event.analytics.is_none());
}

#[tokio::test]
async fn both_escalation_rules_can_be_configured() {
    for (threshold, expect_forward) in [(None, false), (Some(60), true)] {
        let config = PipelineConfig {
            escalate_on_raw_count_threshold: threshold,
            ..PipelineConfig::default()
        };
        let pipeline = PipelineOrchestrator::new(config, Arc::new(DiscardRecorder))
            .unwrap()
            .with_random_factory(fixed_count(64));
        let event = pipeline.run_once("EDGE_SENSOR_04", "Airport Road").await.unwrap();
        assert_eq!(event.congestion_level(), CongestionLevel::Medium);
        assert_eq!(event.forwarded_to_cloud(), expect_forward);
        assert_eq!(event.analytics.is_some(), expect_forward);
    }
}

#[tokio::test]
async fn batch_of_three_feeds_the_store_in_order() {
    let config = PipelineConfig {
        seed: Some(7),
        ..PipelineConfig::default()
    };
    let store = Arc::new(InMemoryEventStore::new(&config.fog_node_id));
    let recorder: Arc<dyn EventRecorder> = store.clone();
    let instant = Local.with_ymd_and_hms(2024, 9, 12, 8, 0, 0).unwrap();
    let pipeline = PipelineOrchestrator::new(config, recorder)
        .unwrap()
        .with_clock(Arc::new(FixedClock(instant)));

    let report = pipeline
        .run_batch(3, &["Main Street", "Highway 101", "Market Square"])
        .await
        .unwrap();
    let events = report.into_events();
    assert_eq!(events.len(), 3);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.reading.device_id, format!("EDGE_SENSOR_{:02}", i + 1));
        assert_eq!(event.reading.timestamp, instant);
        assert_eq!(event.analytics.is_some(), event.forwarded_to_cloud());
    }

    let stats = store.fog_stats();
    assert_eq!(stats.total_processed, 3);
    let forwarded = events.iter().filter(|e| e.forwarded_to_cloud()).count() as u64;
    assert_eq!(stats.forwarded_to_cloud, forwarded);
}

#[tokio::test]
async fn batch_bounds_follow_configured_maximum() {
    let pipeline =
        PipelineOrchestrator::new(PipelineConfig::default(), Arc::new(DiscardRecorder)).unwrap();
    assert!(matches!(
        pipeline.run_batch(0, &["Main Street"]).await,
        Err(PipelineError::InvalidBatchSize { .. })
    ));
    assert!(matches!(
        pipeline.run_batch(6, &["Main Street"]).await,
        Err(PipelineError::InvalidBatchSize { requested: 6, max: 5 })
    ));

    let wider = PipelineConfig {
        max_batch_size: 8,
        ..PipelineConfig::default()
    };
    let pipeline = PipelineOrchestrator::new(wider, Arc::new(DiscardRecorder)).unwrap();
    assert_eq!(pipeline.run_batch(6, &["Main Street"]).await.unwrap().len(), 6);
}

#[tokio::test]
async fn exported_batch_reads_back_from_csv() {
    let config = PipelineConfig {
        seed: Some(99),
        ..PipelineConfig::default()
    };
    let pipeline = PipelineOrchestrator::new(config, Arc::new(DiscardRecorder)).unwrap();
    let events = pipeline
        .run_batch(5, &["North", "South"])
        .await
        .unwrap()
        .into_events();

    let path = std::env::temp_dir().join(format!("fog_traffic_it_{}.csv", std::process::id()));
    assert_eq!(export_events(&path, &events).unwrap(), 5);
    let records = read_records(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(records.len(), 5);
    for (record, event) in records.iter().zip(&events) {
        assert_eq!(record.device_id, event.reading.device_id);
        assert_eq!(record.vehicle_count, event.reading.vehicle_count);
        assert_eq!(record.forwarded_to_cloud, event.forwarded_to_cloud());
        assert_eq!(record.congestion_level, event.congestion_level().to_string());
    }
}
