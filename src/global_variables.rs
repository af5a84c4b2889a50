// Congestion thresholds (vehicles per reading)
pub const LOW_THRESHOLD: u32 = 30;
pub const HIGH_THRESHOLD: u32 = 70;
pub const MAX_VEHICLE_COUNT: u32 = 120;

// Edge sensor speed range (km/h)
pub const SPEED_RANGE_KMH: [u32; 2] = [20, 80];

// Simulated hop latencies (ms)
pub const EDGE_TO_FOG_LATENCY_RANGE_MS: [u32; 2] = [10, 30];
pub const FOG_TO_CLOUD_LATENCY_RANGE_MS: [u32; 2] = [50, 100];

// Batch mode
pub const MAX_BATCH_SIZE: usize = 5;

pub const FOG_NODE_ID: &str = "FOG_NODE_CENTRAL";

// Collaborator limits and output files
pub const CONSOLE_LOG_CAPACITY: usize = 100;
pub const CLOUD_AVERAGE_WINDOW: usize = 10;
pub const TRAFFIC_EVENTS_CSV: &str = "traffic_events.csv";
pub const CONGESTION_CHART_PNG: &str = "congestion_levels.png";
