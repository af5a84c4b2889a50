// traffic_monitoring_cli_main.rs
use fog_traffic_pipeline::monitoring::{run_cli, MonitoringApp};
use fog_traffic_pipeline::PipelineConfig;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match PipelineConfig::load_or_default(std::env::args().nth(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    let app = match MonitoringApp::new(config, None) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Startup error: {}", e);
            std::process::exit(1);
        }
    };

    run_cli(app).await;
}
