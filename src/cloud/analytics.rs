// cloud/analytics.rs

use crate::shared_data::{AnalyticsResult, Classification, CloudAction, CongestionLevel};

/// Map an escalated reading's congestion level to the cloud's action and advice.
pub fn analyze(classification: &Classification) -> AnalyticsResult {
    let (action, recommendation) = match classification.congestion_level {
        CongestionLevel::High => (CloudAction::AlertTrafficControl, "Deploy traffic officers"),
        CongestionLevel::Medium => (CloudAction::AdjustSignalTiming, "Adjust signal timing"),
        CongestionLevel::Low => (CloudAction::None, "No action needed"),
    };

    log::debug!(
        "[Cloud] {} congestion ({:.1}%) -> {}",
        classification.congestion_level,
        classification.congestion_percentage,
        action
    );

    AnalyticsResult {
        action,
        recommendation: recommendation.to_string(),
    }
}
