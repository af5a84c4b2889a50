// fog/mod.rs
pub mod classifier;
pub mod router;

pub use classifier::{classify, CongestionClassifier};
pub use router::RoutingEngine;
