// cloud/mod.rs
pub mod analytics;

pub use analytics::analyze;
