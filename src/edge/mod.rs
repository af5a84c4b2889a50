// edge/mod.rs
pub mod reading_generator;
pub mod sources;

pub use reading_generator::{create_sample_devices, EdgeDevice, ReadingGenerator};
pub use sources::{Clock, FixedClock, RandomSource, SeededRandom, SystemClock, ThreadRandom};
