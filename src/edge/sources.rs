// edge/sources.rs

use chrono::{DateTime, Local};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Supplies uniform integers. Every device run owns its own source.
pub trait RandomSource: Send {
    /// Uniform integer in `[low, high]`, both ends included.
    fn uniform_inclusive(&mut self, low: u32, high: u32) -> u32;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Draws from the thread-local RNG on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn uniform_inclusive(&mut self, low: u32, high: u32) -> u32 {
        rand::rng().random_range(low..=high)
    }
}

/// Reproducible source for tests and seeded demo runs.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn uniform_inclusive(&mut self, low: u32, high: u32) -> u32 {
        self.rng.random_range(low..=high)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
