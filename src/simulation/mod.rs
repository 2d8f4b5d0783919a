//! Synthetic data for benchmarks and demos.

pub mod sample_catalog;
