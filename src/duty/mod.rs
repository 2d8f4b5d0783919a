//! The duty calculation engine and its output.

pub mod breakdown;
pub mod calculator;
pub mod selection;
