//! Foundational types: currencies and conversion, errors, valuation inputs
//! and duty parameters.

pub mod currency;
pub mod error;
pub mod parameters;
pub mod valuation;
