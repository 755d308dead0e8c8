//! CLI command implementations.

pub mod batch;
pub mod convert;
pub mod engines;
pub mod languages;
