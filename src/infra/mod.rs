//! Process execution and runtime bootstrap.

pub mod error;
pub mod execute;
pub mod telemetry;
