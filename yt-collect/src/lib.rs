pub mod collect;
pub mod config;
pub mod data_processing;
pub mod summary;
pub mod telemetry;
