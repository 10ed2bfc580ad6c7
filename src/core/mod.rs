pub mod config;
pub mod context;
pub mod telemetry;
pub(crate) mod time;
