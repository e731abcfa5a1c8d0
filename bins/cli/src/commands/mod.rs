//! Command handlers.

pub mod config;
pub mod pack;
pub mod patterns;

pub use config::{run_config_schema, run_config_show};
pub use pack::run_pack;
pub use patterns::run_patterns;
