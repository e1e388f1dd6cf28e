pub mod cli;
pub mod config;
pub mod logger;

// Public API
pub use cli::{Cli, ConfigShape};
pub use config::{CategoryConfig, CategorySpec, Config};
pub use logger::{Level, Logger, LoggerRegistry};
