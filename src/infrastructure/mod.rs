//! Infrastructure concerns that sit outside the domain: configuration
//! loading and validation, logging setup.

pub mod config;
pub mod logging;

pub use config::{ConfigError, ConfigLoader, MemoryConfig};
pub use logging::{init_logging, LogFormat, LoggingConfig};
