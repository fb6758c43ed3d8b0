// mod.rs - CLI module

pub mod args;
pub mod config;
pub mod logging;
pub mod merge;
pub mod validation;

// Re-export main types for convenience
pub use args::{Args, Command, Invocation};
pub use config::Config;
pub use logging::init_logging;
pub use validation::{log_settings, validate_args, ValidationResult};
