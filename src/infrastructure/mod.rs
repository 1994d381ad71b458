//! Infrastructure layer
//!
//! Configuration, logging and the build console.

mod config;
mod console;
mod fs;
mod logging;

pub use config::{ArtifactConfig, Config, ENV_FAIL_BUILD, ENV_LOG_LEVEL, ENV_WRAPPER_DIR};
pub use console::{BuildLog, CapturedLog};
pub use fs::delete_directory;
pub use logging::init_logging;
