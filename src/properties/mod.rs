//! Build properties handoff
//!
//! A single `.properties` file shared by the builds of a job, used to pass
//! values from one build step to a later one. Reading the file consumes it.

mod build;
mod format;
mod map;
mod store;

pub use build::BuildRecord;
pub use map::Properties;
pub use store::{PROPERTIES_FILE_NAME, PropertiesStore};
