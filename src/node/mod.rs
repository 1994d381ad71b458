//! Execution nodes
//!
//! A build runs on a node that may be the controller itself or a remote
//! agent. File operations on a node go through its [`NodeChannel`]; a node
//! without a channel is offline.

mod filter;
mod local;
mod traits;

pub use filter::IncludeFilter;
pub use local::LocalChannel;
pub use traits::{AgentNode, NodeChannel};
