pub mod cli;
pub mod config;
pub mod daemon;
pub mod http;
pub mod log;
pub mod node;

pub use crate::daemon::{Daemon, DaemonError};
pub use crate::http::{FailureKind, HttpError, IndexesClient, NodeClient, TransactionClient};
pub use crate::node::Node;
