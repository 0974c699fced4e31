mod defaults;
pub mod loader;

pub use defaults::{AppConfig, ClientConfig, DaemonConfig, NodeConfig};
pub use loader::{load_app_config, load_configuration};
