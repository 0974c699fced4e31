use serde::{Deserialize, Serialize};

use crate::{
    cli::NodeArgs,
    node::{DEFAULT_DAEMON_PORT, Node},
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub client: ClientConfig,
    pub daemon: DaemonConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NodeConfig {
    pub host: String,
    pub port: u16,
    pub use_tls: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: "privacymine.net".to_string(),
            port: DEFAULT_DAEMON_PORT,
            use_tls: false,
        }
    }
}

impl NodeConfig {
    pub fn to_node(&self) -> Node {
        Node::new(self.host.clone(), self.port, self.use_tls)
    }

    pub fn apply_node(&mut self, args: &NodeArgs) {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if args.tls {
            self.use_tls = true;
        }
    }
}

/// Transport settings shared by every client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    pub timeout_secs: u64,
    /// Transient failures are retried with exponential backoff this many
    /// times. Zero sends every request exactly once.
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 0,
            user_agent: concat!("kryptokrona-rs/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Seconds the network height may stay unchanged before the node is
    /// considered dead.
    pub max_last_updated_network_height_interval_secs: u64,
    /// Seconds the local height may stay unchanged before the node is
    /// considered dead.
    pub max_last_updated_local_height_interval_secs: u64,
    /// Request `/sync/raw` instead of `/sync`.
    pub use_raw_blocks: bool,
    pub scan_coinbase_transactions: bool,
    /// Blocks requested per wallet sync call when the daemon keeps up.
    pub default_block_count: u64,
    /// Capacity of the fee info broadcast channel.
    pub fee_channel_capacity: usize,
    /// Poll interval of the `watch-fee` command.
    pub fee_poll_interval_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            max_last_updated_network_height_interval_secs: 180,
            max_last_updated_local_height_interval_secs: 180,
            use_raw_blocks: false,
            scan_coinbase_transactions: false,
            default_block_count: 100,
            fee_channel_capacity: 16,
            fee_poll_interval_secs: 60,
        }
    }
}
