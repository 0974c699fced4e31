//! Connection to a single Kryptokrona daemon.
//!
//! This module provides the [`Daemon`] struct, the client-side representation
//! of a remote node. It tracks whether the node was resolved and connected,
//! keeps the latest status reported by the node, and publishes fee updates to
//! any number of subscribers.
//!
//! # Lifecycle
//!
//! A daemon starts unconnected. [`Daemon::init`] resolves the node's host
//! name; on success the daemon is connected, on failure it returns
//! [`DaemonError::UnknownHost`] and stays unusable. There is no disconnect.
//!
//! # Fee feed
//!
//! [`Daemon::subscribe_fee_info`] hands out a broadcast receiver. Every
//! successful [`Daemon::update_fee_info`] publishes the fetched record once to
//! each receiver that exists at that moment, in emission order. Nothing is
//! replayed to late subscribers; a receiver that falls behind by more than the
//! channel capacity sees [`broadcast::error::RecvError::Lagged`] and skips
//! the oldest records. A failed update publishes nothing.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use kryptokrona::{daemon::Daemon, node::Node};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let daemon = Daemon::new(Node::new("swepool.org", 11898, false))?;
//! daemon.init().await?;
//!
//! let mut fees = daemon.subscribe_fee_info();
//! daemon.update_fee_info().await?;
//!
//! let fee = fees.recv().await?;
//! println!("fee status: {}", fee.status);
//! # Ok(())
//! # }
//! ```

use std::{
    collections::HashMap,
    sync::atomic::{AtomicBool, Ordering},
    time::{Duration, Instant},
};

use log::{debug, error, info, warn};
use reqwest::Method;
use thiserror::Error;
use tokio::{
    sync::{RwLock, broadcast},
    time::interval,
};

use crate::{
    config::{ClientConfig, DaemonConfig},
    http::{
        HttpError,
        http_client::HttpClient,
        types::{
            BlockTransactionIndexes, FeeInfo, NodeInfo, RandomOutputsForAmount, RandomOutputsRequest, STATUS_OK,
            SendTransactionResponse, TransactionsStatus, WalletSyncRequest, WalletSyncResponse,
        },
        utils::{AddressError, RawTransactionError, check_raw_transaction, validate_address},
    },
    log::mask_address,
    node::Node,
};

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("Unknown host {host}: {reason}")]
    UnknownHost { host: String, reason: String },

    #[error("Daemon request failed: {0}")]
    Http(#[from] HttpError),

    #[error("Daemon has not reported new blocks for {stale_for:?}")]
    NodeDead { stale_for: Duration },

    #[error("Daemon fee address is invalid: {0}")]
    InvalidFeeAddress(#[from] AddressError),

    #[error("Invalid raw transaction: {0}")]
    InvalidTransaction(#[from] RawTransactionError),

    #[error("Daemon rejected transaction: {0}")]
    TransactionRejected(String),
}

/// Heights and peer data reported by the last `/info` call.
#[derive(Debug)]
struct DaemonStatus {
    node_info: Option<NodeInfo>,
    node_fee: Option<FeeInfo>,
    local_daemon_block_count: u64,
    network_block_count: u64,
    peer_count: u64,
    last_known_hashrate: u64,
    last_updated_network_height: Instant,
    last_updated_local_height: Instant,
    block_count: u64,
}

impl DaemonStatus {
    fn new(block_count: u64) -> Self {
        let now = Instant::now();
        Self {
            node_info: None,
            node_fee: None,
            local_daemon_block_count: 0,
            network_block_count: 0,
            peer_count: 0,
            last_known_hashrate: 0,
            last_updated_network_height: now,
            last_updated_local_height: now,
            block_count,
        }
    }
}

/// Client-side handle on a remote daemon.
pub struct Daemon {
    http_client: HttpClient,
    config: DaemonConfig,
    connected: AtomicBool,
    status: RwLock<DaemonStatus>,
    fee_tx: broadcast::Sender<FeeInfo>,
}

impl Daemon {
    pub fn new(node: Node) -> Result<Self, DaemonError> {
        Self::with_config(node, &ClientConfig::default(), DaemonConfig::default())
    }

    pub fn with_config(node: Node, client_config: &ClientConfig, config: DaemonConfig) -> Result<Self, DaemonError> {
        let http_client = HttpClient::with_config(node, client_config)?;
        let (fee_tx, _) = broadcast::channel(config.fee_channel_capacity.max(1));
        let status = RwLock::new(DaemonStatus::new(config.default_block_count.max(1)));

        Ok(Self {
            http_client,
            config,
            connected: AtomicBool::new(false),
            status,
            fee_tx,
        })
    }

    pub fn node(&self) -> &Node {
        self.http_client.node()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    /// Resolves the node's host name and marks the daemon connected.
    ///
    /// # Errors
    ///
    /// Returns [`DaemonError::UnknownHost`] when the host name does not
    /// resolve to any address. The daemon stays unconnected in that case.
    pub async fn init(&self) -> Result<(), DaemonError> {
        info!(node:% = self.node(); "Initializing daemon");

        let authority = self.node().authority();
        let unknown_host = |reason: String| DaemonError::UnknownHost {
            host: self.node().host_name().to_string(),
            reason,
        };

        let mut addresses = tokio::net::lookup_host(authority.as_str()).await.map_err(|e| {
            error!(node:% = self.node(), error:% = e; "Failed to resolve daemon host");
            unknown_host(e.to_string())
        })?;

        let Some(address) = addresses.next() else {
            error!(node:% = self.node(); "Daemon host resolved to no addresses");
            return Err(unknown_host("no addresses found".to_string()));
        };

        self.connected.store(true, Ordering::Release);
        info!(node:% = self.node(), address:% = address; "Daemon connected");
        Ok(())
    }

    /// Returns `true` when `/info` answers with a success status.
    pub async fn is_reachable(&self) -> bool {
        match self.http_client.send_request::<NodeInfo>(Method::GET, "/info", None).await {
            Ok(_) => true,
            Err(e) => {
                warn!(node:% = self.node(), error:% = e; "Daemon is not reachable");
                false
            },
        }
    }

    /// Fetches `/fee`, stores the record and publishes it to subscribers.
    ///
    /// # Errors
    ///
    /// - [`DaemonError::Http`] when the request fails; nothing is published
    ///   and the stored fee is left as it was.
    /// - [`DaemonError::InvalidFeeAddress`] when the daemon advertises a fee
    ///   address that is not a standard Kryptokrona address.
    pub async fn update_fee_info(&self) -> Result<FeeInfo, DaemonError> {
        let fee: FeeInfo = self.http_client.fetch("update_fee_info", Method::GET, "/fee", None).await?;

        if !fee.address.is_empty() {
            if let Err(e) = validate_address(&fee.address, false) {
                error!(
                    address = &*mask_address(&fee.address),
                    error:% = e;
                    "Failed to validate address from daemon fee info"
                );
                return Err(e.into());
            }
        }

        self.status.write().await.node_fee = Some(fee.clone());
        info!(
            status = &*fee.status,
            amount = fee.amount,
            address = &*mask_address(&fee.address);
            "Node fee information updated"
        );

        // No receivers is not an error for the producer.
        let receivers = self.fee_tx.send(fee.clone()).unwrap_or(0);
        debug!(receivers = receivers; "Fee info published");

        Ok(fee)
    }

    /// Subscribes to fee records published by later [`Daemon::update_fee_info`]
    /// calls.
    pub fn subscribe_fee_info(&self) -> broadcast::Receiver<FeeInfo> {
        self.fee_tx.subscribe()
    }

    /// Calls [`Daemon::update_fee_info`] every `period` until `shutdown`
    /// completes.
    ///
    /// `shutdown` is polled alongside the in-flight request, so a slow node
    /// does not delay stopping. Failed updates are logged and retried on the
    /// next tick.
    pub async fn poll_fee_info<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut ticker = interval(period);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {},
            }

            tokio::select! {
                _ = &mut shutdown => break,
                result = self.update_fee_info() => {
                    if let Err(e) = result {
                        warn!(error:% = e; "Fee update failed, will retry after interval");
                    }
                },
            }
        }

        info!(node:% = self.node(); "Fee polling stopped");
    }

    /// The last fee record stored by [`Daemon::update_fee_info`].
    pub async fn node_fee(&self) -> Option<FeeInfo> {
        self.status.read().await.node_fee.clone()
    }

    /// Fetches `/info` and refreshes heights, peer count and hashrate.
    ///
    /// The node is considered dead when neither height moved and the last
    /// movement is older than the configured intervals, both when the request
    /// fails and when it returns unchanged heights.
    pub async fn update_daemon_info(&self) -> Result<NodeInfo, DaemonError> {
        let result = self
            .http_client
            .fetch::<NodeInfo>("update_daemon_info", Method::GET, "/info", None)
            .await;

        let mut status = self.status.write().await;

        let info = match result {
            Ok(info) => info,
            Err(e) => {
                self.check_staleness(&status)?;
                return Err(e.into());
            },
        };

        let network_height = info.network_height.saturating_sub(1);
        if status.local_daemon_block_count != info.height || status.network_block_count != network_height {
            let now = Instant::now();
            status.last_updated_network_height = now;
            status.last_updated_local_height = now;
        } else {
            self.check_staleness(&status)?;
        }

        status.local_daemon_block_count = info.height;
        status.network_block_count = network_height;
        status.peer_count = info.peer_count();
        status.last_known_hashrate = info.hashrate;
        status.node_info = Some(info.clone());

        debug!(
            height = info.height,
            network_height = network_height,
            peers = status.peer_count;
            "Node information updated"
        );
        Ok(info)
    }

    fn check_staleness(&self, status: &DaemonStatus) -> Result<(), DaemonError> {
        let network_stale = status.last_updated_network_height.elapsed();
        let local_stale = status.last_updated_local_height.elapsed();

        let network_limit = Duration::from_secs(self.config.max_last_updated_network_height_interval_secs);
        let local_limit = Duration::from_secs(self.config.max_last_updated_local_height_interval_secs);

        if network_stale > network_limit || local_stale > local_limit {
            let stale_for = network_stale.max(local_stale);
            error!(node:% = self.node(), stale_secs = stale_for.as_secs(); "Daemon appears to be dead");
            return Err(DaemonError::NodeDead { stale_for });
        }
        Ok(())
    }

    pub async fn local_daemon_block_count(&self) -> u64 {
        self.status.read().await.local_daemon_block_count
    }

    pub async fn network_block_count(&self) -> u64 {
        self.status.read().await.network_block_count
    }

    pub async fn peer_count(&self) -> u64 {
        self.status.read().await.peer_count
    }

    pub async fn last_known_hashrate(&self) -> u64 {
        self.status.read().await.last_known_hashrate
    }

    pub async fn node_info(&self) -> Option<NodeInfo> {
        self.status.read().await.node_info.clone()
    }

    /// Number of blocks the next wallet sync call will ask for.
    pub async fn sync_block_count(&self) -> u64 {
        self.status.read().await.block_count
    }

    /// Requests blocks for wallet synchronization.
    ///
    /// The request's `block_count` and `skip_coinbase_transactions` are filled
    /// in by the daemon handle. When a request fails the block count drops to a
    /// quarter (rounded up) so a struggling node gets smaller requests; each
    /// success doubles it back up to the configured default.
    pub async fn get_wallet_sync_data(
        &self,
        block_hash_checkpoints: Vec<String>,
        start_height: u64,
        start_timestamp: u64,
    ) -> Result<WalletSyncResponse, DaemonError> {
        let endpoint = if self.config.use_raw_blocks { "/sync/raw" } else { "/sync" };
        let block_count = self.sync_block_count().await;

        let request = WalletSyncRequest {
            block_hash_checkpoints,
            start_height,
            start_timestamp,
            block_count,
            skip_coinbase_transactions: !self.config.scan_coinbase_transactions,
        };
        let body = serde_json::to_value(&request).map_err(HttpError::from)?;

        match self
            .http_client
            .fetch::<WalletSyncResponse>("get_wallet_sync_data", Method::POST, endpoint, Some(body))
            .await
        {
            Ok(response) => {
                let mut status = self.status.write().await;
                status.block_count = status
                    .block_count
                    .saturating_mul(2)
                    .min(self.config.default_block_count.max(1));
                debug!(
                    blocks = response.items.len(),
                    synced = response.synced;
                    "Wallet sync data received"
                );
                Ok(response)
            },
            Err(e) => {
                let mut status = self.status.write().await;
                status.block_count = status.block_count.div_ceil(4).max(1);
                warn!(block_count = status.block_count; "Failed to get wallet sync data, lowering block count");
                Err(e.into())
            },
        }
    }

    /// Global output indexes of every transaction in blocks `start..=end`,
    /// keyed by transaction hash.
    pub async fn get_global_indexes_for_range(
        &self,
        start_height: u64,
        end_height: u64,
    ) -> Result<HashMap<String, Vec<u64>>, DaemonError> {
        let path = format!("/indexes/{}/{}", start_height, end_height);
        let entries: Vec<BlockTransactionIndexes> = self
            .http_client
            .fetch("get_global_indexes_for_range", Method::GET, &path, None)
            .await?;

        Ok(entries.into_iter().map(|e| (e.hash, e.indexes)).collect())
    }

    /// Hashes among `transaction_hashes` that the daemon knows neither in its
    /// pool nor in a block.
    pub async fn get_cancelled_transactions(&self, transaction_hashes: Vec<String>) -> Result<Vec<String>, DaemonError> {
        if transaction_hashes.is_empty() {
            return Ok(Vec::new());
        }

        let body = serde_json::json!({ "transactionHashes": transaction_hashes });
        let status: TransactionsStatus = self
            .http_client
            .fetch("get_cancelled_transactions", Method::POST, "/transaction/status", Some(body))
            .await?;

        Ok(status.transactions_unknown)
    }

    /// Random decoy outputs for each amount, sorted by global index so the
    /// order does not hint at which output is real.
    pub async fn get_random_outputs_by_amount(
        &self,
        amounts: Vec<u64>,
        requested_outs: u64,
    ) -> Result<Vec<RandomOutputsForAmount>, DaemonError> {
        let request = RandomOutputsRequest {
            amounts,
            count: requested_outs,
        };
        let body = serde_json::to_value(&request).map_err(HttpError::from)?;

        let mut outputs: Vec<RandomOutputsForAmount> = self
            .http_client
            .fetch("get_random_outputs_by_amount", Method::POST, "/indexes/random", Some(body))
            .await?;

        for entry in &mut outputs {
            entry.outputs.sort_by_key(|o| o.index);
        }
        Ok(outputs)
    }

    /// Relays a hex encoded transaction through the daemon.
    pub async fn send_transaction(&self, raw_transaction: &str) -> Result<SendTransactionResponse, DaemonError> {
        check_raw_transaction(raw_transaction)?;
        info!(target: "audit", "Daemon: Sending transaction");

        let body = serde_json::json!({ "tx_as_hex": raw_transaction });
        let response: SendTransactionResponse = self
            .http_client
            .fetch("send_transaction", Method::POST, "/sendrawtransaction", Some(body))
            .await?;

        if response.status != STATUS_OK {
            let reason = response
                .error
                .clone()
                .unwrap_or_else(|| format!("status {}", response.status));
            warn!(target: "audit", reason = &*reason; "Daemon: Transaction rejected");
            return Err(DaemonError::TransactionRejected(reason));
        }

        info!(target: "audit", "Daemon: Transaction accepted");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::utils::tests::sample_address;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn node_for(server: &MockServer) -> Node {
        let addr = server.address();
        Node::new(addr.ip().to_string(), addr.port(), false)
    }

    fn daemon_for(server: &MockServer) -> Daemon {
        Daemon::new(node_for(server)).unwrap()
    }

    fn daemon_with(server: &MockServer, config: DaemonConfig) -> Daemon {
        Daemon::with_config(node_for(server), &ClientConfig::default(), config).unwrap()
    }

    async fn mount_info(server: &MockServer, height: u64, network_height: u64) {
        Mock::given(method("GET"))
            .and(path("/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "height": height,
                "network_height": network_height,
                "incoming_connections_count": 2,
                "outgoing_connections_count": 8,
                "hashrate": 5000,
                "status": "OK"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_init_marks_connected_for_resolvable_host() {
        let mock_server = MockServer::start().await;
        let daemon = daemon_for(&mock_server);
        assert!(!daemon.is_connected());

        daemon.init().await.unwrap();

        assert!(daemon.is_connected());
    }

    #[tokio::test]
    async fn test_ipv6_literal_node_builds_and_connects() {
        let daemon = Daemon::new(Node::new("::1", 11898, false)).unwrap();

        daemon.init().await.unwrap();

        assert!(daemon.is_connected());
    }

    #[tokio::test]
    async fn test_init_fails_with_unknown_host() {
        let daemon = Daemon::new(Node::new("kryptokrona-daemon.invalid", 11898, false)).unwrap();

        let err = daemon.init().await.unwrap_err();

        assert!(matches!(err, DaemonError::UnknownHost { ref host, .. } if host == "kryptokrona-daemon.invalid"));
        assert!(!daemon.is_connected());
    }

    #[tokio::test]
    async fn test_update_fee_info_publishes_to_every_subscriber() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": "",
                "amount": 0,
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        daemon.init().await.unwrap();
        let mut first = daemon.subscribe_fee_info();
        let mut second = daemon.subscribe_fee_info();

        let fee = daemon.update_fee_info().await.unwrap();

        assert_eq!(fee.status, "OK");
        assert_eq!(first.recv().await.unwrap(), fee);
        assert_eq!(second.recv().await.unwrap(), fee);
        assert_eq!(daemon.node_fee().await, Some(fee));
    }

    #[tokio::test]
    async fn test_late_subscriber_gets_no_replay() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": sample_address(),
                "amount": 5000,
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let mut early = daemon.subscribe_fee_info();
        daemon.update_fee_info().await.unwrap();
        let mut late = daemon.subscribe_fee_info();

        let fee = early.recv().await.unwrap();
        assert!(fee.charges_fee());
        assert!(matches!(late.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }

    #[tokio::test]
    async fn test_update_fee_info_failure_publishes_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let mut fees = daemon.subscribe_fee_info();

        let err = daemon.update_fee_info().await.unwrap_err();

        assert!(matches!(err, DaemonError::Http(_)));
        assert!(matches!(fees.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
        assert_eq!(daemon.node_fee().await, None);
    }

    #[tokio::test]
    async fn test_update_fee_info_rejects_invalid_address() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": "not-an-address",
                "amount": 10,
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);

        let err = daemon.update_fee_info().await.unwrap_err();

        assert!(matches!(err, DaemonError::InvalidFeeAddress(AddressError::WrongPrefix)));
        assert_eq!(daemon.node_fee().await, None);
    }

    #[tokio::test]
    async fn test_update_daemon_info_tracks_heights() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server, 1000, 1002).await;

        let daemon = daemon_for(&mock_server);
        daemon.update_daemon_info().await.unwrap();

        assert_eq!(daemon.local_daemon_block_count().await, 1000);
        assert_eq!(daemon.network_block_count().await, 1001);
        assert_eq!(daemon.peer_count().await, 10);
        assert_eq!(daemon.last_known_hashrate().await, 5000);
        assert_eq!(daemon.node_info().await.map(|info| info.height), Some(1000));
        assert!(daemon.is_reachable().await);
    }

    #[tokio::test]
    async fn test_update_daemon_info_detects_dead_node() {
        let mock_server = MockServer::start().await;
        mount_info(&mock_server, 1000, 1002).await;

        let daemon = daemon_with(
            &mock_server,
            DaemonConfig {
                max_last_updated_network_height_interval_secs: 0,
                max_last_updated_local_height_interval_secs: 0,
                ..DaemonConfig::default()
            },
        );

        // First call moves heights from zero, second sees no movement.
        daemon.update_daemon_info().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let err = daemon.update_daemon_info().await.unwrap_err();

        assert!(matches!(err, DaemonError::NodeDead { .. }));
    }

    #[tokio::test]
    async fn test_update_daemon_info_failure_within_interval_returns_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let err = daemon.update_daemon_info().await.unwrap_err();

        assert!(matches!(err, DaemonError::Http(_)));
        assert!(!daemon.is_reachable().await);
    }

    #[tokio::test]
    async fn test_wallet_sync_block_count_backs_off_and_recovers() {
        let mock_server = MockServer::start().await;
        let daemon = daemon_for(&mock_server);

        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&mock_server)
            .await;

        assert!(daemon.get_wallet_sync_data(vec![], 0, 0).await.is_err());
        assert_eq!(daemon.sync_block_count().await, 25);
        assert!(daemon.get_wallet_sync_data(vec![], 0, 0).await.is_err());
        assert_eq!(daemon.sync_block_count().await, 7);

        Mock::given(method("POST"))
            .and(path("/sync"))
            .and(body_json(json!({
                "blockHashCheckpoints": ["abc"],
                "startHeight": 10,
                "startTimestamp": 0,
                "blockCount": 7,
                "skipCoinbaseTransactions": true
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "blockHash": "ff", "blockHeight": 10 }],
                "synced": false,
                "topBlock": { "hash": "ee", "height": 500 }
            })))
            .mount(&mock_server)
            .await;

        let response = daemon
            .get_wallet_sync_data(vec!["abc".to_string()], 10, 0)
            .await
            .unwrap();

        assert_eq!(response.items[0].block_height, 10);
        assert_eq!(response.top_block.unwrap().height, 500);
        assert_eq!(daemon.sync_block_count().await, 14);
    }

    #[tokio::test]
    async fn test_raw_blocks_use_raw_endpoint() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync/raw"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [], "synced": true })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let daemon = daemon_with(
            &mock_server,
            DaemonConfig {
                use_raw_blocks: true,
                ..DaemonConfig::default()
            },
        );

        assert!(daemon.get_wallet_sync_data(vec![], 0, 0).await.unwrap().synced);
    }

    #[tokio::test]
    async fn test_get_global_indexes_for_range() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/indexes/10/20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "hash": "aa", "indexes": [1, 2, 3] },
                { "hash": "bb", "indexes": [4] }
            ])))
            .mount(&mock_server)
            .await;

        let indexes = daemon_for(&mock_server)
            .get_global_indexes_for_range(10, 20)
            .await
            .unwrap();

        assert_eq!(indexes.len(), 2);
        assert_eq!(indexes["aa"], vec![1, 2, 3]);
        assert_eq!(indexes["bb"], vec![4]);
    }

    #[tokio::test]
    async fn test_get_cancelled_transactions() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transaction/status"))
            .and(body_json(json!({ "transactionHashes": ["a", "b", "c"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "transactionsInPool": ["a"],
                "transactionsInBlock": ["b"],
                "transactionsUnknown": ["c"],
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let cancelled = daemon
            .get_cancelled_transactions(vec!["a".into(), "b".into(), "c".into()])
            .await
            .unwrap();

        assert_eq!(cancelled, vec!["c".to_string()]);
        assert!(daemon.get_cancelled_transactions(vec![]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_random_outputs_are_sorted_by_index() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/indexes/random"))
            .and(body_json(json!({ "amounts": [100], "count": 3 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "amount": 100,
                "outputs": [
                    { "index": 30, "key": "k30" },
                    { "index": 10, "key": "k10" },
                    { "index": 20, "key": "k20" }
                ]
            }])))
            .mount(&mock_server)
            .await;

        let outputs = daemon_for(&mock_server)
            .get_random_outputs_by_amount(vec![100], 3)
            .await
            .unwrap();

        let indexes: Vec<u64> = outputs[0].outputs.iter().map(|o| o.index).collect();
        assert_eq!(indexes, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_send_transaction() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sendrawtransaction"))
            .and(body_json(json!({ "tx_as_hex": "01ab" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "OK" })))
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/sendrawtransaction"))
            .and(body_json(json!({ "tx_as_hex": "02cd" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "Failed",
                "error": "Transaction was rejected by daemon"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);

        assert!(daemon.send_transaction("01ab").await.is_ok());
        assert!(matches!(
            daemon.send_transaction("02cd").await,
            Err(DaemonError::TransactionRejected(ref reason)) if reason == "Transaction was rejected by daemon"
        ));
        assert!(matches!(
            daemon.send_transaction("zz").await,
            Err(DaemonError::InvalidTransaction(_))
        ));
        assert_eq!(mock_server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_wallet_sync_block_count_saturates_at_large_default() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/sync"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [], "synced": true })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_with(
            &mock_server,
            DaemonConfig {
                default_block_count: u64::MAX,
                ..DaemonConfig::default()
            },
        );

        daemon.get_wallet_sync_data(vec![], 0, 0).await.unwrap();
        daemon.get_wallet_sync_data(vec![], 0, 0).await.unwrap();

        assert_eq!(daemon.sync_block_count().await, u64::MAX);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_and_skips_oldest_records() {
        let mock_server = MockServer::start().await;
        for amount in 1..=4 {
            Mock::given(method("GET"))
                .and(path("/fee"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "address": "",
                    "amount": amount,
                    "status": "OK"
                })))
                .up_to_n_times(1)
                .mount(&mock_server)
                .await;
        }

        let daemon = daemon_with(
            &mock_server,
            DaemonConfig {
                fee_channel_capacity: 2,
                ..DaemonConfig::default()
            },
        );
        let mut slow = daemon.subscribe_fee_info();

        for _ in 0..4 {
            daemon.update_fee_info().await.unwrap();
        }

        assert!(matches!(slow.recv().await, Err(broadcast::error::RecvError::Lagged(2))));
        assert_eq!(slow.recv().await.unwrap().amount, 3);
        assert_eq!(slow.recv().await.unwrap().amount, 4);
    }

    #[tokio::test]
    async fn test_poll_fee_info_publishes_until_shutdown() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "address": "",
                "amount": 0,
                "status": "OK"
            })))
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let mut fees = daemon.subscribe_fee_info();

        daemon
            .poll_fee_info(Duration::from_secs(60), tokio::time::sleep(Duration::from_millis(200)))
            .await;

        assert_eq!(fees.try_recv().unwrap().status, "OK");
    }

    #[tokio::test]
    async fn test_poll_fee_info_stops_during_slow_request() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/fee"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "status": "OK" }))
                    .set_delay(Duration::from_secs(20)),
            )
            .mount(&mock_server)
            .await;

        let daemon = daemon_for(&mock_server);
        let mut fees = daemon.subscribe_fee_info();

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            daemon.poll_fee_info(Duration::from_secs(60), tokio::time::sleep(Duration::from_millis(100))),
        )
        .await;

        assert!(stopped.is_ok());
        assert!(matches!(fees.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }
}
