// Copyright 2025 The Kryptokrona Developers
// SPDX-License-Identifier: BSD-3-Clause

use serde::{Deserialize, Serialize};

/// Status string a healthy daemon reports in its responses.
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OIndexes {
    pub o_indexes: Vec<u64>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalIndexesForRange {
    pub indexes: Vec<TransactionIndexes>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionIndexes {
    pub key: String,
    pub value: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transactions {
    pub txs_as_hex: Vec<String>,
    pub missed_tx: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDetailsByHashes {
    pub transactions: Vec<TransactionDetails>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionDetails {
    pub hash: String,
    pub size: u64,
    pub payment_id: String,
    pub mixin: u64,
    pub fee: u64,
    pub amount_out: u64,
    pub block_hash: String,
    pub block_index: u64,
    pub timestamp: u64,
    pub in_blockchain: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionHashesByPaymentId {
    pub transaction_hashes: Vec<String>,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionsStatus {
    pub transactions_in_pool: Vec<String>,
    pub transactions_in_block: Vec<String>,
    pub transactions_unknown: Vec<String>,
    pub status: String,
}

/// Fee a daemon charges for relaying transactions of light wallets.
///
/// An empty `address` together with a zero `amount` means the daemon does
/// not charge a fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeInfo {
    pub address: String,
    pub amount: u64,
    pub status: String,
}

impl FeeInfo {
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn charges_fee(&self) -> bool {
        self.amount > 0 && !self.address.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub alt_blocks_count: u64,
    pub difficulty: u64,
    pub grey_peerlist_size: u64,
    pub hashrate: u64,
    pub height: u64,
    pub incoming_connections_count: u64,
    pub last_known_block_index: u64,
    pub major_version: u32,
    pub minor_version: u32,
    pub network_height: u64,
    pub outgoing_connections_count: u64,
    pub start_time: u64,
    pub status: String,
    pub supported_height: u64,
    pub synced: bool,
    pub testnet: bool,
    pub tx_count: u64,
    pub tx_pool_size: u64,
    pub version: String,
    pub white_peerlist_size: u64,
}

impl NodeInfo {
    pub fn peer_count(&self) -> u64 {
        self.incoming_connections_count + self.outgoing_connections_count
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeHeight {
    pub height: u64,
    pub network_height: u64,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePeers {
    pub peers: Vec<String>,
    pub gray_peers: Vec<String>,
    pub status: String,
}

/// Body of a `/sync` or `/sync/raw` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSyncRequest {
    pub block_hash_checkpoints: Vec<String>,
    pub start_height: u64,
    pub start_timestamp: u64,
    pub block_count: u64,
    pub skip_coinbase_transactions: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WalletSyncResponse {
    pub items: Vec<SyncBlock>,
    pub synced: bool,
    pub top_block: Option<TopBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopBlock {
    pub hash: String,
    pub height: u64,
}

/// A block as returned by the wallet sync endpoints.
///
/// With raw blocks enabled the daemon sends `block` and `transactions` as hex
/// blobs; otherwise the parsed fields are filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncBlock {
    pub block_hash: String,
    pub block_height: u64,
    pub block_timestamp: u64,
    #[serde(rename = "coinbaseTX")]
    pub coinbase_tx: Option<SyncTransaction>,
    pub transactions: Vec<SyncTransaction>,
    pub block: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncTransaction {
    pub hash: String,
    pub tx_public_key: String,
    pub unlock_time: u64,
    pub payment_id: String,
    pub outputs: Vec<SyncOutput>,
    pub inputs: Vec<SyncInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncOutput {
    pub amount: u64,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncInput {
    pub amount: u64,
    pub key_image: String,
}

/// One entry of the `/indexes/{start}/{end}` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTransactionIndexes {
    pub hash: String,
    pub indexes: Vec<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomOutputsRequest {
    pub amounts: Vec<u64>,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomOutputsForAmount {
    pub amount: u64,
    pub outputs: Vec<RandomOutput>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomOutput {
    pub index: u64,
    pub key: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendTransactionResponse {
    pub status: String,
    pub error: Option<String>,
}
