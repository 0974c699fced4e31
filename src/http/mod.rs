//! Typed HTTP clients for Kryptokrona daemon endpoints.
//!
//! Each client is bound to one [`Node`](crate::node::Node) and turns a named
//! daemon operation into a `GET` against `{scheme}://{host}:{port}/{path}`,
//! where the scheme is `https` when the node uses TLS.
//!
//! # Architecture
//!
//! - [`IndexesClient`] - output index lookups
//! - [`TransactionClient`] - transaction lookups
//! - [`NodeClient`] - daemon status, fee and peers
//! - [`HttpError`] - tagged failure returned by every call
//! - Response types in [`types`]
//!
//! # Error Handling
//!
//! Client calls never panic and never surface a bare absent value. A failed
//! call is logged with its operation name and returned as an [`HttpError`]
//! whose [`kind`](HttpError::kind) tells network failures, error statuses and
//! undecodable bodies apart.
//!
//! # Example
//!
//! ```rust,no_run
//! use kryptokrona::{http::TransactionClient, node::Node};
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let node = Node::new("privacymine.net", 11898, false);
//! let client = TransactionClient::new(node)?;
//!
//! if let Ok(txs) = client.get_transactions().await {
//!     println!("{} transactions", txs.txs_as_hex.len());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
pub(crate) mod http_client;
mod indexes_client;
mod node_client;
mod transaction_client;
pub mod types;
pub mod utils;

pub use error::{FailureKind, HttpError};
pub use indexes_client::IndexesClient;
pub use node_client::NodeClient;
pub use transaction_client::TransactionClient;
pub use types::{
    FeeInfo, GlobalIndexesForRange, NodeHeight, NodeInfo, NodePeers, OIndexes, TransactionDetails,
    TransactionDetailsByHashes, TransactionHashesByPaymentId, TransactionIndexes, Transactions, TransactionsStatus,
};
