//! Client for the daemon's output index endpoints.
//!
//! # Example
//!
//! ```rust,no_run
//! use kryptokrona::{http::IndexesClient, node::Node};
//!
//! # async fn example() -> Result<(), anyhow::Error> {
//! let client = IndexesClient::new(Node::new("privacymine.net", 11898, false))?;
//!
//! match client.get_o_indexes().await {
//!     Ok(indexes) => println!("{} output indexes", indexes.o_indexes.len()),
//!     Err(e) => eprintln!("lookup failed ({:?}): {}", e.kind(), e),
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::Method;

use super::{
    error::HttpError,
    http_client::HttpClient,
    types::{GlobalIndexesForRange, OIndexes},
};
use crate::{config::ClientConfig, node::Node};

/// Typed access to `/get_o_indexes` and `/get_global_indexes_for_range`.
///
/// Every call is independent; the client can be shared across tasks. Failures
/// are logged with the operation name and returned as [`HttpError`].
pub struct IndexesClient {
    http_client: HttpClient,
}

impl IndexesClient {
    /// Creates a client bound to `node` with the default transport settings
    /// (30 second timeout, no retries).
    ///
    /// # Errors
    ///
    /// Fails if the node does not form a valid URL or the TLS backend cannot be
    /// initialized.
    pub fn new(node: Node) -> Result<Self, HttpError> {
        Ok(Self {
            http_client: HttpClient::new(node)?,
        })
    }

    pub fn with_config(node: Node, config: &ClientConfig) -> Result<Self, HttpError> {
        Ok(Self {
            http_client: HttpClient::with_config(node, config)?,
        })
    }

    pub fn node(&self) -> &Node {
        self.http_client.node()
    }

    /// Fetches the output indexes known to the daemon.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is unreachable, answers with a non-success
    /// status, or sends a body that does not decode into [`OIndexes`].
    pub async fn get_o_indexes(&self) -> Result<OIndexes, HttpError> {
        self.http_client
            .fetch("get_o_indexes", Method::GET, "/get_o_indexes", None)
            .await
    }

    /// Fetches the global output indexes for the daemon's default block range.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`IndexesClient::get_o_indexes`].
    pub async fn get_global_indexes_for_range(&self) -> Result<GlobalIndexesForRange, HttpError> {
        self.http_client
            .fetch(
                "get_global_indexes_for_range",
                Method::GET,
                "/get_global_indexes_for_range",
                None,
            )
            .await
    }

    /// Round-trip time of the most recent request, if any was made.
    pub async fn get_last_request_latency(&self) -> Option<Duration> {
        self.http_client.get_latency().await
    }
}
