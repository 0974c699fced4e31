//! Client for the daemon's transaction lookup endpoints.

use std::time::Duration;

use reqwest::Method;

use super::{
    error::HttpError,
    http_client::HttpClient,
    types::{TransactionDetailsByHashes, TransactionHashesByPaymentId, Transactions, TransactionsStatus},
};
use crate::{config::ClientConfig, node::Node};

/// Typed access to the transaction lookup endpoints of a daemon.
///
/// # Example
///
/// ```rust,no_run
/// use kryptokrona::{http::TransactionClient, node::Node};
///
/// # async fn example() -> Result<(), anyhow::Error> {
/// let client = TransactionClient::new("privacymine.net:11898".parse()?)?;
///
/// let status = client.get_transactions_status().await?;
/// println!("{} transactions in the pool", status.transactions_in_pool.len());
/// # Ok(())
/// # }
/// ```
pub struct TransactionClient {
    http_client: HttpClient,
}

impl TransactionClient {
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

    /// Queries `/get_transactions`.
    pub async fn get_transactions(&self) -> Result<Transactions, HttpError> {
        self.http_client
            .fetch("get_transactions", Method::GET, "/get_transactions", None)
            .await
    }

    /// Queries `/get_transaction_details_by_hashes`.
    pub async fn get_transaction_details_by_hashes(&self) -> Result<TransactionDetailsByHashes, HttpError> {
        self.http_client
            .fetch(
                "get_transaction_details_by_hashes",
                Method::GET,
                "/get_transaction_details_by_hashes",
                None,
            )
            .await
    }

    /// Queries `/get_transaction_hashes_by_payment_id`.
    pub async fn get_transaction_hashes_by_payment_id(&self) -> Result<TransactionHashesByPaymentId, HttpError> {
        self.http_client
            .fetch(
                "get_transaction_hashes_by_payment_id",
                Method::GET,
                "/get_transaction_hashes_by_payment_id",
                None,
            )
            .await
    }

    /// Queries `/get_transactions_status`.
    pub async fn get_transactions_status(&self) -> Result<TransactionsStatus, HttpError> {
        self.http_client
            .fetch("get_transactions_status", Method::GET, "/get_transactions_status", None)
            .await
    }

    pub async fn get_last_request_latency(&self) -> Option<Duration> {
        self.http_client.get_latency().await
    }
}
