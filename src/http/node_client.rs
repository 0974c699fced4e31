use std::time::Duration;

use reqwest::Method;

use super::{
    error::HttpError,
    http_client::HttpClient,
    types::{FeeInfo, NodeHeight, NodeInfo, NodePeers},
};
use crate::{config::ClientConfig, node::Node};

/// Typed access to the daemon status endpoints: `/info`, `/fee`, `/height`
/// and `/peers`.
pub struct NodeClient {
    http_client: HttpClient,
}

impl NodeClient {
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

    pub async fn get_info(&self) -> Result<NodeInfo, HttpError> {
        self.http_client.fetch("get_info", Method::GET, "/info", None).await
    }

    pub async fn get_fee(&self) -> Result<FeeInfo, HttpError> {
        self.http_client.fetch("get_fee", Method::GET, "/fee", None).await
    }

    pub async fn get_height(&self) -> Result<NodeHeight, HttpError> {
        self.http_client.fetch("get_height", Method::GET, "/height", None).await
    }

    pub async fn get_peers(&self) -> Result<NodePeers, HttpError> {
        self.http_client.fetch("get_peers", Method::GET, "/peers", None).await
    }

    pub async fn get_last_request_latency(&self) -> Option<Duration> {
        self.http_client.get_latency().await
    }
}
