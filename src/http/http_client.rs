// Copyright 2025 The Kryptokrona Developers
// SPDX-License-Identifier: BSD-3-Clause

use std::time::{Duration, Instant};

use log::{debug, error};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use url::Url;

use super::error::HttpError;
use crate::{config::ClientConfig, node::Node};

pub(crate) struct HttpClient {
    node: Node,
    base_url: Url,
    client: reqwest_middleware::ClientWithMiddleware,
    last_latency: RwLock<Option<(Duration, Instant)>>,
}

impl HttpClient {
    pub fn new(node: Node) -> Result<Self, HttpError> {
        Self::with_config(node, &ClientConfig::default())
    }

    pub fn with_config(node: Node, config: &ClientConfig) -> Result<Self, HttpError> {
        let base_url = node.base_url()?;
        let retry_policy =
            reqwest_retry::policies::ExponentialBackoff::builder().build_with_max_retries(config.max_retries);

        let inner_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        let client = reqwest_middleware::ClientBuilder::new(inner_client)
            .with(reqwest_retry::RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            node,
            base_url,
            client,
            last_latency: RwLock::new(None),
        })
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    /// Sends a request and logs any failure under `operation`.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        debug!(operation = operation, node:% = self.node; "HTTP: Sending request");
        let result = self.send_request(method, path, body).await;
        if let Err(e) = &result {
            error!(
                operation = operation,
                node:% = self.node,
                kind:? = e.kind(),
                error:% = e;
                "HTTP: Request failed"
            );
        }
        result
    }

    pub async fn send_request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T, HttpError> {
        let start = Instant::now();
        let url = self.base_url.join(path)?;

        let req = match method {
            Method::GET => self.client.get(url),
            Method::POST => {
                let req = self.client.post(url);
                if let Some(body) = body {
                    req.body(serde_json::to_string(&body)?)
                        .header("Content-Type", "application/json")
                } else {
                    req
                }
            },
            _ => return Err(HttpError::UnsupportedMethod),
        };

        let resp = req.send().await?;
        let latency = start.elapsed();
        self.update_latency(latency).await;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".into());
            return Err(HttpError::ServerError { status, body });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn update_latency(&self, duration: Duration) {
        *self.last_latency.write().await = Some((duration, Instant::now()));
    }

    pub async fn get_latency(&self) -> Option<Duration> {
        self.last_latency.read().await.map(|(d, _)| d)
    }
}
