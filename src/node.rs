//! Connection descriptor for a remote Kryptokrona daemon.
//!
//! A [`Node`] is the whole external configuration surface of a client: a host
//! name, a port and whether the daemon is served over TLS. It is immutable and
//! cheap to clone, so every client and daemon handle keeps its own copy.

use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Port the Kryptokrona daemon listens on for RPC by default.
pub const DEFAULT_DAEMON_PORT: u16 = 11898;

/// Host, port and TLS flag of a remote daemon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    host_name: String,
    port: u16,
    use_tls: bool,
}

/// Errors produced when parsing a `host:port` string into a [`Node`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NodeParseError {
    #[error("Node address is empty")]
    Empty,
    #[error("Node address '{0}' has no host name")]
    MissingHost(String),
    #[error("Invalid port in node address '{0}'")]
    InvalidPort(String),
}

impl Node {
    pub fn new(host_name: impl Into<String>, port: u16, use_tls: bool) -> Self {
        Self {
            host_name: host_name.into(),
            port,
            use_tls,
        }
    }

    pub fn host_name(&self) -> &str {
        &self.host_name
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn use_tls(&self) -> bool {
        self.use_tls
    }

    pub fn scheme(&self) -> &'static str {
        if self.use_tls { "https" } else { "http" }
    }

    /// `host:port` form used for DNS resolution. IPv6 literals are wrapped in
    /// brackets.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.url_host(), self.port)
    }

    fn url_host(&self) -> Cow<'_, str> {
        if self.host_name.contains(':') {
            Cow::Owned(format!("[{}]", self.host_name))
        } else {
            Cow::Borrowed(&self.host_name)
        }
    }

    /// Base URL every request path of this node is joined onto.
    ///
    /// The scheme is `https` when the node uses TLS and `http` otherwise.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("{}://{}/", self.scheme(), self.authority()))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme(), self.authority())
    }
}

/// Parses `host` or `host:port`, optionally prefixed by `http://` or
/// `https://`. IPv6 literals are written `[addr]:port`, or bare without a
/// port. A missing port falls back to [`DEFAULT_DAEMON_PORT`] and the
/// `https://` prefix turns TLS on.
impl FromStr for Node {
    type Err = NodeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(NodeParseError::Empty);
        }

        let (use_tls, rest) = if let Some(rest) = trimmed.strip_prefix("https://") {
            (true, rest)
        } else if let Some(rest) = trimmed.strip_prefix("http://") {
            (false, rest)
        } else {
            (false, trimmed)
        };

        let parse_port = |port: &str| {
            port.parse::<u16>()
                .map_err(|_| NodeParseError::InvalidPort(s.to_string()))
        };

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| NodeParseError::MissingHost(s.to_string()))?;
            match after {
                "" => (host, DEFAULT_DAEMON_PORT),
                _ => match after.strip_prefix(':') {
                    Some(port) => (host, parse_port(port)?),
                    None => return Err(NodeParseError::InvalidPort(s.to_string())),
                },
            }
        } else if rest.matches(':').count() > 1 {
            (rest, DEFAULT_DAEMON_PORT)
        } else {
            match rest.rsplit_once(':') {
                Some((host, port)) => (host, parse_port(port)?),
                None => (rest, DEFAULT_DAEMON_PORT),
            }
        };

        if host.is_empty() {
            return Err(NodeParseError::MissingHost(s.to_string()));
        }

        Ok(Node::new(host, port, use_tls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_uses_http_without_tls() {
        let node = Node::new("privacymine.net", 11898, false);
        assert_eq!(node.base_url().unwrap().as_str(), "http://privacymine.net:11898/");
    }

    #[test]
    fn test_base_url_uses_https_with_tls() {
        let node = Node::new("node.example.org", 443, true);
        // The default port for the scheme is elided by the URL parser.
        assert_eq!(node.base_url().unwrap().as_str(), "https://node.example.org/");
        assert_eq!(node.to_string(), "https://node.example.org:443");
    }

    #[test]
    fn test_base_url_joins_paths() {
        let node = Node::new("127.0.0.1", 8080, false);
        let url = node.base_url().unwrap().join("/get_o_indexes").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/get_o_indexes");
    }

    #[test]
    fn test_ipv6_host_is_bracketed() {
        let node = Node::new("::1", 11898, false);
        assert_eq!(node.authority(), "[::1]:11898");
        assert_eq!(node.base_url().unwrap().as_str(), "http://[::1]:11898/");
        assert_eq!(node.to_string(), "http://[::1]:11898");
    }

    #[test]
    fn test_parse_ipv6() {
        let node: Node = "[::1]:8080".parse().unwrap();
        assert_eq!(node.host_name(), "::1");
        assert_eq!(node.port(), 8080);
        assert_eq!(node.base_url().unwrap().as_str(), "http://[::1]:8080/");

        let node: Node = "https://[fe80::1]".parse().unwrap();
        assert_eq!(node.host_name(), "fe80::1");
        assert_eq!(node.port(), DEFAULT_DAEMON_PORT);
        assert!(node.use_tls());

        let node: Node = "::1".parse().unwrap();
        assert_eq!(node.host_name(), "::1");
        assert_eq!(node.port(), DEFAULT_DAEMON_PORT);

        assert!(matches!("[::1]x".parse::<Node>(), Err(NodeParseError::InvalidPort(_))));
        assert!(matches!("[::1".parse::<Node>(), Err(NodeParseError::MissingHost(_))));
    }

    #[test]
    fn test_parse_host_and_port() {
        let node: Node = "swepool.org:11898".parse().unwrap();
        assert_eq!(node.host_name(), "swepool.org");
        assert_eq!(node.port(), 11898);
        assert!(!node.use_tls());
    }

    #[test]
    fn test_parse_defaults_port_and_reads_scheme() {
        let node: Node = "https://blocksum.org".parse().unwrap();
        assert_eq!(node.port(), DEFAULT_DAEMON_PORT);
        assert!(node.use_tls());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!("".parse::<Node>(), Err(NodeParseError::Empty));
        assert!(matches!(
            "swepool.org:notaport".parse::<Node>(),
            Err(NodeParseError::InvalidPort(_))
        ));
        assert!(matches!(":11898".parse::<Node>(), Err(NodeParseError::MissingHost(_))));
    }
}
