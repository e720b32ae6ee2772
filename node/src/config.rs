// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use alert_changelog::ChangeLogConfig;
use std::net::SocketAddr;

pub const ENV_BIND_ADDR: &str = "ALERT_NODE_ADDR";
pub const ENV_AUTH_TOKEN: &str = "ALERT_NODE_TOKEN";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub bind_addr: SocketAddr,
    pub changelog: ChangeLogConfig,
    /// Bearer token required on every route when set.
    pub auth_token: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            changelog: ChangeLogConfig::default(),
            auth_token: None,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self {
            changelog: ChangeLogConfig::from_env(),
            ..Self::default()
        };
        if let Ok(raw) = std::env::var(ENV_BIND_ADDR) {
            match raw.parse() {
                Ok(addr) => cfg.bind_addr = addr,
                Err(_) => tracing::warn!("Ignoring invalid {}={:?}", ENV_BIND_ADDR, raw),
            }
        }
        cfg.auth_token = std::env::var(ENV_AUTH_TOKEN).ok().filter(|t| !t.is_empty());
        cfg
    }
}
