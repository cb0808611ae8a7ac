//! Client configuration.
//!
//! Environment variables (read at runtime on desktop, baked in at compile
//! time on web):
//! - `KEIKICHI_API_URL`: REST base including the version prefix
//!   (default: `http://localhost:8000/api/v1`)
//! - `KEIKICHI_WS_URL`: WebSocket base (default: the API URL with its scheme
//!   swapped to `ws`/`wss`)

use std::time::Duration;

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base: String,
    pub ws_base: String,
    /// Fixed delay between socket reconnect attempts.
    pub reconnect_delay: Duration,
    /// Re-fetch interval for the notification list, reconciling missed pushes.
    pub notifications_reconcile: Duration,
    /// Re-fetch interval for the admin space map.
    pub admin_space_refresh: Duration,
    pub toast_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_URL.to_string(),
            ws_base: "ws://localhost:8000/api/v1".to_string(),
            reconnect_delay: Duration::from_secs(3),
            notifications_reconcile: Duration::from_secs(60),
            admin_space_refresh: Duration::from_secs(5),
            toast_ttl: Duration::from_secs(4),
        }
    }
}

impl ClientConfig {
    /// Build from explicit URLs. The WebSocket base is derived when absent.
    pub fn from_urls(api: &str, ws: Option<&str>) -> anyhow::Result<Self> {
        let api_base = api.trim().trim_end_matches('/').to_string();
        Url::parse(&api_base).with_context(|| format!("invalid API url {api_base:?}"))?;
        let ws_base = match ws.map(str::trim).filter(|w| !w.is_empty()) {
            Some(ws) => {
                let ws = ws.trim_end_matches('/').to_string();
                Url::parse(&ws).with_context(|| format!("invalid WebSocket url {ws:?}"))?;
                ws
            }
            None => http_to_ws(&api_base)?,
        };
        Ok(Self {
            api_base,
            ws_base,
            ..Self::default()
        })
    }

    pub fn from_env() -> Self {
        let api = read_var("KEIKICHI_API_URL");
        let ws = read_var("KEIKICHI_WS_URL");
        let api = api.as_deref().unwrap_or(DEFAULT_API_URL);
        match Self::from_urls(api, ws.as_deref()) {
            Ok(config) => config,
            Err(e) => {
                crate::log_warn!("Ignoring client configuration: {:#}", e);
                Self::default()
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn read_var(name: &str) -> Option<String> {
    match name {
        "KEIKICHI_API_URL" => option_env!("KEIKICHI_API_URL").map(str::to_string),
        "KEIKICHI_WS_URL" => option_env!("KEIKICHI_WS_URL").map(str::to_string),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Convert an HTTP/HTTPS URL to WS/WSS.
pub fn http_to_ws(url: &str) -> anyhow::Result<String> {
    if let Some(rest) = url.strip_prefix("https://") {
        Ok(format!("wss://{rest}"))
    } else if let Some(rest) = url.strip_prefix("http://") {
        Ok(format!("ws://{rest}"))
    } else {
        bail!("cannot derive a WebSocket url from {url:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_ws_base_from_api_url() {
        let config = ClientConfig::from_urls("https://fletes.example.com/api/v1/", None).unwrap();
        assert_eq!(config.api_base, "https://fletes.example.com/api/v1");
        assert_eq!(config.ws_base, "wss://fletes.example.com/api/v1");
        assert_eq!(config.reconnect_delay, Duration::from_secs(3));
    }

    #[test]
    fn explicit_ws_base_wins() {
        let config =
            ClientConfig::from_urls("http://localhost:8000/api/v1", Some("ws://proxy/api/v1"))
                .unwrap();
        assert_eq!(config.ws_base, "ws://proxy/api/v1");
    }

    #[test]
    fn rejects_garbage() {
        assert!(ClientConfig::from_urls("not a url", None).is_err());
        assert!(http_to_ws("ftp://x").is_err());
    }

    #[test]
    fn default_matches_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(
            ClientConfig::from_urls(DEFAULT_API_URL, None).unwrap(),
            config
        );
    }
}
