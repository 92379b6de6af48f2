//! Gateway Configuration
//!
//! Settings are read from `VOTES_*` environment variables and can be overridden
//! with command line flags (`--bind`, `--service`, `--proxy`, `--data-path`,
//! `--cluster`, `--partitions`).

use crate::partition::directory::StaticPartitionDirectory;
use crate::partition::types::ServiceIdentity;

use anyhow::Result;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_SERVICE_NAME: &str = "fabric:/VotingApplication/VotingData";
pub const DEFAULT_PROXY_HOST: &str = "http://localhost:19081";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_PARTITIONS: &str = "0-25";

/// Per-call network timeouts. Each is further capped by the request deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Overall budget of one inbound request.
    pub request: Duration,
    pub directory: Duration,
    pub backend: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request: Duration::from_secs(10),
            directory: Duration::from_secs(5),
            backend: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub service: ServiceIdentity,
    pub proxy_host: String,
    pub data_path: String,
    /// Cluster management endpoint; when unset the static partition list is used.
    pub cluster_endpoint: Option<String>,
    pub static_partitions: StaticPartitionDirectory,
    pub timeouts: Timeouts,
}

impl GatewayConfig {
    /// Built-in settings: one partition spanning the whole key space, no cluster endpoint.
    pub fn defaults() -> Result<Self> {
        Ok(Self {
            bind_addr: DEFAULT_BIND.parse()?,
            service: ServiceIdentity::parse(DEFAULT_SERVICE_NAME)?,
            proxy_host: DEFAULT_PROXY_HOST.to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            cluster_endpoint: None,
            static_partitions: StaticPartitionDirectory::parse(DEFAULT_PARTITIONS)?,
            timeouts: Timeouts::default(),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults()?;
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(bind) = var("VOTES_BIND") {
            config.bind_addr = bind.trim().parse()?;
        }
        if let Some(service) = var("VOTES_SERVICE_NAME") {
            config.service = ServiceIdentity::parse(&service)?;
        }
        if let Some(proxy) = var("VOTES_PROXY_HOST") {
            config.proxy_host = proxy;
        }
        if let Some(data_path) = var("VOTES_DATA_PATH") {
            config.data_path = data_path;
        }
        config.cluster_endpoint = var("VOTES_CLUSTER_ENDPOINT");
        if let Some(partitions) = var("VOTES_PARTITIONS") {
            config.static_partitions = StaticPartitionDirectory::parse(&partitions)?;
        }
        if let Some(ms) = var("VOTES_REQUEST_TIMEOUT_MS") {
            config.timeouts.request = parse_millis("VOTES_REQUEST_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = var("VOTES_DIRECTORY_TIMEOUT_MS") {
            config.timeouts.directory = parse_millis("VOTES_DIRECTORY_TIMEOUT_MS", &ms)?;
        }
        if let Some(ms) = var("VOTES_BACKEND_TIMEOUT_MS") {
            config.timeouts.backend = parse_millis("VOTES_BACKEND_TIMEOUT_MS", &ms)?;
        }

        Ok(config)
    }

    /// Applies command line flags on top of the current settings. Unknown
    /// arguments are ignored.
    pub fn apply_args(mut self, args: &[String]) -> Result<Self> {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let is_known = matches!(
                flag,
                "--bind" | "--service" | "--proxy" | "--data-path" | "--cluster" | "--partitions"
            );
            if !is_known {
                i += 1;
                continue;
            }

            let value = args
                .get(i + 1)
                .ok_or_else(|| anyhow::anyhow!("{} requires a value", flag))?;
            match flag {
                "--bind" => self.bind_addr = value.parse()?,
                "--service" => self.service = ServiceIdentity::parse(value)?,
                "--proxy" => self.proxy_host = value.clone(),
                "--data-path" => self.data_path = value.clone(),
                "--cluster" => self.cluster_endpoint = Some(value.clone()),
                _ => self.static_partitions = StaticPartitionDirectory::parse(value)?,
            }
            i += 2;
        }

        Ok(self)
    }
}

fn parse_millis(name: &str, raw: &str) -> Result<Duration> {
    let ms: u64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} must be a number of milliseconds: {}", name, e))?;
    Ok(Duration::from_millis(ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = GatewayConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config.bind_addr, DEFAULT_BIND.parse::<SocketAddr>().unwrap());
        assert_eq!(config.service.path(), "/VotingApplication/VotingData");
        assert_eq!(config.proxy_host, DEFAULT_PROXY_HOST);
        assert_eq!(config.data_path, DEFAULT_DATA_PATH);
        assert!(config.cluster_endpoint.is_none());
        assert_eq!(config.static_partitions.partitions().len(), 1);
        assert_eq!(config.timeouts, Timeouts::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("VOTES_BIND", "0.0.0.0:9000"),
            ("VOTES_SERVICE_NAME", "fabric:/Shop/Carts"),
            ("VOTES_CLUSTER_ENDPOINT", "http://localhost:19080"),
            ("VOTES_PARTITIONS", "0-12,13-25"),
            ("VOTES_BACKEND_TIMEOUT_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.service.path(), "/Shop/Carts");
        assert_eq!(
            config.cluster_endpoint.as_deref(),
            Some("http://localhost:19080")
        );
        assert_eq!(config.static_partitions.partitions().len(), 2);
        assert_eq!(config.timeouts.backend, Duration::from_millis(250));
    }

    #[test]
    fn test_blank_variables_are_ignored() {
        let config =
            GatewayConfig::from_lookup(lookup_from(&[("VOTES_CLUSTER_ENDPOINT", "  ")])).unwrap();

        assert!(config.cluster_endpoint.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let result =
            GatewayConfig::from_lookup(lookup_from(&[("VOTES_REQUEST_TIMEOUT_MS", "soon")]));

        assert!(result.is_err());
    }

    #[test]
    fn test_args_override_variables() {
        let args: Vec<String> = ["--bind", "127.0.0.1:7000", "--verbose", "--partitions", "0-25"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let config = GatewayConfig::defaults().unwrap().apply_args(&args).unwrap();

        assert_eq!(config.bind_addr.port(), 7000);
        assert_eq!(config.static_partitions.partitions().len(), 1);
    }

    #[test]
    fn test_flag_without_value_is_an_error() {
        let args = vec!["--proxy".to_string()];

        assert!(GatewayConfig::defaults().unwrap().apply_args(&args).is_err());
    }
}
