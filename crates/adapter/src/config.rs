//! Environment-driven configuration for the server and the engine it hosts

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use anyhow::Context;
use tracing::warn;

use crate::core::EngineConfig;
use crate::protocol::PROTOCOL_VERSION;
use crate::types::{AdjacencyPolicy, Value};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 7878;
pub const DEFAULT_MAX_PENDING: usize = 16;
pub const DEFAULT_AUTOPLAY_MOVES: u32 = 100;

/// Parse `key` from `lookup`, falling back to `default` on absence or garbage.
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            warn!(key, value = %raw, "unparseable setting, using default");
            default
        }
    }
}

fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: DEFAULT_MAX_PENDING,
        }
    }
}

impl ServerConfig {
    /// Create from `MATCH3_HOST`, `MATCH3_PORT` and `MATCH3_MAX_PENDING`
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("MATCH3_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(&lookup, "MATCH3_PORT", DEFAULT_PORT);
        let max_pending_commands =
            parse_or(&lookup, "MATCH3_MAX_PENDING", DEFAULT_MAX_PENDING).max(1);

        Self {
            host,
            port,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid socket address {}:{}", self.host, self.port))
    }
}

/// Board and RNG settings for the hosted game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    pub engine: EngineConfig,
    /// `None` seeds from the clock.
    pub seed: Option<u32>,
    pub autoplay_moves: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            seed: None,
            autoplay_moves: DEFAULT_AUTOPLAY_MOVES,
        }
    }
}

impl GameSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(process_env)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = EngineConfig::default();
        let rows = parse_or(&lookup, "MATCH3_ROWS", defaults.rows);
        let columns = parse_or(&lookup, "MATCH3_COLUMNS", defaults.columns);
        let elements: Value = parse_or(&lookup, "MATCH3_ELEMENTS", defaults.elements);

        let adjacency = match lookup("MATCH3_ADJACENCY") {
            None => AdjacencyPolicy::default(),
            Some(raw) => AdjacencyPolicy::parse(raw.trim()).unwrap_or_else(|| {
                warn!(value = %raw, "unknown MATCH3_ADJACENCY, using enforced");
                AdjacencyPolicy::default()
            }),
        };

        let seed = lookup("MATCH3_SEED").and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(value = %raw, "unparseable MATCH3_SEED, seeding from clock");
                None
            }
        });

        Self {
            engine: EngineConfig::new(rows, columns, elements).with_adjacency(adjacency),
            seed,
            autoplay_moves: parse_or(&lookup, "MATCH3_AUTOPLAY_MOVES", DEFAULT_AUTOPLAY_MOVES),
        }
    }
}
