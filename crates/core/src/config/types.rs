use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([127, 0, 0, 1])
}

fn default_port() -> u16 {
    8080
}

/// Catalog data locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    /// CSV dump the catalog is parsed from.
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,
    /// Serialized snapshot written after the first parse.
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,
    /// When an existing cache file may be used instead of the source.
    #[serde(default)]
    pub cache_policy: CachePolicyKind,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source_path: default_source_path(),
            cache_path: default_cache_path(),
            cache_policy: CachePolicyKind::default(),
        }
    }
}

fn default_source_path() -> PathBuf {
    PathBuf::from("resources/data/xrmbcsv.csv")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("cache/cache.bin")
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicyKind {
    /// Any existing cache file is used as-is.
    #[default]
    TrustExisting,
    /// The cache is used only if it is at least as new as the source file.
    NewerThanSource,
}
