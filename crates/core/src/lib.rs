pub mod catalog;
pub mod config;
pub mod metrics;
pub mod query;

pub use catalog::{
    parse_timestamp, Catalog, CatalogError, CatalogStats, CatalogStore, TorrentRecord,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CachePolicyKind,
    Config, ConfigError, DataConfig, ServerConfig,
};
pub use query::{
    find, magnet_link, pretty_size, sort_newest_first, DisplayRow, QueryError, SearchParams,
    TorrentQuery,
};
