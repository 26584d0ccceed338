//! Torrent catalog - the static dump of torrent records searched by the finder.
//!
//! Records are parsed once from a CSV source file and then served from a
//! serialized cache artifact on later runs. Whether an existing cache may be
//! used is decided by a [`CachePolicy`].

mod cache;
mod source;
mod store;
mod types;

pub use cache::{policy_for, CacheFile, CachePolicy, NewerThanSource, TrustExisting};
pub use source::{parse_records, parse_timestamp, read_source};
pub use store::{CatalogStore, LoadOrigin};
pub use types::*;
