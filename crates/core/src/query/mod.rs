//! Query engine over a loaded catalog.
//!
//! Filters narrow a set of records without touching the catalog; [`find`]
//! composes them. The format helpers turn records into what a results table
//! shows.

mod filters;
mod format;
mod types;

pub use filters::{filter_categories, filter_date_range, filter_imdb, filter_title, find};
pub use format::{magnet_link, pretty_size, sort_newest_first, DisplayRow};
pub use types::*;
