//! MTGJSON data-source bookkeeping.

mod meta_tracker;

pub use meta_tracker::{CatalogMeta, Clock, MetaTracker};
