//! Catalog search for RetroRewind
//!
//! Queries the games and movies catalogs, merges and filters the results,
//! and falls back to built-in sample data when the backend is down.

pub mod filter;
pub mod models;
pub mod sample;
pub mod search;

pub use filter::{FilterCriteria, TypeFilter};
pub use models::{MediaItem, MediaType, UNKNOWN_YEAR};
pub use search::{SearchAggregator, SearchOutcome, SearchSession, SearchTicket};
