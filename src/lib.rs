//! Aggregates sewing patterns and fabric listings from pattern sellers,
//! pattern blogs and fabric stores into one normalized schema, and keeps
//! user projects in a local SQLite store.

pub mod api;
pub mod client;
pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod models;
pub mod pattern_finder;
pub mod scrapers;
pub mod search;
pub mod stores;
pub mod traits;

pub use crate::error::{Error, Result};
pub use crate::pattern_finder::PatternFinder;
