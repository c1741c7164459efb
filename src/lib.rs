//! # Buyphase
//!
//! Opponent scouting for competitive Valorant built on GRID match data.
//!
//! ## Architecture
//!
//! - **models**: Normalized games and rounds, aggregate statistics, insights
//! - **normalize**: Raw series state to per-round records
//! - **calculate**: Pure analyzers (map pool, sides, first blood, economy, ...)
//! - **insights**: Ordered rule engine turning aggregates into findings
//! - **report**: End-to-end pipeline and cached report lookup
//! - **grid**: GRID GraphQL client and data source
//! - **cache**: Expiring on-disk report cache
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod cache;
pub mod calculate;
pub mod config;
pub mod grid;
pub mod insights;
pub mod models;
pub mod normalize;
pub mod report;

pub use models::*;
