//! Core data models for scouting reports.

mod bundle;
mod game;
mod insight;
mod stats;
mod support;
mod team;

pub use bundle::*;
pub use game::*;
pub use insight::*;
pub use stats::*;
pub use support::*;
pub use team::*;
