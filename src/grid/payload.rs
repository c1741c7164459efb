//! Raw GRID response shapes.
//!
//! These mirror the GraphQL selections in [`super::queries`]. Every field
//! the feed may omit is defaulted so that the basic query shape (no
//! segments, no characters) decodes into the same types.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStateData {
    pub series_state: Option<RawSeriesState>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesState {
    pub id: String,
    #[serde(default)]
    pub finished: bool,
    #[serde(default)]
    pub games: Vec<RawGame>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGame {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub finished: bool,
    pub map: Option<RawMap>,
    #[serde(default)]
    pub teams: Vec<RawGameTeam>,
    #[serde(default)]
    pub segments: Vec<RawSegment>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMap {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGameTeam {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub side: Option<String>,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub score: u32,
    #[serde(default)]
    pub players: Vec<RawGamePlayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawGamePlayer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    pub character: Option<RawCharacter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCharacter {
    pub name: Option<String>,
}

/// One round.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegment {
    #[serde(default)]
    pub sequence_number: u32,
    #[serde(default)]
    pub teams: Vec<RawSegmentTeam>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegmentTeam {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub side: Option<String>,
    #[serde(default)]
    pub won: bool,
    #[serde(default)]
    pub players: Vec<RawSegmentPlayer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSegmentPlayer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kills: u32,
    #[serde(default)]
    pub deaths: u32,
    /// `None` when the feed does not populate the field at all
    pub first_kill: Option<bool>,
}

/// `allSeries` connection from the central data feed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesListData {
    pub tournament: Option<RawTournament>,
    pub all_series: RawConnection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTournament {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawConnection {
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

#[derive(Debug, Deserialize)]
pub struct RawEdge {
    pub node: RawSeriesNode,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesNode {
    pub id: String,
    pub start_time_scheduled: Option<DateTime<Utc>>,
    pub tournament: Option<RawTournament>,
    #[serde(default)]
    pub teams: Vec<RawSeriesTeam>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesTeam {
    pub base_info: Option<RawBaseInfo>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBaseInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub logo_url: Option<String>,
}
