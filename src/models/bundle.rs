//! The full set of aggregates computed for one scouted team.

use serde::{Deserialize, Serialize};

use super::{
    CompositionSummary, EconomySummary, FirstBloodSummary, FirstBloodTrends, MapPoolEntry,
    MomentumSummary, RoundSideAnalysis, TeamOverview, WinTypeSummary,
};

/// Analyzer outputs. Any of them may be missing, either because the
/// upstream signal is unavailable or because the caller only computed a
/// subset, so consumers must check each field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregates {
    pub overview: Option<TeamOverview>,
    pub map_pool: Option<Vec<MapPoolEntry>>,
    pub round_sides: Option<RoundSideAnalysis>,
    pub first_blood: Option<FirstBloodSummary>,
    pub first_blood_trends: Option<FirstBloodTrends>,
    pub win_conditions: Option<WinTypeSummary>,
    pub economy: Option<EconomySummary>,
    pub momentum: Option<MomentumSummary>,
    pub compositions: Option<CompositionSummary>,
}
