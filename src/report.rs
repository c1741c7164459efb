//! End-to-end scouting pipeline.
//!
//! Runs every analyzer over the same game slice, then the insight engine
//! over the resulting aggregates. The output is plain data with no
//! timestamps, so repeated runs on the same games serialize identically.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculate::{
    analyze_compositions, analyze_economy, analyze_first_blood, analyze_first_blood_trends,
    analyze_map_pool, analyze_momentum, analyze_round_sides, analyze_win_conditions,
    team_overview,
};
use crate::cache::ReportCache;
use crate::grid::{DataSource, GridError, TeamGames};
use crate::insights::generate_insights;
use crate::models::{Aggregates, FieldSupport, GameRecord, Insight, TeamRef};

/// Everything the UI renders for one scouted team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoutingReport {
    pub team: TeamRef,
    pub games_analyzed: usize,
    pub series_analyzed: usize,
    pub first_kill_support: FieldSupport,
    #[serde(flatten)]
    pub aggregates: Aggregates,
    pub insights: Vec<Insight>,
}

/// Run every analyzer over `games`.
pub fn build_aggregates(games: &[GameRecord], support: FieldSupport) -> Aggregates {
    Aggregates {
        overview: Some(team_overview(games)),
        map_pool: Some(analyze_map_pool(games)),
        round_sides: Some(analyze_round_sides(games)),
        first_blood: analyze_first_blood(games, support),
        first_blood_trends: analyze_first_blood_trends(games, support),
        win_conditions: analyze_win_conditions(games),
        economy: Some(analyze_economy(games)),
        momentum: Some(analyze_momentum(games)),
        compositions: Some(analyze_compositions(games)),
    }
}

/// Aggregates plus insights for `games`.
pub fn analyze_games(
    team: TeamRef,
    games: &[GameRecord],
    support: FieldSupport,
    series_analyzed: usize,
) -> ScoutingReport {
    let aggregates = build_aggregates(games, support);
    let insights = generate_insights(&aggregates);
    info!(
        "Report for {}: {} games, {} insights",
        team.name,
        games.len(),
        insights.len()
    );

    ScoutingReport {
        team,
        games_analyzed: games.len(),
        series_analyzed,
        first_kill_support: support,
        aggregates,
        insights,
    }
}

/// Report for games fetched from a data source.
pub fn build_report(team_games: &TeamGames) -> ScoutingReport {
    analyze_games(
        team_games.team.clone(),
        &team_games.games,
        team_games.first_kill_support,
        team_games.series_analyzed,
    )
}

/// Cache key for a team's report.
pub fn cache_key(team_id: &str) -> String {
    format!("report_{}", team_id)
}

/// A report and whether it came from the cache.
#[derive(Debug, Clone)]
pub struct CachedReport {
    pub report: ScoutingReport,
    pub from_cache: bool,
}

/// Serve the cached report for `team_id` when fresh, otherwise fetch the
/// team's games, analyze them and cache the result. Reports with no games
/// are not cached.
pub async fn fetch_report(
    source: &dyn DataSource,
    cache: &ReportCache,
    team_id: &str,
    refresh: bool,
) -> Result<CachedReport, GridError> {
    let key = cache_key(team_id);
    if !refresh {
        if let Some(report) = cache.get::<ScoutingReport>(&key).await {
            debug!("Serving report for {} from cache", team_id);
            return Ok(CachedReport {
                report,
                from_cache: true,
            });
        }
    }

    info!("Building report for {} from {}", team_id, source.name());
    let team_games = source.team_games(team_id).await?;
    let report = build_report(&team_games);
    if report.games_analyzed > 0 {
        cache.set(&key, &report).await;
    }

    Ok(CachedReport {
        report,
        from_cache: false,
    })
}

/// Plain-text rendering for the terminal.
pub fn render_text(report: &ScoutingReport) -> String {
    let mut out = String::new();
    let agg = &report.aggregates;

    let _ = writeln!(out, "Scouting report: {} ({})", report.team.name, report.team.id);
    let _ = writeln!(
        out,
        "{} games from {} series",
        report.games_analyzed, report.series_analyzed
    );

    if let Some(overview) = &agg.overview {
        let _ = writeln!(
            out,
            "Record {}-{}, K/D {:.2}",
            overview.games_won,
            overview.games_played - overview.games_won,
            overview.kd
        );
    }

    if let Some(pool) = agg.map_pool.as_ref().filter(|p| !p.is_empty()) {
        let _ = writeln!(out, "\nMap pool");
        for entry in pool {
            let _ = writeln!(
                out,
                "  {:<10} {}-{} ({}%) rounds {:+}",
                entry.map, entry.wins, entry.losses, entry.win_rate, entry.round_diff
            );
        }
    }

    if let Some(sides) = &agg.round_sides {
        let _ = writeln!(
            out,
            "\nAttack {:.0}% / Defense {:.0}% / Pistols {:.0}%",
            sides.attack.rate(),
            sides.defense.rate(),
            sides.pistol_total().rate()
        );
    }

    match &agg.first_blood {
        Some(fb) => {
            let _ = writeln!(
                out,
                "First blood {:.0}% of rounds, converts {:.0}%",
                fb.team_fb_rate, fb.fb_conversion_rate
            );
        }
        None => {
            let _ = writeln!(out, "First blood data unavailable");
        }
    }

    let _ = writeln!(out, "\nInsights");
    for insight in &report.insights {
        let _ = writeln!(out, "  [{}] {}", insight.category, insight.text);
    }
    out
}
