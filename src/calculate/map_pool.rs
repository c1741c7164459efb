//! Per-map win/loss aggregation.

use std::collections::HashMap;

use crate::models::{GameRecord, MapPoolEntry};

/// Bucket games by map and tally results.
///
/// Entries come back sorted by games played, most played first. Maps with
/// equal counts keep the order in which they were first seen.
pub fn analyze_map_pool(games: &[GameRecord]) -> Vec<MapPoolEntry> {
    let mut entries: Vec<MapPoolEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for game in games {
        let slot = *index.entry(game.map.as_str()).or_insert_with(|| {
            entries.push(MapPoolEntry::new(game.map.clone()));
            entries.len() - 1
        });

        let entry = &mut entries[slot];
        entry.played += 1;
        if game.won {
            entry.wins += 1;
        } else {
            entry.losses += 1;
        }
        entry.rounds_for += game.score;
        entry.rounds_against += game.opponent_score;
    }

    for entry in &mut entries {
        entry.finalize();
    }

    // sort_by is stable, so ties stay in first-seen order
    entries.sort_by(|a, b| b.played.cmp(&a.played));
    entries
}
