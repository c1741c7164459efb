//! GraphQL documents sent to GRID.

/// Series state with round segments, first kills and agents.
pub const SERIES_STATE_ENHANCED: &str = r#"
query GetSeriesState($id: ID!) {
  seriesState(id: $id) {
    id
    finished
    games {
      id
      sequenceNumber
      finished
      map { name }
      teams {
        id
        name
        side
        won
        score
        players {
          id
          name
          kills
          deaths
          character { name }
        }
      }
      segments {
        sequenceNumber
        teams {
          id
          name
          side
          won
          players {
            id
            name
            kills
            deaths
            firstKill
          }
        }
      }
    }
  }
}
"#;

/// Series state restricted to fields every feed tier serves.
pub const SERIES_STATE_BASIC: &str = r#"
query GetSeriesState($id: ID!) {
  seriesState(id: $id) {
    id
    finished
    games {
      id
      sequenceNumber
      finished
      map { name }
      teams {
        id
        name
        side
        won
        score
        players {
          id
          name
          kills
          deaths
        }
      }
    }
  }
}
"#;

/// Series of one tournament, used for both the team directory and series
/// discovery.
pub const TOURNAMENT_SERIES: &str = r#"
query GetSeriesByTournament($tournamentId: ID!, $first: Int!) {
  tournament(id: $tournamentId) {
    id
    name
  }
  allSeries(filter: { tournamentId: $tournamentId }, first: $first) {
    edges {
      node {
        id
        startTimeScheduled
        tournament {
          id
          name
        }
        teams {
          baseInfo {
            id
            name
            logoUrl
          }
        }
      }
    }
  }
}
"#;
