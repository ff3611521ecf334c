//! Datasets available from the college stats API and their request params.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dataset {
    PlayerSeasonStats,
    TeamSeasonStats,
    TeamAdvancedStats,
    AdvancedGameStats,
    PlayerPpa,
    TeamPpa,
    Games,
    TeamGameStats,
    Roster,
    FbsTeams,
}

impl Dataset {
    pub const ALL: [Dataset; 10] = [
        Dataset::AdvancedGameStats,
        Dataset::FbsTeams,
        Dataset::Games,
        Dataset::PlayerPpa,
        Dataset::PlayerSeasonStats,
        Dataset::Roster,
        Dataset::TeamAdvancedStats,
        Dataset::TeamGameStats,
        Dataset::TeamPpa,
        Dataset::TeamSeasonStats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dataset::PlayerSeasonStats => "player_season_stats",
            Dataset::TeamSeasonStats => "team_season_stats",
            Dataset::TeamAdvancedStats => "team_advanced_stats",
            Dataset::AdvancedGameStats => "advanced_game_stats",
            Dataset::PlayerPpa => "player_ppa",
            Dataset::TeamPpa => "team_ppa",
            Dataset::Games => "games",
            Dataset::TeamGameStats => "team_game_stats",
            Dataset::Roster => "roster",
            Dataset::FbsTeams => "fbs_teams",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Dataset::PlayerSeasonStats => "/stats/player/season",
            Dataset::TeamSeasonStats => "/stats/season",
            Dataset::TeamAdvancedStats => "/stats/season/advanced",
            Dataset::AdvancedGameStats => "/stats/game/advanced",
            Dataset::PlayerPpa => "/ppa/players/season",
            Dataset::TeamPpa => "/ppa/teams",
            Dataset::Games => "/games",
            Dataset::TeamGameStats => "/games/teams",
            Dataset::Roster => "/roster",
            Dataset::FbsTeams => "/teams/fbs",
        }
    }

    /// Game-level datasets take a `seasonType` parameter.
    pub fn uses_season_type(&self) -> bool {
        matches!(
            self,
            Dataset::Games | Dataset::TeamGameStats | Dataset::AdvancedGameStats | Dataset::TeamPpa
        )
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Dataset::ALL
            .into_iter()
            .find(|dataset| dataset.as_str() == wanted)
            .ok_or_else(|| FetchError::UnknownDataset {
                name: s.to_string(),
                valid: Dataset::ALL
                    .iter()
                    .map(Dataset::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// One dataset pull.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub dataset: Dataset,
    pub year: i32,
    pub team: Option<String>,
    pub conference: Option<String>,
    pub week: Option<u32>,
    pub season_type: String,
}

impl FetchRequest {
    pub fn new(dataset: Dataset, year: i32) -> Self {
        Self {
            dataset,
            year,
            team: None,
            conference: None,
            week: None,
            season_type: "regular".to_string(),
        }
    }

    /// Query parameters in API spelling.
    pub fn params(&self) -> BTreeMap<String, Value> {
        let mut params = BTreeMap::new();
        params.insert("year".to_string(), Value::from(self.year));
        if let Some(team) = &self.team {
            params.insert("team".to_string(), Value::from(team.as_str()));
        }
        if let Some(conference) = &self.conference {
            params.insert("conference".to_string(), Value::from(conference.as_str()));
        }
        if let Some(week) = self.week {
            params.insert("week".to_string(), Value::from(week));
        }
        if self.dataset.uses_season_type() {
            params.insert(
                "seasonType".to_string(),
                Value::from(self.season_type.as_str()),
            );
        }
        params
    }
}
