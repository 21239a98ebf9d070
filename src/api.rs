use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct League {
    pub league_id: i64,
    pub name: String,
    pub country: String,
    /// Number of teams currently registered in the league.
    #[serde(default)]
    pub teams: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LeagueDetail {
    #[serde(flatten)]
    pub league: League,
    #[serde(default)]
    pub teams_list: Vec<Team>,
    #[serde(default)]
    pub statistics: BTreeMap<i64, DetailStatistic>,
}

/// The detail endpoint may embed either full statistics or just the
/// per-team values, depending on the backend version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStatistic {
    Full(Statistic),
    Values(BTreeMap<i64, i64>),
}

// Decoded through `Value`: untagged buffering cannot turn the string keys of
// a JSON object into integer team ids.
impl<'de> Deserialize<'de> for DetailStatistic {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.get("description").is_some() {
            serde_json::from_value(value)
                .map(DetailStatistic::Full)
                .map_err(D::Error::custom)
        } else {
            serde_json::from_value(value)
                .map(DetailStatistic::Values)
                .map_err(D::Error::custom)
        }
    }
}

impl DetailStatistic {
    pub fn description(&self) -> Option<&str> {
        match self {
            DetailStatistic::Full(stat) => Some(stat.description.as_str()),
            DetailStatistic::Values(_) => None,
        }
    }

    pub fn values(&self) -> &BTreeMap<i64, i64> {
        match self {
            DetailStatistic::Full(stat) => &stat.data,
            DetailStatistic::Values(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub team_id: i64,
    pub name: String,
    pub manager: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Statistic {
    pub description: String,
    #[serde(default)]
    pub data: BTreeMap<i64, i64>,
}

pub type Statistics = BTreeMap<i64, Statistic>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewLeague {
    pub league_id: i64,
    pub name: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LeagueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTeam {
    pub team_id: i64,
    pub team_name: String,
    pub manager: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticUpdate {
    pub stat_id: i64,
    pub description: String,
    pub team_id: i64,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateLeague,
    ListLeagues,
    GetLeague,
    UpdateLeague,
    DeleteLeague,
    AddTeam,
    ListTeams,
    RemoveTeam,
    TrackStatistic,
    UpsertStatistic,
    GetStatistics,
}

impl Operation {
    /// Fixed text shown when the request never produced a usable response.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::CreateLeague => "Error creating league",
            Operation::ListLeagues => "Error loading leagues",
            Operation::GetLeague => "Error loading league details",
            Operation::UpdateLeague => "Error updating league",
            Operation::DeleteLeague => "Error deleting league",
            Operation::AddTeam => "Error adding team",
            Operation::ListTeams => "Error loading teams",
            Operation::RemoveTeam => "Error removing team",
            Operation::TrackStatistic => "Error creating statistic tracker",
            Operation::UpsertStatistic => "Error updating statistics",
            Operation::GetStatistics => "Error loading statistics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{detail}")]
    Server { status: u16, detail: String },
    #[error("{}", .op.failure_message())]
    Network { op: Operation, reason: String },
}

impl ApiError {
    pub fn server(status: u16, detail: impl Into<String>) -> Self {
        ApiError::Server {
            status,
            detail: detail.into(),
        }
    }

    pub fn network(op: Operation, reason: impl ToString) -> Self {
        ApiError::Network {
            op,
            reason: reason.to_string(),
        }
    }

    /// Underlying cause, for the console log. Server errors have none beyond
    /// their detail.
    pub fn reason(&self) -> Option<&str> {
        match self {
            ApiError::Server { .. } => None,
            ApiError::Network { reason, .. } => Some(reason.as_str()),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The league backend as seen from the UI. Implemented over HTTP and by the
/// in-memory demo backend.
pub trait LeagueApi {
    fn create_league(&self, league: &NewLeague) -> ApiResult<ApiMessage>;
    fn list_leagues(&self) -> ApiResult<Vec<League>>;
    fn get_league(&self, league_id: i64) -> ApiResult<LeagueDetail>;
    fn update_league(&self, league_id: i64, update: &LeagueUpdate) -> ApiResult<ApiMessage>;
    fn delete_league(&self, league_id: i64) -> ApiResult<ApiMessage>;
    fn add_team(&self, league_id: i64, team: &NewTeam) -> ApiResult<ApiMessage>;
    fn list_teams(&self, league_id: i64) -> ApiResult<Vec<Team>>;
    fn remove_team(&self, league_id: i64, team_id: i64) -> ApiResult<ApiMessage>;
    fn track_statistic(
        &self,
        league_id: i64,
        stat_id: i64,
        description: &str,
    ) -> ApiResult<ApiMessage>;
    fn upsert_statistic(&self, league_id: i64, update: &StatisticUpdate)
    -> ApiResult<ApiMessage>;
    fn get_statistics(&self, league_id: i64) -> ApiResult<Statistics>;
}
