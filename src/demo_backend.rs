use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::api::{
    ApiError, ApiMessage, ApiResult, DetailStatistic, League, LeagueApi, LeagueDetail,
    LeagueUpdate, NewLeague, NewTeam, Statistic, StatisticUpdate, Statistics, Team,
};

const BAD_REQUEST: u16 = 400;
const NOT_FOUND: u16 = 404;

/// In-memory stand-in for the league service, answering with the same status
/// codes and texts. Used for `--demo` runs and as a test double.
#[derive(Debug, Default)]
pub struct DemoBackend {
    store: Mutex<BTreeMap<i64, DemoLeague>>,
}

#[derive(Debug, Clone)]
struct DemoLeague {
    name: String,
    country: String,
    teams: Vec<Team>,
    statistics: Statistics,
}

impl DemoLeague {
    fn info(&self, league_id: i64) -> League {
        League {
            league_id,
            name: self.name.clone(),
            country: self.country.clone(),
            teams: self.teams.len() as i64,
        }
    }
}

impl DemoBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend preloaded with a couple of leagues so the UI has something
    /// to show.
    pub fn seeded() -> Self {
        let backend = Self::new();
        for (league, teams) in seed_leagues() {
            let league_id = league.league_id;
            // Seed ids are distinct; nothing here can collide.
            let _ = backend.create_league(&league);
            for team in teams {
                let _ = backend.add_team(league_id, &team);
            }
        }
        let _ = backend.upsert_statistic(
            1,
            &StatisticUpdate {
                stat_id: 1,
                description: "Goals scored".to_string(),
                team_id: 10,
                value: 42,
            },
        );
        let _ = backend.upsert_statistic(
            1,
            &StatisticUpdate {
                stat_id: 1,
                description: "Goals scored".to_string(),
                team_id: 11,
                value: 37,
            },
        );
        backend
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<i64, DemoLeague>> {
        self.store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn not_found(league_id: i64) -> ApiError {
    ApiError::server(NOT_FOUND, format!("League ID {league_id} not found"))
}

fn message(text: impl Into<String>) -> ApiMessage {
    ApiMessage {
        message: text.into(),
    }
}

impl LeagueApi for DemoBackend {
    fn create_league(&self, league: &NewLeague) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        if store.contains_key(&league.league_id) {
            return Err(ApiError::server(
                BAD_REQUEST,
                format!("League ID {} already exists", league.league_id),
            ));
        }
        store.insert(
            league.league_id,
            DemoLeague {
                name: league.name.clone(),
                country: league.country.clone(),
                teams: Vec::new(),
                statistics: Statistics::new(),
            },
        );
        Ok(message(format!("League '{}' created successfully", league.name)))
    }

    fn list_leagues(&self) -> ApiResult<Vec<League>> {
        let store = self.lock();
        Ok(store.iter().map(|(id, league)| league.info(*id)).collect())
    }

    fn get_league(&self, league_id: i64) -> ApiResult<LeagueDetail> {
        let store = self.lock();
        let league = store.get(&league_id).ok_or_else(|| not_found(league_id))?;
        Ok(LeagueDetail {
            league: league.info(league_id),
            teams_list: league.teams.clone(),
            statistics: league
                .statistics
                .iter()
                .map(|(id, stat)| (*id, DetailStatistic::Full(stat.clone())))
                .collect(),
        })
    }

    fn update_league(&self, league_id: i64, update: &LeagueUpdate) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        let league = store
            .get_mut(&league_id)
            .ok_or_else(|| not_found(league_id))?;
        if let Some(name) = &update.name {
            league.name = name.clone();
        }
        if let Some(country) = &update.country {
            league.country = country.clone();
        }
        Ok(message("League updated successfully"))
    }

    fn delete_league(&self, league_id: i64) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        store.remove(&league_id).ok_or_else(|| not_found(league_id))?;
        Ok(message(format!("League ID {league_id} deleted successfully")))
    }

    fn add_team(&self, league_id: i64, team: &NewTeam) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        let league = store
            .get_mut(&league_id)
            .ok_or_else(|| not_found(league_id))?;
        if league.teams.iter().any(|t| t.team_id == team.team_id) {
            return Err(ApiError::server(
                BAD_REQUEST,
                format!(
                    "Team ID {} already exists in league {league_id}",
                    team.team_id
                ),
            ));
        }
        league.teams.push(Team {
            team_id: team.team_id,
            name: team.team_name.clone(),
            manager: team.manager.clone(),
        });
        Ok(message(format!(
            "Team '{}' added successfully",
            team.team_name
        )))
    }

    fn list_teams(&self, league_id: i64) -> ApiResult<Vec<Team>> {
        let store = self.lock();
        let league = store.get(&league_id).ok_or_else(|| not_found(league_id))?;
        Ok(league.teams.clone())
    }

    fn remove_team(&self, league_id: i64, team_id: i64) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        let league = store
            .get_mut(&league_id)
            .ok_or_else(|| not_found(league_id))?;
        let before = league.teams.len();
        league.teams.retain(|t| t.team_id != team_id);
        if league.teams.len() == before {
            return Err(ApiError::server(
                NOT_FOUND,
                format!("Team ID {team_id} not found in league {league_id}"),
            ));
        }
        Ok(message(format!("Team ID {team_id} removed successfully")))
    }

    fn track_statistic(
        &self,
        league_id: i64,
        stat_id: i64,
        description: &str,
    ) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        let league = store
            .get_mut(&league_id)
            .ok_or_else(|| not_found(league_id))?;
        if league.statistics.contains_key(&stat_id) {
            return Err(ApiError::server(
                BAD_REQUEST,
                format!("Statistic ID {stat_id} already exists in league {league_id}"),
            ));
        }
        league.statistics.insert(
            stat_id,
            Statistic {
                description: description.to_string(),
                data: BTreeMap::new(),
            },
        );
        Ok(message("Statistic tracker created successfully"))
    }

    fn upsert_statistic(
        &self,
        league_id: i64,
        update: &StatisticUpdate,
    ) -> ApiResult<ApiMessage> {
        let mut store = self.lock();
        let league = store
            .get_mut(&league_id)
            .ok_or_else(|| not_found(league_id))?;
        let stat = league.statistics.entry(update.stat_id).or_default();
        stat.description = update.description.clone();
        stat.data.insert(update.team_id, update.value);
        Ok(message("Statistics updated successfully"))
    }

    fn get_statistics(&self, league_id: i64) -> ApiResult<Statistics> {
        let store = self.lock();
        let league = store.get(&league_id).ok_or_else(|| not_found(league_id))?;
        Ok(league.statistics.clone())
    }
}

fn seed_leagues() -> Vec<(NewLeague, Vec<NewTeam>)> {
    vec![
        (
            NewLeague {
                league_id: 1,
                name: "Premier".to_string(),
                country: "England".to_string(),
            },
            vec![
                seed_team(10, "Northbridge FC", "A. Stone"),
                seed_team(11, "Harbour City", "R. Vega"),
            ],
        ),
        (
            NewLeague {
                league_id: 2,
                name: "Liga Norte".to_string(),
                country: "Spain".to_string(),
            },
            vec![seed_team(20, "Atletico Sierra", "M. Holt")],
        ),
    ]
}

fn seed_team(team_id: i64, name: &str, manager: &str) -> NewTeam {
    NewTeam {
        team_id,
        team_name: name.to_string(),
        manager: manager.to_string(),
    }
}
