//! Display trees for the three tabs. Everything here is a pure function of the
//! last fetch result; drawing is left to the terminal front end.

use crate::api::{DetailStatistic, League, LeagueDetail, Statistics, Team};

pub const NO_LEAGUES: &str = "No leagues found. Create one to get started!";
pub const NO_TEAMS: &str = "No teams found in this league.";
pub const NO_STATISTICS: &str = "No statistics found for this league.";
pub const SELECT_LEAGUE: &str = "Select a league...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub fields: Vec<(&'static str, String)>,
    pub actions: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Placeholder(&'static str),
    Cards(Vec<Card>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCell {
    pub label: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatBlock {
    pub heading: String,
    pub cells: Vec<StatCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsView {
    Placeholder(&'static str),
    Blocks(Vec<StatBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: Option<i64>,
    pub label: String,
}

pub fn league_cards(leagues: &[League]) -> ListView {
    if leagues.is_empty() {
        return ListView::Placeholder(NO_LEAGUES);
    }
    ListView::Cards(
        leagues
            .iter()
            .map(|league| Card {
                title: league.name.clone(),
                fields: vec![
                    ("ID", league.league_id.to_string()),
                    ("Country", league.country.clone()),
                    ("Teams", league.teams.to_string()),
                ],
                actions: vec!["View Details", "Delete"],
            })
            .collect(),
    )
}

pub fn team_cards(teams: &[Team]) -> ListView {
    if teams.is_empty() {
        return ListView::Placeholder(NO_TEAMS);
    }
    ListView::Cards(
        teams
            .iter()
            .map(|team| Card {
                title: team.name.clone(),
                fields: vec![
                    ("Team ID", team.team_id.to_string()),
                    ("Manager", team.manager.clone()),
                ],
                actions: vec!["Remove"],
            })
            .collect(),
    )
}

/// Statistic -> contributing teams -> value.
pub fn statistics_view(stats: &Statistics) -> StatsView {
    if stats.is_empty() {
        return StatsView::Placeholder(NO_STATISTICS);
    }
    StatsView::Blocks(
        stats
            .iter()
            .map(|(stat_id, stat)| StatBlock {
                heading: format!("{} (ID: {stat_id})", stat.description),
                cells: stat
                    .data
                    .iter()
                    .map(|(team_id, value)| StatCell {
                        label: format!("Team {team_id}:"),
                        value: *value,
                    })
                    .collect(),
            })
            .collect(),
    )
}

pub fn league_options(leagues: &[League]) -> Vec<SelectOption> {
    let mut options = vec![SelectOption {
        value: None,
        label: SELECT_LEAGUE.to_string(),
    }];
    options.extend(leagues.iter().map(|league| SelectOption {
        value: Some(league.league_id),
        label: league.name.clone(),
    }));
    options
}

pub fn league_detail_lines(detail: &LeagueDetail) -> Vec<String> {
    let league = &detail.league;
    let mut lines = vec![
        league.name.clone(),
        format!("Country: {}", league.country),
        format!("Total Teams: {}", league.teams),
    ];

    if !detail.teams_list.is_empty() {
        lines.push(String::new());
        lines.push("Teams:".to_string());
        for team in &detail.teams_list {
            lines.push(format!("  {} (Manager: {})", team.name, team.manager));
        }
    }

    if !detail.statistics.is_empty() {
        lines.push(String::new());
        lines.push("Statistics:".to_string());
        for (stat_id, stat) in &detail.statistics {
            lines.push(detail_stat_line(*stat_id, stat));
        }
    }
    lines
}

fn detail_stat_line(stat_id: i64, stat: &DetailStatistic) -> String {
    let values = stat
        .values()
        .iter()
        .map(|(team_id, value)| format!("Team {team_id} = {value}"))
        .collect::<Vec<_>>();
    let values = if values.is_empty() {
        "no values".to_string()
    } else {
        values.join(", ")
    };
    match stat.description() {
        Some(description) => format!("  Stat {stat_id} ({description}): {values}"),
        None => format!("  Stat {stat_id}: {values}"),
    }
}
