use std::collections::VecDeque;
use std::time::{Duration, Instant};

use chrono::Local;

use crate::api::{
    League, LeagueDetail, LeagueUpdate, NewLeague, NewTeam, StatisticUpdate, Statistics, Team,
};
use crate::forms::{Form, FormError, FormKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Leagues,
    Teams,
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Leagues, Tab::Teams, Tab::Statistics];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Leagues => "Leagues",
            Tab::Teams => "Teams",
            Tab::Statistics => "Statistics",
        }
    }

    pub fn next(self) -> Tab {
        match self {
            Tab::Leagues => Tab::Teams,
            Tab::Teams => Tab::Statistics,
            Tab::Statistics => Tab::Leagues,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Browse,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

/// League selector backing the Teams and Statistics tabs. Index 0 is the
/// "Select a league..." entry.
#[derive(Debug, Clone, Default)]
pub struct LeaguePicker {
    pub leagues: Vec<League>,
    pub selected: usize,
}

impl LeaguePicker {
    /// Replaces the options, keeping the current choice when it still exists.
    pub fn set_leagues(&mut self, leagues: Vec<League>) {
        let current = self.selected_league();
        self.leagues = leagues;
        self.selected = 0;
        if let Some(id) = current {
            self.select_league(id);
        }
    }

    pub fn select_league(&mut self, league_id: i64) {
        if let Some(pos) = self.leagues.iter().position(|l| l.league_id == league_id) {
            self.selected = pos + 1;
        }
    }

    pub fn selected_league(&self) -> Option<i64> {
        let idx = self.selected.checked_sub(1)?;
        self.leagues.get(idx).map(|l| l.league_id)
    }

    pub fn next(&mut self) {
        let total = self.leagues.len() + 1;
        self.selected = (self.selected + 1) % total;
    }

    pub fn prev(&mut self) {
        let total = self.leagues.len() + 1;
        self.selected = (self.selected + total - 1) % total;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingConfirm {
    pub prompt: String,
    pub command: ApiCommand,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub tab: Tab,
    pub focus: Focus,
    pub leagues: Vec<League>,
    pub leagues_loaded: bool,
    pub league_selected: usize,
    pub team_picker: LeaguePicker,
    pub teams_league: Option<i64>,
    pub teams: Vec<Team>,
    pub team_selected: usize,
    pub stats_picker: LeaguePicker,
    pub stats_league: Option<i64>,
    pub statistics: Statistics,
    pub stats_scroll: u16,
    pub league_form: Form,
    pub team_form: Form,
    pub stat_form: Form,
    pub detail: Option<LeagueDetail>,
    pub confirm: Option<PendingConfirm>,
    pub toast: Option<Toast>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::Leagues,
            focus: Focus::Browse,
            leagues: Vec::new(),
            leagues_loaded: false,
            league_selected: 0,
            team_picker: LeaguePicker::default(),
            teams_league: None,
            teams: Vec::new(),
            team_selected: 0,
            stats_picker: LeaguePicker::default(),
            stats_league: None,
            statistics: Statistics::new(),
            stats_scroll: 0,
            league_form: Form::new(FormKind::CreateLeague),
            team_form: Form::new(FormKind::AddTeam),
            stat_form: Form::new(FormKind::UpdateStatistic),
            detail: None,
            confirm: None,
            toast: None,
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// Activates `tab` and returns the fetch that repopulates it.
    pub fn switch_tab(&mut self, tab: Tab) -> ApiCommand {
        self.tab = tab;
        self.focus = Focus::Browse;
        match tab {
            Tab::Leagues => ApiCommand::LoadLeagues,
            Tab::Teams | Tab::Statistics => ApiCommand::LoadLeagueOptions { tab },
        }
    }

    pub fn form(&self, tab: Tab) -> &Form {
        match tab {
            Tab::Leagues => &self.league_form,
            Tab::Teams => &self.team_form,
            Tab::Statistics => &self.stat_form,
        }
    }

    pub fn form_mut(&mut self, tab: Tab) -> &mut Form {
        match tab {
            Tab::Leagues => &mut self.league_form,
            Tab::Teams => &mut self.team_form,
            Tab::Statistics => &mut self.stat_form,
        }
    }

    pub fn picker_mut(&mut self, tab: Tab) -> Option<&mut LeaguePicker> {
        match tab {
            Tab::Leagues => None,
            Tab::Teams => Some(&mut self.team_picker),
            Tab::Statistics => Some(&mut self.stats_picker),
        }
    }

    pub fn submit_form(&mut self) -> Option<ApiCommand> {
        match self.form(self.tab).submit() {
            Ok(command) => Some(command),
            Err(err) => {
                self.reject_form(err);
                None
            }
        }
    }

    fn reject_form(&mut self, err: FormError) {
        self.show_notice(NoticeKind::Error, err.to_string());
    }

    /// The "load" action of the current tab.
    pub fn load_current(&mut self) -> Option<ApiCommand> {
        match self.tab {
            Tab::Leagues => Some(ApiCommand::LoadLeagues),
            Tab::Teams => match self.team_picker.selected_league() {
                Some(league_id) => Some(ApiCommand::LoadTeams { league_id }),
                None => self.require_league(),
            },
            Tab::Statistics => match self.stats_picker.selected_league() {
                Some(league_id) => Some(ApiCommand::LoadStatistics { league_id }),
                None => self.require_league(),
            },
        }
    }

    fn require_league(&mut self) -> Option<ApiCommand> {
        self.show_notice(NoticeKind::Error, "Please select a league");
        None
    }

    pub fn selected_league(&self) -> Option<&League> {
        self.leagues.get(self.league_selected)
    }

    pub fn selected_team(&self) -> Option<&Team> {
        self.teams.get(self.team_selected)
    }

    pub fn view_selected_league(&self) -> Option<ApiCommand> {
        self.selected_league().map(|l| ApiCommand::ViewLeague {
            league_id: l.league_id,
        })
    }

    /// Stages the delete/remove action of the current tab behind a prompt.
    pub fn request_delete(&mut self) {
        let pending = match self.tab {
            Tab::Leagues => self.selected_league().map(|l| PendingConfirm {
                prompt: "Are you sure you want to delete this league?".to_string(),
                command: ApiCommand::DeleteLeague {
                    league_id: l.league_id,
                },
            }),
            Tab::Teams => match (self.teams_league, self.selected_team()) {
                (Some(league_id), Some(team)) => Some(PendingConfirm {
                    prompt: "Are you sure you want to remove this team?".to_string(),
                    command: ApiCommand::RemoveTeam {
                        league_id,
                        team_id: team.team_id,
                    },
                }),
                _ => None,
            },
            Tab::Statistics => None,
        };
        if pending.is_some() {
            self.confirm = pending;
        }
    }

    pub fn confirm_pending(&mut self) -> Option<ApiCommand> {
        self.confirm.take().map(|pending| pending.command)
    }

    pub fn cancel_pending(&mut self) {
        self.confirm = None;
    }

    pub fn select_next(&mut self) {
        match self.tab {
            Tab::Leagues => {
                if self.league_selected + 1 < self.leagues.len() {
                    self.league_selected += 1;
                }
            }
            Tab::Teams => {
                if self.team_selected + 1 < self.teams.len() {
                    self.team_selected += 1;
                }
            }
            Tab::Statistics => self.stats_scroll = self.stats_scroll.saturating_add(1),
        }
    }

    pub fn select_prev(&mut self) {
        match self.tab {
            Tab::Leagues => self.league_selected = self.league_selected.saturating_sub(1),
            Tab::Teams => self.team_selected = self.team_selected.saturating_sub(1),
            Tab::Statistics => self.stats_scroll = self.stats_scroll.saturating_sub(1),
        }
    }

    pub fn clamp_selection(&mut self) {
        self.league_selected = self
            .league_selected
            .min(self.leagues.len().saturating_sub(1));
        self.team_selected = self.team_selected.min(self.teams.len().saturating_sub(1));
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        let stamp = Local::now().format("%H:%M:%S");
        self.logs.push_back(format!("{stamp} {}", msg.into()));
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn show_notice(&mut self, kind: NoticeKind, message: impl Into<String>) {
        let message = message.into();
        let level = match kind {
            NoticeKind::Success => "[INFO]",
            NoticeKind::Error => "[ERROR]",
        };
        self.push_log(format!("{level} {message}"));
        self.toast = Some(Toast {
            message,
            kind,
            shown_at: Instant::now(),
        });
    }

    pub fn clear_toast_after(&mut self, now: Instant, keep: Duration) {
        let Some(toast) = &self.toast else {
            return;
        };
        if now.duration_since(toast.shown_at) >= keep {
            self.toast = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiCommand {
    LoadLeagues,
    LoadLeagueOptions {
        tab: Tab,
    },
    ViewLeague {
        league_id: i64,
    },
    CreateLeague(NewLeague),
    UpdateLeague {
        league_id: i64,
        update: LeagueUpdate,
    },
    DeleteLeague {
        league_id: i64,
    },
    AddTeam {
        league_id: i64,
        team: NewTeam,
    },
    LoadTeams {
        league_id: i64,
    },
    RemoveTeam {
        league_id: i64,
        team_id: i64,
    },
    TrackStatistic {
        league_id: i64,
        stat_id: i64,
        description: String,
    },
    UpsertStatistic {
        league_id: i64,
        update: StatisticUpdate,
    },
    LoadStatistics {
        league_id: i64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delta {
    SetLeagues(Vec<League>),
    SetLeagueOptions {
        tab: Tab,
        leagues: Vec<League>,
    },
    SetLeagueDetail(LeagueDetail),
    SetTeams {
        league_id: i64,
        teams: Vec<Team>,
    },
    SetStatistics {
        league_id: i64,
        statistics: Statistics,
    },
    ResetForm(FormKind),
    Notice {
        kind: NoticeKind,
        message: String,
    },
    Log(String),
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::SetLeagues(leagues) => {
            state.leagues = leagues;
            state.leagues_loaded = true;
            state.clamp_selection();
        }
        Delta::SetLeagueOptions { tab, leagues } => {
            if let Some(picker) = state.picker_mut(tab) {
                picker.set_leagues(leagues);
            }
        }
        Delta::SetLeagueDetail(detail) => {
            state.detail = Some(detail);
        }
        Delta::SetTeams { league_id, teams } => {
            state.teams_league = Some(league_id);
            state.teams = teams;
            state.team_picker.select_league(league_id);
            state.clamp_selection();
        }
        Delta::SetStatistics {
            league_id,
            statistics,
        } => {
            state.stats_league = Some(league_id);
            state.statistics = statistics;
            state.stats_scroll = 0;
            state.stats_picker.select_league(league_id);
        }
        Delta::ResetForm(kind) => {
            let form = state.form_mut(kind.tab());
            if form.kind == kind {
                form.reset();
            }
        }
        Delta::Notice { kind, message } => state.show_notice(kind, message),
        Delta::Log(msg) => state.push_log(msg),
    }
}
