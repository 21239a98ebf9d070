use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::api::{ApiError, ApiMessage, ApiResult, LeagueApi};
use crate::forms::FormKind;
use crate::state::{ApiCommand, Delta, NoticeKind};

/// Runs API calls off the UI thread. Commands are served in the order they
/// were sent; the worker exits once the UI drops its sender.
pub fn spawn_api_worker(
    api: Box<dyn LeagueApi + Send>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ApiCommand>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for cmd in cmd_rx {
            for delta in handle_command(api.as_ref(), cmd) {
                if tx.send(delta).is_err() {
                    return;
                }
            }
        }
    })
}

/// Executes one command and returns the state changes it produces.
pub fn handle_command(api: &dyn LeagueApi, cmd: ApiCommand) -> Vec<Delta> {
    match cmd {
        ApiCommand::LoadLeagues => load_leagues(api),
        ApiCommand::LoadLeagueOptions { tab } => match api.list_leagues() {
            Ok(leagues) => vec![Delta::SetLeagueOptions { tab, leagues }],
            Err(err) => failure(err),
        },
        ApiCommand::ViewLeague { league_id } => match api.get_league(league_id) {
            Ok(detail) => vec![Delta::SetLeagueDetail(detail)],
            Err(err) => failure(err),
        },
        ApiCommand::CreateLeague(league) => mutation(
            api.create_league(&league),
            Some(FormKind::CreateLeague),
            || load_leagues(api),
        ),
        ApiCommand::UpdateLeague { league_id, update } => mutation(
            api.update_league(league_id, &update),
            Some(FormKind::UpdateLeague),
            || load_leagues(api),
        ),
        ApiCommand::DeleteLeague { league_id } => {
            mutation(api.delete_league(league_id), None, || load_leagues(api))
        }
        ApiCommand::AddTeam { league_id, team } => mutation(
            api.add_team(league_id, &team),
            Some(FormKind::AddTeam),
            || load_teams(api, league_id),
        ),
        ApiCommand::LoadTeams { league_id } => load_teams(api, league_id),
        ApiCommand::RemoveTeam { league_id, team_id } => mutation(
            api.remove_team(league_id, team_id),
            None,
            || load_teams(api, league_id),
        ),
        ApiCommand::TrackStatistic {
            league_id,
            stat_id,
            description,
        } => mutation(
            api.track_statistic(league_id, stat_id, &description),
            Some(FormKind::TrackStatistic),
            || load_statistics(api, league_id),
        ),
        ApiCommand::UpsertStatistic { league_id, update } => mutation(
            api.upsert_statistic(league_id, &update),
            Some(FormKind::UpdateStatistic),
            || load_statistics(api, league_id),
        ),
        ApiCommand::LoadStatistics { league_id } => load_statistics(api, league_id),
    }
}

fn load_leagues(api: &dyn LeagueApi) -> Vec<Delta> {
    match api.list_leagues() {
        Ok(leagues) => vec![Delta::SetLeagues(leagues)],
        Err(err) => failure(err),
    }
}

fn load_teams(api: &dyn LeagueApi, league_id: i64) -> Vec<Delta> {
    match api.list_teams(league_id) {
        Ok(teams) => vec![Delta::SetTeams { league_id, teams }],
        Err(err) => failure(err),
    }
}

fn load_statistics(api: &dyn LeagueApi, league_id: i64) -> Vec<Delta> {
    match api.get_statistics(league_id) {
        Ok(statistics) => vec![Delta::SetStatistics {
            league_id,
            statistics,
        }],
        Err(err) => failure(err),
    }
}

fn mutation(
    result: ApiResult<ApiMessage>,
    reset: Option<FormKind>,
    reload: impl FnOnce() -> Vec<Delta>,
) -> Vec<Delta> {
    let reply = match result {
        Ok(reply) => reply,
        Err(err) => return failure(err),
    };
    let mut deltas = vec![Delta::Notice {
        kind: NoticeKind::Success,
        message: reply.message,
    }];
    if let Some(kind) = reset {
        deltas.push(Delta::ResetForm(kind));
    }
    deltas.extend(reload());
    deltas
}

fn failure(err: ApiError) -> Vec<Delta> {
    let mut deltas = Vec::new();
    if let Some(reason) = err.reason() {
        deltas.push(Delta::Log(format!("[WARN] {err}: {reason}")));
    }
    deltas.push(Delta::Notice {
        kind: NoticeKind::Error,
        message: err.to_string(),
    });
    deltas
}
