use league_terminal::api::{
    ApiError, League, LeagueApi, LeagueUpdate, NewLeague, NewTeam, StatisticUpdate,
};
use league_terminal::demo_backend::DemoBackend;

fn premier() -> NewLeague {
    NewLeague {
        league_id: 1,
        name: "Premier".to_string(),
        country: "England".to_string(),
    }
}

fn team(team_id: i64, name: &str) -> NewTeam {
    NewTeam {
        team_id,
        team_name: name.to_string(),
        manager: "M. Holt".to_string(),
    }
}

fn goals(team_id: i64, value: i64) -> StatisticUpdate {
    StatisticUpdate {
        stat_id: 1,
        description: "Goals".to_string(),
        team_id,
        value,
    }
}

#[test]
fn created_league_is_listed_with_zero_teams() {
    let api = DemoBackend::new();
    let reply = api.create_league(&premier()).expect("create should succeed");
    assert_eq!(reply.message, "League 'Premier' created successfully");

    let leagues = api.list_leagues().expect("list should succeed");
    assert_eq!(
        leagues,
        vec![League {
            league_id: 1,
            name: "Premier".to_string(),
            country: "England".to_string(),
            teams: 0,
        }]
    );
}

#[test]
fn duplicate_league_id_is_rejected() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("first create");
    let err = api.create_league(&premier()).expect_err("second create");
    assert_eq!(err, ApiError::server(400, "League ID 1 already exists"));
}

#[test]
fn deleted_league_disappears_and_missing_id_reports_detail() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    api.delete_league(1).expect("delete");
    assert!(api.list_leagues().expect("list").is_empty());

    let err = api.delete_league(1).expect_err("second delete");
    assert_eq!(err.to_string(), "League ID 1 not found");
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}

#[test]
fn added_team_is_listed_exactly_once() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    api.add_team(1, &team(10, "Northbridge")).expect("add");

    let teams = api.list_teams(1).expect("teams");
    assert_eq!(teams.iter().filter(|t| t.team_id == 10).count(), 1);
    assert_eq!(teams[0].name, "Northbridge");
    assert_eq!(api.list_leagues().expect("list")[0].teams, 1);

    let err = api
        .add_team(1, &team(10, "Northbridge"))
        .expect_err("duplicate team");
    assert!(matches!(err, ApiError::Server { status: 400, .. }));
    assert_eq!(api.list_teams(1).expect("teams").len(), 1);
}

#[test]
fn removing_unknown_team_is_not_found() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    let err = api.remove_team(1, 42).expect_err("missing team");
    assert_eq!(err.to_string(), "Team ID 42 not found in league 1");
}

#[test]
fn upserting_same_stat_overwrites() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    api.upsert_statistic(1, &goals(10, 3)).expect("first upsert");
    api.upsert_statistic(1, &goals(10, 5)).expect("second upsert");
    api.upsert_statistic(1, &goals(11, 2)).expect("other team");

    let stats = api.get_statistics(1).expect("stats");
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[&1].data.len(), 2);
    assert_eq!(stats[&1].data[&10], 5);
}

#[test]
fn tracker_then_upsert_keeps_single_entry() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    api.track_statistic(1, 1, "Goals").expect("track");
    assert!(api.track_statistic(1, 1, "Goals").is_err());
    api.upsert_statistic(1, &goals(10, 1)).expect("upsert");
    assert_eq!(api.get_statistics(1).expect("stats").len(), 1);
}

#[test]
fn update_league_changes_only_given_fields() {
    let api = DemoBackend::new();
    api.create_league(&premier()).expect("create");
    api.update_league(
        1,
        &LeagueUpdate {
            name: Some("Premiership".to_string()),
            country: None,
        },
    )
    .expect("update");
    let detail = api.get_league(1).expect("detail");
    assert_eq!(detail.league.name, "Premiership");
    assert_eq!(detail.league.country, "England");
}

#[test]
fn league_scoped_calls_on_missing_league_fail() {
    let api = DemoBackend::new();
    assert!(api.list_teams(5).is_err());
    assert!(api.get_statistics(5).is_err());
    assert!(api.get_league(5).is_err());
    assert_eq!(
        api.upsert_statistic(5, &goals(1, 1))
            .expect_err("missing league")
            .to_string(),
        "League ID 5 not found"
    );
}

#[test]
fn seeded_backend_has_leagues() {
    let api = DemoBackend::seeded();
    let leagues = api.list_leagues().expect("list");
    assert!(!leagues.is_empty());
    assert!(leagues.windows(2).all(|w| w[0].league_id < w[1].league_id));
}
