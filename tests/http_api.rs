use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use reqwest::blocking::Client;
use serde_json::{Value, json};

use league_terminal::api::{
    ApiError, LeagueApi, LeagueUpdate, NewLeague, NewTeam, StatisticUpdate,
};
use league_terminal::http_api::HttpApi;

struct Captured {
    request_line: String,
    body: String,
}

impl Captured {
    fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body should be json")
    }
}

/// Accepts one connection, records the request and answers with `status`
/// and `reply`.
fn serve_once(status: &'static str, reply: &'static str) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().expect("accept");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("request line");
        let mut content_length = 0usize;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).expect("header line");
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((name, value)) = line.split_once(':') {
                if name.eq_ignore_ascii_case("content-length") {
                    content_length = value.trim().parse().expect("content length");
                }
            }
        }
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).expect("request body");

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{reply}",
            reply.len()
        )
        .expect("write reply");
        stream.flush().expect("flush reply");

        Captured {
            request_line: request_line.trim_end().to_string(),
            body: String::from_utf8(body).expect("utf8 body"),
        }
    });
    (format!("http://{addr}"), handle)
}

fn api_for(base_url: &str) -> HttpApi {
    let client = Client::builder().no_proxy().build().expect("client");
    HttpApi::new(client, base_url)
}

const OK: &str = "200 OK";
const MESSAGE: &str = r#"{"message": "ok"}"#;

#[test]
fn create_league_posts_json_body() {
    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base)
        .create_league(&NewLeague {
            league_id: 1,
            name: "Premier".to_string(),
            country: "England".to_string(),
        })
        .expect("create");
    let req = server.join().expect("server thread");
    assert_eq!(req.request_line, "POST /api/leagues/ HTTP/1.1");
    assert_eq!(
        req.json(),
        json!({"league_id": 1, "name": "Premier", "country": "England"})
    );
}

#[test]
fn add_team_sends_team_name_key() {
    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base)
        .add_team(
            3,
            &NewTeam {
                team_id: 10,
                team_name: "Northbridge".to_string(),
                manager: "A. Stone".to_string(),
            },
        )
        .expect("add team");
    let req = server.join().expect("server thread");
    assert_eq!(req.request_line, "POST /api/leagues/3/teams/ HTTP/1.1");
    assert_eq!(
        req.json(),
        json!({"team_id": 10, "team_name": "Northbridge", "manager": "A. Stone"})
    );
}

#[test]
fn update_league_omits_absent_fields() {
    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base)
        .update_league(
            3,
            &LeagueUpdate {
                name: None,
                country: Some("Spain".to_string()),
            },
        )
        .expect("update");
    let req = server.join().expect("server thread");
    assert_eq!(req.request_line, "PUT /api/leagues/3 HTTP/1.1");
    assert_eq!(req.json(), json!({"country": "Spain"}));
}

#[test]
fn empty_league_update_serializes_to_empty_object() {
    let raw = serde_json::to_string(&LeagueUpdate::default()).expect("serialize");
    assert_eq!(raw, "{}");
}

#[test]
fn track_statistic_uses_query_string() {
    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base)
        .track_statistic(3, 4, "Clean sheets")
        .expect("track");
    let req = server.join().expect("server thread");
    assert_eq!(
        req.request_line,
        "POST /api/leagues/3/statistics/?stat_id=4&description=Clean+sheets HTTP/1.1"
    );
    assert!(req.body.is_empty());
}

#[test]
fn upsert_statistic_puts_full_payload() {
    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base)
        .upsert_statistic(
            3,
            &StatisticUpdate {
                stat_id: 4,
                description: "Corners".to_string(),
                team_id: 10,
                value: 7,
            },
        )
        .expect("upsert");
    let req = server.join().expect("server thread");
    assert_eq!(req.request_line, "PUT /api/leagues/3/statistics/ HTTP/1.1");
    assert_eq!(
        req.json(),
        json!({"stat_id": 4, "description": "Corners", "team_id": 10, "value": 7})
    );
}

#[test]
fn reads_and_deletes_hit_expected_paths() {
    let (base, server) = serve_once(OK, "[]");
    let leagues = api_for(&base).list_leagues().expect("list");
    assert!(leagues.is_empty());
    assert_eq!(
        server.join().expect("server thread").request_line,
        "GET /api/leagues/ HTTP/1.1"
    );

    let (base, server) = serve_once(OK, "[]");
    api_for(&base).list_teams(3).expect("teams");
    assert_eq!(
        server.join().expect("server thread").request_line,
        "GET /api/leagues/3/teams/ HTTP/1.1"
    );

    let (base, server) = serve_once(OK, "{}");
    api_for(&base).get_statistics(3).expect("statistics");
    assert_eq!(
        server.join().expect("server thread").request_line,
        "GET /api/leagues/3/statistics/ HTTP/1.1"
    );

    let (base, server) = serve_once(OK, r#"{"league_id": 3, "name": "Cup", "country": "Wales"}"#);
    let detail = api_for(&base).get_league(3).expect("detail");
    assert_eq!(detail.league.name, "Cup");
    assert_eq!(
        server.join().expect("server thread").request_line,
        "GET /api/leagues/3 HTTP/1.1"
    );

    let (base, server) = serve_once(OK, MESSAGE);
    api_for(&base).delete_league(3).expect("delete");
    assert_eq!(
        server.join().expect("server thread").request_line,
        "DELETE /api/leagues/3 HTTP/1.1"
    );
}

#[test]
fn server_error_detail_reaches_caller() {
    let (base, server) = serve_once(
        "404 Not Found",
        r#"{"detail": "Team ID 9 not found in league 3"}"#,
    );
    let err = api_for(&base).remove_team(3, 9).expect_err("404");
    assert_eq!(
        server.join().expect("server thread").request_line,
        "DELETE /api/leagues/3/teams/9 HTTP/1.1"
    );
    assert_eq!(err, ApiError::server(404, "Team ID 9 not found in league 3"));
}
