use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::{
    ApiError, ApiMessage, ApiResult, League, LeagueApi, LeagueDetail, LeagueUpdate, NewLeague,
    NewTeam, Operation, StatisticUpdate, Statistics, Team,
};

/// `LeagueApi` over the REST backend rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    fn execute<T: DeserializeOwned>(&self, op: Operation, req: RequestBuilder) -> ApiResult<T> {
        let resp = req.send().map_err(|err| ApiError::network(op, err))?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|err| ApiError::network(op, err))?;
        decode_response(op, status, &body)
    }
}

impl LeagueApi for HttpApi {
    fn create_league(&self, league: &NewLeague) -> ApiResult<ApiMessage> {
        let req = self.request(Method::POST, "/api/leagues/").json(league);
        self.execute(Operation::CreateLeague, req)
    }

    fn list_leagues(&self) -> ApiResult<Vec<League>> {
        let req = self.request(Method::GET, "/api/leagues/");
        self.execute(Operation::ListLeagues, req)
    }

    fn get_league(&self, league_id: i64) -> ApiResult<LeagueDetail> {
        let req = self.request(Method::GET, &format!("/api/leagues/{league_id}"));
        self.execute(Operation::GetLeague, req)
    }

    fn update_league(&self, league_id: i64, update: &LeagueUpdate) -> ApiResult<ApiMessage> {
        let req = self
            .request(Method::PUT, &format!("/api/leagues/{league_id}"))
            .json(update);
        self.execute(Operation::UpdateLeague, req)
    }

    fn delete_league(&self, league_id: i64) -> ApiResult<ApiMessage> {
        let req = self.request(Method::DELETE, &format!("/api/leagues/{league_id}"));
        self.execute(Operation::DeleteLeague, req)
    }

    fn add_team(&self, league_id: i64, team: &NewTeam) -> ApiResult<ApiMessage> {
        let req = self
            .request(Method::POST, &format!("/api/leagues/{league_id}/teams/"))
            .json(team);
        self.execute(Operation::AddTeam, req)
    }

    fn list_teams(&self, league_id: i64) -> ApiResult<Vec<Team>> {
        let req = self.request(Method::GET, &format!("/api/leagues/{league_id}/teams/"));
        self.execute(Operation::ListTeams, req)
    }

    fn remove_team(&self, league_id: i64, team_id: i64) -> ApiResult<ApiMessage> {
        let req = self.request(
            Method::DELETE,
            &format!("/api/leagues/{league_id}/teams/{team_id}"),
        );
        self.execute(Operation::RemoveTeam, req)
    }

    fn track_statistic(
        &self,
        league_id: i64,
        stat_id: i64,
        description: &str,
    ) -> ApiResult<ApiMessage> {
        // The tracker endpoint takes its arguments as query parameters.
        let req = self
            .request(
                Method::POST,
                &format!("/api/leagues/{league_id}/statistics/"),
            )
            .query(&[
                ("stat_id", stat_id.to_string()),
                ("description", description.to_string()),
            ]);
        self.execute(Operation::TrackStatistic, req)
    }

    fn upsert_statistic(
        &self,
        league_id: i64,
        update: &StatisticUpdate,
    ) -> ApiResult<ApiMessage> {
        let req = self
            .request(Method::PUT, &format!("/api/leagues/{league_id}/statistics/"))
            .json(update);
        self.execute(Operation::UpsertStatistic, req)
    }

    fn get_statistics(&self, league_id: i64) -> ApiResult<Statistics> {
        let req = self.request(
            Method::GET,
            &format!("/api/leagues/{league_id}/statistics/"),
        );
        self.execute(Operation::GetStatistics, req)
    }
}

/// Turns a completed exchange into the operation's result. Non-2xx statuses
/// become server errors carrying the body's `detail`; a 2xx body that does
/// not decode is treated like a failed request.
pub fn decode_response<T: DeserializeOwned>(
    op: Operation,
    status: u16,
    body: &str,
) -> ApiResult<T> {
    if !(200..300).contains(&status) {
        return Err(ApiError::server(status, server_detail(status, body)));
    }
    serde_json::from_str(body.trim()).map_err(|err| ApiError::network(op, err))
}

/// Extracts the error text from an error body. Plain `detail` strings are
/// used as-is; validation arrays are flattened to their `msg` entries.
pub fn server_detail(status: u16, body: &str) -> String {
    let fallback = || format!("HTTP {status}");
    let Ok(root) = serde_json::from_str::<Value>(body.trim()) else {
        return fallback();
    };
    match root.get("detail") {
        Some(Value::String(detail)) if !detail.trim().is_empty() => detail.clone(),
        Some(Value::Array(items)) => {
            let msgs = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if msgs.is_empty() {
                fallback()
            } else {
                msgs.join("; ")
            }
        }
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::{HttpApi, server_detail};
    use crate::http_client::build_http_client;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = build_http_client(None).expect("client");
        let api = HttpApi::new(client, "http://localhost:8000///");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/api/leagues/"), "http://localhost:8000/api/leagues/");
    }

    #[test]
    fn detail_falls_back_to_status_for_non_json() {
        assert_eq!(server_detail(502, "<html>Bad Gateway</html>"), "HTTP 502");
        assert_eq!(server_detail(500, r#"{"detail": ""}"#), "HTTP 500");
    }
}
