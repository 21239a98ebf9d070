use std::time::Duration;

use anyhow::{Context, Result, anyhow};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TOAST_SECS: u64 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub toast: Duration,
    pub demo: bool,
}

impl Config {
    /// Reads the process environment (after `.env` files were loaded) and
    /// the command line; flags win over variables.
    pub fn load() -> Result<Self> {
        let args = std::env::args().skip(1).collect::<Vec<_>>();
        Self::from_sources(|key| std::env::var(key).ok(), &args)
    }

    pub fn from_sources(env: impl Fn(&str) -> Option<String>, args: &[String]) -> Result<Self> {
        let api_url = arg_value(args, "--api-url")?
            .or_else(|| env("LEAGUE_API_URL"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = api_url.trim().trim_end_matches('/').to_string();

        let timeout = env("LEAGUE_API_TIMEOUT_SECS")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("invalid LEAGUE_API_TIMEOUT_SECS: {raw}"))
            })
            .transpose()?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let toast_secs = match arg_value(args, "--toast-secs")?.or_else(|| env("LEAGUE_TOAST_SECS")) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("invalid toast duration: {raw}"))?,
            None => DEFAULT_TOAST_SECS,
        };

        let demo = args.iter().any(|a| a == "--demo")
            || env("LEAGUE_DEMO").is_some_and(|v| is_truthy(&v));

        Ok(Self {
            api_url,
            timeout,
            toast: Duration::from_secs(toast_secs.max(1)),
            demo,
        })
    }
}

fn arg_value(args: &[String], flag: &str) -> Result<Option<String>> {
    let prefix = format!("{flag}=");
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            return iter
                .next()
                .cloned()
                .map(Some)
                .ok_or_else(|| anyhow!("{flag} expects a value"));
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::{Config, DEFAULT_API_URL};

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env_or_args() {
        let config = Config::from_sources(env_of(&[]), &[]).expect("config");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout, None);
        assert_eq!(config.toast, Duration::from_secs(3));
        assert!(!config.demo);
    }

    #[test]
    fn flag_overrides_env_and_trailing_slash_is_dropped() {
        let env = env_of(&[("LEAGUE_API_URL", "http://env:1")]);
        let config =
            Config::from_sources(env, &args(&["--api-url", "http://flag:2/"])).expect("config");
        assert_eq!(config.api_url, "http://flag:2");
    }

    #[test]
    fn env_sets_timeout_toast_and_demo() {
        let env = env_of(&[
            ("LEAGUE_API_TIMEOUT_SECS", "15"),
            ("LEAGUE_TOAST_SECS", "0"),
            ("LEAGUE_DEMO", "true"),
        ]);
        let config = Config::from_sources(env, &[]).expect("config");
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.toast, Duration::from_secs(1));
        assert!(config.demo);
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        assert!(Config::from_sources(env_of(&[]), &args(&["--api-url"])).is_err());
        assert!(Config::from_sources(env_of(&[]), &args(&["--toast-secs=x"])).is_err());
    }
}
