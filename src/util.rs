use std::str::FromStr;

use crate::config::Overrides;

const STATS_URL: &str = "STATS_URL";

const STATS_INTERVAL: &str = "STATS_INTERVAL";

const STATS_TIMEOUT: &str = "STATS_TIMEOUT";

/// Read overrides from the process environment.
///
/// Unset or unparseable variables leave the corresponding setting untouched.
pub fn get_env_overrides() -> Overrides {
    Overrides {
        url: std::env::var(STATS_URL).ok().filter(|url| !url.is_empty()),
        interval: get_parsed(STATS_INTERVAL),
        timeout: get_parsed(STATS_TIMEOUT),
    }
}

fn get_parsed<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|res| parse_value(&res))
}

/// Parse an environment value, ignoring surrounding whitespace.
pub fn parse_value<T: FromStr>(value: &str) -> Option<T> {
    value.trim().parse().ok()
}
