use std::str::FromStr;
use std::{env, time::Duration};

/// Process-wide settings, read once at startup. Database connection settings
/// live in `database::DatabaseConnectionInfo`.
#[derive(Debug, Clone)]
pub struct Config {
    pub vehicle_positions_url: String,
    pub loop_every: Duration,
    pub early_tolerance: f64,
    pub expire_position_seconds: i64,
    pub record_to_database: bool,
    pub publish_over_nats: bool,
    pub nats_url: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let vehicle_positions_url = env::var("VEHICLE_POSITIONS_URL")
            .map_err(|_| ConfigError::Missing("VEHICLE_POSITIONS_URL"))?;
        let loop_every_seconds: u64 = parse_or("LOOP_EVERY_SECONDS", 3)?;
        let early_tolerance: f64 = parse_or("EARLY_TOLERANCE", 0.1)?;
        if !(early_tolerance > 0.0 && early_tolerance < 1.0) {
            return Err(ConfigError::Invalid(
                "EARLY_TOLERANCE",
                early_tolerance.to_string(),
            ));
        }
        let expire_position_seconds: i64 = parse_or("EXPIRE_POSITION_SECONDS", 900)?;
        let record_to_database = flag("RECORD_TO_DATABASE");
        let publish_over_nats = flag("PUBLISH_OVER_NATS");
        let nats_url = env::var("NATS_URL").ok();
        if publish_over_nats && nats_url.is_none() {
            return Err(ConfigError::Missing("NATS_URL"));
        }

        Ok(Self {
            vehicle_positions_url,
            loop_every: Duration::from_secs(loop_every_seconds),
            early_tolerance,
            expire_position_seconds,
            record_to_database,
            publish_over_nats,
            nats_url,
        })
    }
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid(key, value.clone())),
        Err(_) => Ok(default),
    }
}

fn flag(key: &str) -> bool {
    env::var(key)
        .map(|value| parse_flag(&value))
        .unwrap_or(false)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("yes"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
