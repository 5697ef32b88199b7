use std::fmt;

use chrono_tz::Tz;

use crate::error::CopyError;

pub const DEFAULT_API_BASE_URL: &str = "https://api.track.toggl.com/api/v8";
pub const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Clone)]
pub struct Config {
    // API
    pub api_token: String,
    pub api_base_url: String,

    // Runtime
    pub time_zone: Tz,
    pub dry_run: bool,
}

fn parse_bool(raw: Option<String>, default: bool) -> bool {
    match raw.map(|s| s.trim().to_lowercase()) {
        None => default,
        Some(v) if v.is_empty() => default,
        Some(v) if v == "1" || v == "true" || v == "yes" || v == "y" || v == "on" => true,
        Some(v) if v == "0" || v == "false" || v == "no" || v == "n" || v == "off" => false,
        Some(_) => default,
    }
}

pub fn parse_time_zone(name: &str) -> Result<Tz, CopyError> {
    name.trim()
        .parse()
        .map_err(|_| CopyError::ZoneResolution(name.to_string()))
}

impl Config {
    pub fn from_env() -> Result<Self, CopyError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CopyError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_token = var("API_TOKEN")
            .or_else(|| var("TOGGL_API_TOKEN"))
            .ok_or_else(|| CopyError::Config("API_TOKEN is required".into()))?;

        let api_base_url = var("API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let time_zone = var("TIME_ZONE").unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone = parse_time_zone(&time_zone)?;

        let dry_run = parse_bool(var("DRY_RUN"), false);

        Ok(Self {
            api_token,
            api_base_url,
            time_zone,
            dry_run,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("time_zone", &self.time_zone.name())
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, CopyError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[("API_TOKEN", "secret")]).unwrap();
        assert_eq!(cfg.api_token, "secret");
        assert_eq!(cfg.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(cfg.time_zone, chrono_tz::UTC);
        assert!(!cfg.dry_run);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("TOGGL_API_TOKEN", "alias"),
            ("API_BASE_URL", "http://localhost:8080/api/v8/"),
            ("TIME_ZONE", "Asia/Tokyo"),
            ("DRY_RUN", "yes"),
        ])
        .unwrap();
        assert_eq!(cfg.api_token, "alias");
        assert_eq!(cfg.api_base_url, "http://localhost:8080/api/v8");
        assert_eq!(cfg.time_zone, chrono_tz::Asia::Tokyo);
        assert!(cfg.dry_run);
    }

    #[test]
    fn missing_token() {
        let err = config(&[("API_TOKEN", "  ")]).unwrap_err();
        assert!(matches!(err, CopyError::Config(_)));
    }

    #[test]
    fn unknown_zone() {
        let err = config(&[("API_TOKEN", "t"), ("TIME_ZONE", "Mars/Olympus_Mons")]).unwrap_err();
        assert!(matches!(err, CopyError::ZoneResolution(name) if name == "Mars/Olympus_Mons"));
    }

    #[test]
    fn bool_words() {
        assert!(parse_bool(Some("ON".into()), false));
        assert!(!parse_bool(Some("off".into()), true));
        assert!(parse_bool(Some("maybe".into()), true));
        assert!(!parse_bool(None, false));
    }

    #[test]
    fn debug_hides_token() {
        let cfg = config(&[("API_TOKEN", "very-secret")]).unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("very-secret"));
        assert!(shown.contains("UTC"));
    }
}
