use std::env;
use std::time::Duration;

use crate::cache::CacheConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    pub automation_webhook_url: Option<String>,
    pub automation_timeout: Duration,
    pub notification_webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub cache: CacheConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<String>),
    #[error("invalid environment variable {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn get_required(name: &str, missing: &mut Vec<String>) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => {
            missing.push(name.to_string());
            None
        }
    }
}

fn get_optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_duration_secs(name: &str, default: u64) -> Result<Duration, ConfigError> {
    match get_optional(name) {
        None => Ok(Duration::from_secs(default)),
        Some(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::Invalid {
                var: name.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// `https://PROJECT.supabase.co` -> `PROJECT`.
pub fn project_ref_from_url(supabase_url: &str) -> Option<&str> {
    supabase_url
        .trim_end_matches('/')
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        let database_url = get_required("DATABASE_URL", &mut missing);
        let redis_url = get_required("REDIS_URL", &mut missing);
        let supabase_url = get_required("SUPABASE_URL", &mut missing);
        let supabase_anon_key = get_required("SUPABASE_ANON_KEY", &mut missing);

        let (
            Some(database_url),
            Some(redis_url),
            Some(supabase_url),
            Some(supabase_anon_key),
        ) = (database_url, redis_url, supabase_url, supabase_anon_key)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let supabase_project_ref = project_ref_from_url(&supabase_url)
            .ok_or_else(|| ConfigError::Invalid {
                var: "SUPABASE_URL".to_string(),
                reason: "expected https://PROJECT.supabase.co".to_string(),
            })?
            .to_string();

        let port = match get_optional("PORT") {
            None => 8080,
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT".to_string(),
                reason: e.to_string(),
            })?,
        };

        Ok(Self {
            database_url,
            redis_url,
            supabase_project_ref,
            supabase_anon_key,
            automation_webhook_url: get_optional("AUTOMATION_WEBHOOK_URL"),
            automation_timeout: parse_duration_secs("AUTOMATION_TIMEOUT_SECS", 30)?,
            notification_webhook_url: get_optional("NOTIFICATION_WEBHOOK_URL"),
            webhook_secret: get_optional("WEBHOOK_SECRET"),
            port,
            cache: CacheConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_ref_parsing() {
        assert_eq!(
            project_ref_from_url("https://abcd1234.supabase.co"),
            Some("abcd1234")
        );
        assert_eq!(
            project_ref_from_url("https://abcd1234.supabase.co/"),
            Some("abcd1234")
        );
        assert_eq!(project_ref_from_url("http://abcd1234.supabase.co"), None);
        assert_eq!(project_ref_from_url("https://example.com"), None);
    }

    #[test]
    fn missing_error_lists_every_variable() {
        let err = ConfigError::Missing(vec!["DATABASE_URL".into(), "REDIS_URL".into()]);
        assert_eq!(
            err.to_string(),
            "missing required environment variables: DATABASE_URL, REDIS_URL"
        );
    }
}
