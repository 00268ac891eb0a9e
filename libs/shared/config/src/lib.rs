use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_DAY_START_HOUR: u32 = 0;
pub const DEFAULT_DAY_END_HOUR: u32 = 24;
pub const DEFAULT_LAYOUT_CACHE_TTL_SECONDS: i64 = 300;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_host: String,
    pub api_port: u16,
    pub calendar_day_start_hour: u32,
    pub calendar_day_end_hour: u32,
    pub layout_cache_ttl_seconds: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 3000,
            calendar_day_start_hour: DEFAULT_DAY_START_HOUR,
            calendar_day_end_hour: DEFAULT_DAY_END_HOUR,
            layout_cache_ttl_seconds: DEFAULT_LAYOUT_CACHE_TTL_SECONDS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            api_host: env::var("API_HOST")
                .unwrap_or_else(|_| {
                    warn!("API_HOST not set, using default");
                    defaults.api_host.clone()
                }),
            api_port: parse_var("API_PORT", defaults.api_port),
            calendar_day_start_hour: parse_var("CALENDAR_DAY_START_HOUR", defaults.calendar_day_start_hour),
            calendar_day_end_hour: parse_var("CALENDAR_DAY_END_HOUR", defaults.calendar_day_end_hour),
            layout_cache_ttl_seconds: parse_var("LAYOUT_CACHE_TTL_SECONDS", defaults.layout_cache_ttl_seconds),
        };

        if !config.is_configured() {
            warn!(
                "Calendar day window {}..{} is invalid - falling back to a full day",
                config.calendar_day_start_hour, config.calendar_day_end_hour
            );
            return Self {
                calendar_day_start_hour: DEFAULT_DAY_START_HOUR,
                calendar_day_end_hour: DEFAULT_DAY_END_HOUR,
                ..config
            };
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        self.calendar_day_start_hour < self.calendar_day_end_hour
            && self.calendar_day_end_hour <= 24
            && self.layout_cache_ttl_seconds >= 0
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => {
            warn!("{} not set, using default {}", name, default);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_configured() {
        let config = AppConfig::default();
        assert!(config.is_configured());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_inverted_day_window_is_not_configured() {
        let config = AppConfig {
            calendar_day_start_hour: 18,
            calendar_day_end_hour: 8,
            ..AppConfig::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_day_window_past_midnight_is_not_configured() {
        let config = AppConfig {
            calendar_day_end_hour: 25,
            ..AppConfig::default()
        };
        assert!(!config.is_configured());
    }
}
