//! Wall host configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_FLUSH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MEDIA_BUCKET: &str = "mementos";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallConfig {
    /// Ask before deleting a memento.
    pub confirm_delete: bool,
    /// Offer the delete action on cards at all.
    pub show_delete: bool,
    /// How often committed layouts are flushed to the store.
    pub flush_interval_ms: u64,
    /// Minimum rendered `y` for cards, if the page wants one.
    pub safe_top: Option<f64>,
    /// Blob bucket for uploaded media.
    pub media_bucket: String,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            confirm_delete: true,
            show_delete: true,
            flush_interval_ms: DEFAULT_FLUSH_INTERVAL_MS,
            safe_top: None,
            media_bucket: DEFAULT_MEDIA_BUCKET.to_string(),
        }
    }
}

impl WallConfig {
    /// Build config from the process environment, loading `.env` first if present.
    ///
    /// Optional:
    /// - `WALL_CONFIRM_DELETE`: default true
    /// - `WALL_SHOW_DELETE`: default true
    /// - `WALL_FLUSH_INTERVAL_MS`: default 1000
    /// - `WALL_SAFE_TOP`: unset means no clamp
    /// - `WALL_MEDIA_BUCKET`: default `mementos`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to read .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is present but unparseable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let confirm_delete = match lookup("WALL_CONFIRM_DELETE") {
            Some(raw) => parse_bool("WALL_CONFIRM_DELETE", &raw)?,
            None => defaults.confirm_delete,
        };
        let show_delete = match lookup("WALL_SHOW_DELETE") {
            Some(raw) => parse_bool("WALL_SHOW_DELETE", &raw)?,
            None => defaults.show_delete,
        };
        let flush_interval_ms = match lookup("WALL_FLUSH_INTERVAL_MS") {
            Some(raw) => parse_num::<u64>("WALL_FLUSH_INTERVAL_MS", &raw).and_then(|ms| {
                if ms == 0 {
                    Err(ConfigError::Invalid { var: "WALL_FLUSH_INTERVAL_MS", value: raw.clone() })
                } else {
                    Ok(ms)
                }
            })?,
            None => defaults.flush_interval_ms,
        };
        let safe_top = match lookup("WALL_SAFE_TOP") {
            Some(raw) => {
                let top = parse_num::<f64>("WALL_SAFE_TOP", &raw)?;
                if !top.is_finite() {
                    return Err(ConfigError::Invalid { var: "WALL_SAFE_TOP", value: raw });
                }
                Some(top)
            }
            None => None,
        };
        let media_bucket = lookup("WALL_MEDIA_BUCKET")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.media_bucket);

        Ok(Self { confirm_delete, show_delete, flush_interval_ms, safe_top, media_bucket })
    }

    /// Card options derived from this config.
    #[must_use]
    pub fn card_options(&self) -> cards::card::CardOptions {
        cards::card::CardOptions { confirm_delete: self.confirm_delete, show_delete: self.show_delete }
    }
}

fn parse_bool(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value: raw.to_string() }),
    }
}

fn parse_num<T: std::str::FromStr>(var: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::Invalid { var, value: raw.to_string() })
}
