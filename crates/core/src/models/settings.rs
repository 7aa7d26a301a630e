use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use super::theme::ThemeMode;
use crate::errors::CoreError;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_VS_CURRENCY: &str = "usd";
pub const DEFAULT_PER_PAGE: u32 = 100;
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The endpoint caps `per_page` at 250.
const MAX_PER_PAGE: u32 = 250;

/// Runtime configuration for the dashboard core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    /// Root of the markets API, without trailing slash
    pub base_url: String,

    /// Quote currency for prices
    pub vs_currency: String,

    /// How many coins one fetch requests
    pub per_page: u32,

    /// Delay between scheduled fetches
    pub refresh_interval: Duration,

    /// Per-request timeout. `None` leaves requests unbounded, in which case a
    /// hung request keeps `loading` set until it resolves.
    pub request_timeout: Option<Duration>,

    /// Theme the session starts with
    pub initial_theme: ThemeMode,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            per_page: DEFAULT_PER_PAGE,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            initial_theme: ThemeMode::default(),
        }
    }
}

impl DashboardSettings {
    /// Defaults overridden by `COIN_DASHBOARD_*` environment variables.
    ///
    /// - `COIN_DASHBOARD_API_URL`
    /// - `COIN_DASHBOARD_REFRESH_SECS`
    /// - `COIN_DASHBOARD_TIMEOUT_SECS` (`0` disables the timeout)
    /// - `COIN_DASHBOARD_PER_PAGE`
    /// - `COIN_DASHBOARD_THEME` (`light` / `dark`)
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let mut settings = Self::default();

        if let Some(url) = var("COIN_DASHBOARD_API_URL") {
            settings.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = var("COIN_DASHBOARD_REFRESH_SECS") {
            settings.refresh_interval =
                Duration::from_secs(parse_u64("COIN_DASHBOARD_REFRESH_SECS", &secs)?);
        }
        if let Some(secs) = var("COIN_DASHBOARD_TIMEOUT_SECS") {
            settings.request_timeout = match parse_u64("COIN_DASHBOARD_TIMEOUT_SECS", &secs)? {
                0 => None,
                n => Some(Duration::from_secs(n)),
            };
        }
        if let Some(n) = var("COIN_DASHBOARD_PER_PAGE") {
            let per_page = parse_u64("COIN_DASHBOARD_PER_PAGE", &n)?;
            settings.per_page = u32::try_from(per_page).map_err(|_| {
                CoreError::Config(format!("COIN_DASHBOARD_PER_PAGE out of range: {per_page}"))
            })?;
        }
        if let Some(theme) = var("COIN_DASHBOARD_THEME") {
            settings.initial_theme = theme
                .parse()
                .map_err(|e: CoreError| CoreError::Config(e.to_string()))?;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the scheduler or provider cannot work with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.base_url.trim().is_empty() {
            return Err(CoreError::Config("base_url must not be empty".into()));
        }
        if self.refresh_interval.is_zero() {
            return Err(CoreError::Config("refresh_interval must be positive".into()));
        }
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(CoreError::Config(format!(
                "per_page must be between 1 and {MAX_PER_PAGE}, got {}",
                self.per_page
            )));
        }
        Ok(())
    }
}

fn parse_u64(name: &str, raw: &str) -> Result<u64, CoreError> {
    raw.parse()
        .map_err(|_| CoreError::Config(format!("{name} must be a whole number, got '{raw}'")))
}
