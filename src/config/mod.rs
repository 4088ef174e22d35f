//! Configuration for the composition core.
//!
//! `ServiceConfig` carries everything the HTTP clients and the session need
//! to talk to the Chorus service: the base URL the three endpoints hang off,
//! optional bearer credentials, and the client-side timings (request
//! timeout, post-success reset delay, progress tick cadence).
//!
//! Configuration comes from explicit construction or from environment
//! variables (a `.env` file is honored when present). Priority: explicit
//! setters > environment > defaults.
//!
//! # Example
//! ```rust,no_run
//! use chorus_composer::config::ServiceConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServiceConfig::from_env()?;
//! println!("voice directory at {}", config.voices_url());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::errors::{ComposerError, ComposerResult};
use crate::utils::{validate_service_base_url, validate_service_base_url_dev};

pub mod pricing;

pub use pricing::{ModelBranch, RateBasis, estimate_tokens};

// =============================================================================
// Constants
// =============================================================================

/// Default base URL for the hosted service.
pub const DEFAULT_API_BASE: &str = "https://api.chorus.audio";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default delay before composition state resets after a successful
/// submission, in milliseconds.
const DEFAULT_RESET_DELAY_MS: u64 = 3_000;

/// Default cadence of the simulated progress ticker, in milliseconds.
const DEFAULT_PROGRESS_TICK_MS: u64 = 150;

/// Environment variable names.
const ENV_API_BASE: &str = "CHORUS_API_BASE";
const ENV_API_KEY: &str = "CHORUS_API_KEY";
const ENV_REQUEST_TIMEOUT_SECS: &str = "CHORUS_REQUEST_TIMEOUT_SECS";
const ENV_RESET_DELAY_MS: &str = "CHORUS_RESET_DELAY_MS";
const ENV_ALLOW_INSECURE: &str = "CHORUS_ALLOW_INSECURE";

// =============================================================================
// ServiceConfig
// =============================================================================

/// Connection and timing configuration for the Chorus service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Base URL all endpoints are joined onto.
    pub api_base: String,

    /// Bearer token for the service, if the deployment requires one.
    pub api_key: Option<String>,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// How long a successful submission stays on screen before the
    /// composition resets to step 1.
    pub reset_delay: Duration,

    /// Cadence of the cosmetic progress ticker.
    pub progress_tick: Duration,

    /// Accept plain-HTTP base URLs (local mock services and tests).
    pub allow_insecure: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            reset_delay: Duration::from_millis(DEFAULT_RESET_DELAY_MS),
            progress_tick: Duration::from_millis(DEFAULT_PROGRESS_TICK_MS),
            allow_insecure: false,
        }
    }
}

impl ServiceConfig {
    /// Builds a configuration from environment variables, honoring a `.env`
    /// file when one is present.
    ///
    /// Recognized variables: `CHORUS_API_BASE`, `CHORUS_API_KEY`,
    /// `CHORUS_REQUEST_TIMEOUT_SECS`, `CHORUS_RESET_DELAY_MS`,
    /// `CHORUS_ALLOW_INSECURE`.
    pub fn from_env() -> ComposerResult<Self> {
        // A missing .env file is fine; real env vars still apply.
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(base) = std::env::var(ENV_API_BASE) {
            config.api_base = base;
        }
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Some(secs) = parse_env_u64(ENV_REQUEST_TIMEOUT_SECS)? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_env_u64(ENV_RESET_DELAY_MS)? {
            config.reset_delay = Duration::from_millis(ms);
        }
        if let Ok(flag) = std::env::var(ENV_ALLOW_INSECURE) {
            config.allow_insecure = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        config.validate()?;
        debug!(api_base = %config.api_base, "service configuration loaded from environment");
        Ok(config)
    }

    /// Creates a dev-mode configuration against a local/mock base URL.
    pub fn for_base_url(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            allow_insecure: true,
            ..Self::default()
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the post-success reset delay.
    pub fn with_reset_delay(mut self, delay: Duration) -> Self {
        self.reset_delay = delay;
        self
    }

    /// Validates the configured base URL.
    pub fn validate(&self) -> ComposerResult<()> {
        self.parsed_base()?;
        Ok(())
    }

    /// URL of the voice model directory endpoint.
    pub fn voices_url(&self) -> String {
        self.endpoint("v1/voices")
    }

    /// URL of the generation model / pricing directory endpoint.
    pub fn models_url(&self) -> String {
        self.endpoint("v1/models")
    }

    /// URL of the generation submission endpoint.
    pub fn generate_url(&self) -> String {
        self.endpoint("v1/generations")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    fn parsed_base(&self) -> ComposerResult<Url> {
        let result = if self.allow_insecure {
            validate_service_base_url_dev(&self.api_base)
        } else {
            validate_service_base_url(&self.api_base)
        };
        result.map_err(|e| ComposerError::Config(e.to_string()))
    }
}

fn parse_env_u64(name: &str) -> ComposerResult<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ComposerError::Config(format!("{name} must be an integer, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}
