use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// User agent sent when the caller does not supply one.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36 Edg/126.0.0.0";

pub const DEFAULT_ATTEMPTS_PER_CANDIDATE: u32 = 3;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    /// Case-insensitive; anything that is not `POST` probes with `GET`.
    pub fn parse_lenient(text: &str) -> Self {
        if text.trim().eq_ignore_ascii_case("POST") {
            HttpMethod::Post
        } else {
            HttpMethod::Get
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("attempts per candidate must be at least 1")]
    ZeroAttempts,
    #[error("request timeout must be a positive number of seconds, got {0}")]
    InvalidTimeout(String),
    #[error("max concurrency must be at least 1")]
    ZeroConcurrency,
    #[error("malformed header line {line:?}: expected `Name: Value`")]
    MalformedHeader { line: String },
}

/// Settings for one probing run. Fixed once the run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    pub method: HttpMethod,
    pub attempts_per_candidate: u32,
    pub request_timeout: Duration,
    pub max_concurrency: usize,
    pub headers: Vec<(String, String)>,
    pub cookie_header: Option<String>,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            attempts_per_candidate: DEFAULT_ATTEMPTS_PER_CANDIDATE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            headers: Vec::new(),
            cookie_header: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ProbeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attempts_per_candidate == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout("0".to_string()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        let blank_name = self.headers.iter().find(|(name, _)| name.trim().is_empty());
        if let Some((name, value)) = blank_name {
            return Err(ConfigError::MalformedHeader {
                line: format!("{name}:{value}"),
            });
        }
        Ok(())
    }
}

/// Collaborator-facing inputs, as text and numbers straight from a form or
/// command line. Empty strings mean "not set".
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeInputs {
    pub method: String,
    pub attempts_per_candidate: u32,
    pub request_timeout_secs: f64,
    pub max_concurrency: usize,
    pub headers: String,
    pub cookie: String,
    pub user_agent: String,
}

impl Default for ProbeInputs {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get.as_str().to_string(),
            attempts_per_candidate: DEFAULT_ATTEMPTS_PER_CANDIDATE,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT.as_secs_f64(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            headers: String::new(),
            cookie: String::new(),
            user_agent: String::new(),
        }
    }
}

impl ProbeInputs {
    /// Parse the text fields into a typed config.
    ///
    /// Bounds on the numeric fields are checked by [`ProbeConfig::validate`]
    /// when a run starts, so a zero concurrency still reaches the scheduler.
    pub fn into_config(self) -> Result<ProbeConfig, ConfigError> {
        let request_timeout = Duration::try_from_secs_f64(self.request_timeout_secs)
            .map_err(|_| ConfigError::InvalidTimeout(self.request_timeout_secs.to_string()))?;
        let headers = parse_header_block(&self.headers)?;
        let cookie = self.cookie.trim();
        let user_agent = self.user_agent.trim();

        Ok(ProbeConfig {
            method: HttpMethod::parse_lenient(&self.method),
            attempts_per_candidate: self.attempts_per_candidate,
            request_timeout,
            max_concurrency: self.max_concurrency,
            headers,
            cookie_header: (!cookie.is_empty()).then(|| cookie.to_string()),
            user_agent: if user_agent.is_empty() {
                DEFAULT_USER_AGENT.to_string()
            } else {
                user_agent.to_string()
            },
        })
    }
}

/// Parse newline-delimited `Name: Value` pairs, keeping their order.
/// Blank lines are skipped; the value is everything after the first colon.
pub fn parse_header_block(block: &str) -> Result<Vec<(String, String)>, ConfigError> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (name, value) = line.split_once(':').ok_or_else(|| ConfigError::MalformedHeader {
                line: line.to_string(),
            })?;
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigError::MalformedHeader {
                    line: line.to_string(),
                });
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}
