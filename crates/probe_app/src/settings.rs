//! Optional RON settings file, merged under the command-line flags.
//!
//! ```ron
//! (
//!     method: Some("GET"),
//!     attempts: Some(3),
//!     timeout_secs: Some(5.0),
//!     concurrency: Some(20),
//!     headers: ["Accept-Language: en"],
//!     cookie: None,
//!     user_agent: None,
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use engine_logging::engine_info;
use probe_core::ProbeInputs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub method: Option<String>,
    pub attempts: Option<u32>,
    pub timeout_secs: Option<f64>,
    pub concurrency: Option<usize>,
    pub headers: Vec<String>,
    pub cookie: Option<String>,
    pub user_agent: Option<String>,
}

pub fn load_settings(path: &Path) -> Result<Settings, SettingsError> {
    let content = read_file(path)?;
    let settings = ron::from_str(&content).map_err(|err| SettingsError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    engine_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

impl Settings {
    /// Layer the command line over these settings, falling back to defaults.
    pub fn merge_cli(self, cli: &Cli) -> Result<ProbeInputs, SettingsError> {
        let defaults = ProbeInputs::default();

        let mut header_lines = self.headers;
        if let Some(path) = cli.headers_file.as_deref() {
            header_lines.push(read_file(path)?);
        }
        header_lines.extend(cli.headers.iter().cloned());

        Ok(ProbeInputs {
            method: cli.method.clone().or(self.method).unwrap_or(defaults.method),
            attempts_per_candidate: cli
                .attempts
                .or(self.attempts)
                .unwrap_or(defaults.attempts_per_candidate),
            request_timeout_secs: cli
                .timeout
                .or(self.timeout_secs)
                .unwrap_or(defaults.request_timeout_secs),
            max_concurrency: cli
                .concurrency
                .or(self.concurrency)
                .unwrap_or(defaults.max_concurrency),
            headers: header_lines.join("\n"),
            cookie: cli.cookie.clone().or(self.cookie).unwrap_or_default(),
            user_agent: cli.user_agent.clone().or(self.user_agent).unwrap_or_default(),
        })
    }
}

fn read_file(path: &Path) -> Result<String, SettingsError> {
    fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })
}
