//! `regform` configuration file.
//!
//! ```toml
//! [logging]
//! level = "debug"
//! file = "regform.log"
//!
//! [form]
//! other_job_value = "other"
//!
//! [form.validation]
//! email_tld_min = 2
//! ```

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use reg_core::ControllerConfig;
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or full `EnvFilter` directive. `RUST_LOG` overrides it.
    pub level: String,
    /// Log file appended to, if any.
    pub file: Option<PathBuf>,
    /// Write log records to stderr.
    pub stdout: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            stdout: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub form: ControllerConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("invalid config")?;
        config.form.validation.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        Self::from_toml_str(&source)
            .with_context(|| format!("cannot load config file '{}'", path.display()))
    }
}
