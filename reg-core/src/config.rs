//! Controller configuration.
//!
//! Everything has a default matching the standard registration page, so an
//! empty TOML document is a valid configuration:
//!
//! ```
//! use reg_core::config::ControllerConfig;
//!
//! let config = ControllerConfig::from_toml_str(
//!     r#"
//!     other_job_value = "other"
//!
//!     [ids]
//!     name = "full-name"
//!
//!     [validation]
//!     email_tld_min = 2
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.ids.name, "full-name");
//! assert_eq!(config.ids.email, "email");
//! assert_eq!(config.validation.email_tld_min, 2);
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or checking a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A length bound is zero.
    #[error("{field} must be at least 1, got {value}")]
    ZeroLength { field: &'static str, value: usize },

    /// A minimum exceeds its maximum.
    #[error("{field} range is empty: min {min} > max {max}")]
    EmptyRange {
        field: &'static str,
        min: usize,
        max: usize,
    },
}

/// Element ids of the registered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldIds {
    pub form: String,
    pub name: String,
    pub email: String,
    /// The job-role selector. The "other" field is its next sibling.
    pub job_role: String,
    pub design: String,
    pub color: String,
    /// Fieldset receiving activity change events.
    pub activities: String,
    /// Box holding the checkboxes. Its parent is marked valid / not-valid
    /// on submit.
    pub activities_box: String,
    pub total: String,
    pub payment: String,
    pub credit_card_panel: String,
    pub paypal_panel: String,
    pub bitcoin_panel: String,
    pub card_number: String,
    pub zip: String,
    pub cvv: String,
    pub hints: HintIds,
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            form: "registration".to_string(),
            name: "name".to_string(),
            email: "email".to_string(),
            job_role: "title".to_string(),
            design: "design".to_string(),
            color: "color".to_string(),
            activities: "activities".to_string(),
            activities_box: "activities-box".to_string(),
            total: "total-amount".to_string(),
            payment: "payment".to_string(),
            credit_card_panel: "credit-card".to_string(),
            paypal_panel: "paypal".to_string(),
            bitcoin_panel: "bitcoin".to_string(),
            card_number: "cc-num".to_string(),
            zip: "zip".to_string(),
            cvv: "cvv".to_string(),
            hints: HintIds::default(),
        }
    }
}

/// Element ids of the validation hints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HintIds {
    pub name: String,
    pub email: String,
    pub activities: String,
    pub card_number: String,
    pub zip: String,
    pub cvv: String,
}

impl Default for HintIds {
    fn default() -> Self {
        Self {
            name: "name-hint".to_string(),
            email: "email-hint".to_string(),
            activities: "activities-hint".to_string(),
            card_number: "cc-hint".to_string(),
            zip: "zip-hint".to_string(),
            cvv: "cvv-hint".to_string(),
        }
    }
}

/// Length bounds used by the submit rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Shortest accepted top-level domain (lowercase letters).
    pub email_tld_min: usize,
    /// Longest accepted top-level domain.
    pub email_tld_max: usize,
    pub card_min_digits: usize,
    pub card_max_digits: usize,
    pub zip_digits: usize,
    pub cvv_digits: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            email_tld_min: 3,
            email_tld_max: 4,
            card_min_digits: 13,
            card_max_digits: 16,
            zip_digits: 5,
            cvv_digits: 3,
        }
    }
}

impl ValidationConfig {
    /// Rejects bounds that no input could satisfy.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("email_tld_min", self.email_tld_min),
            ("card_min_digits", self.card_min_digits),
            ("zip_digits", self.zip_digits),
            ("cvv_digits", self.cvv_digits),
        ];
        if let Some(&(field, value)) = lengths.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroLength { field, value });
        }

        let ranges = [
            ("email_tld", self.email_tld_min, self.email_tld_max),
            ("card_digits", self.card_min_digits, self.card_max_digits),
        ];
        if let Some(&(field, min, max)) = ranges.iter().find(|(_, min, max)| min > max) {
            return Err(ConfigError::EmptyRange { field, min, max });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub ids: FieldIds,
    /// Job-role value that reveals the "other" text field.
    pub other_job_value: String,
    pub validation: ValidationConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            ids: FieldIds::default(),
            other_job_value: "other".to_string(),
            validation: ValidationConfig::default(),
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a TOML configuration.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validation.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
