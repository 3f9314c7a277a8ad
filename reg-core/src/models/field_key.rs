use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable key for every element the controller registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKey {
    Name,
    Email,
    JobRole,
    OtherJobRole,
    Design,
    Color,
    Activities,
    Payment,
    CardNumber,
    Zip,
    Cvv,
}

impl FieldKey {
    pub const ALL: [FieldKey; 11] = [
        Self::Name,
        Self::Email,
        Self::JobRole,
        Self::OtherJobRole,
        Self::Design,
        Self::Color,
        Self::Activities,
        Self::Payment,
        Self::CardNumber,
        Self::Zip,
        Self::Cvv,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::JobRole => "job-role",
            Self::OtherJobRole => "other-job-role",
            Self::Design => "design",
            Self::Color => "color",
            Self::Activities => "activities",
            Self::Payment => "payment",
            Self::CardNumber => "card-number",
            Self::Zip => "zip",
            Self::Cvv => "cvv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    /// Keys whose raw value is free text typed by the user.
    pub fn is_text_input(&self) -> bool {
        matches!(
            self,
            Self::Name | Self::Email | Self::OtherJobRole | Self::CardNumber | Self::Zip | Self::Cvv
        )
    }

    /// Keys backed by a `select` element.
    pub fn is_selector(&self) -> bool {
        matches!(self, Self::JobRole | Self::Design | Self::Color | Self::Payment)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
