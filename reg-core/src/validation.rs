//! Submit-time validation rules.
//!
//! The rules form a table of (field, check, applicability) rows evaluated
//! uniformly against a [`FormSnapshot`]. Evaluation is pure: it reads a
//! snapshot and produces a [`ValidationReport`]; applying the report to the
//! page is the controller's job.
//!
//! | Field        | Check                                     | Applies                   |
//! |--------------|-------------------------------------------|---------------------------|
//! | name         | not blank after trimming                  | always                    |
//! | email        | `word@word.tld`, tld of 3–4 lowercase     | always                    |
//! | card-number  | 13–16 digits                              | credit-card panel visible |
//! | zip          | 5 digits                                  | credit-card panel visible |
//! | cvv          | 3 digits                                  | credit-card panel visible |
//! | activities   | at least one checked                      | always                    |
//!
//! # Example
//!
//! ```
//! use reg_core::config::ValidationConfig;
//! use reg_core::models::{FieldKey, PaymentMethod};
//! use reg_core::validation::{FormSnapshot, Validator};
//!
//! let validator = Validator::new(&ValidationConfig::default()).unwrap();
//! let snapshot = FormSnapshot::new(PaymentMethod::PayPal.panel_visibility())
//!     .with_value(FieldKey::Name, "Jane Doe")
//!     .with_value(FieldKey::Email, "jane@example.com")
//!     .with_checked_activities(1);
//!
//! assert!(validator.evaluate(&snapshot).is_valid());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

use crate::config::ValidationConfig;
use crate::models::{FieldKey, PanelVisibility, PaymentMethod};

/// What a rule checks.
#[derive(Debug, Clone)]
pub enum Check {
    /// Some non-whitespace character is present.
    NotBlank,
    /// The whole value matches the pattern.
    Matches(Regex),
    /// At least one activity is checked.
    AnyChecked,
}

/// When a rule is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applies {
    Always,
    /// Only while the given payment panel is shown.
    WhenPanelVisible(PaymentMethod),
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub key: FieldKey,
    pub check: Check,
    pub applies: Applies,
}

/// Raw values read from the page at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot {
    values: BTreeMap<FieldKey, String>,
    checked_activities: usize,
    panels: PanelVisibility,
}

impl FormSnapshot {
    pub fn new(panels: PanelVisibility) -> Self {
        Self {
            values: BTreeMap::new(),
            checked_activities: 0,
            panels,
        }
    }

    pub fn with_value(
        mut self,
        key: FieldKey,
        value: impl Into<String>,
    ) -> Self {
        self.values.insert(key, value.into());
        self
    }

    pub fn with_checked_activities(mut self, count: usize) -> Self {
        self.checked_activities = count;
        self
    }

    /// Raw value of `key`; missing values read as empty.
    pub fn value(&self, key: FieldKey) -> &str {
        self.values.get(&key).map(String::as_str).unwrap_or("")
    }

    pub fn checked_activities(&self) -> usize {
        self.checked_activities
    }

    pub fn panels(&self) -> PanelVisibility {
        self.panels
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStatus {
    Valid,
    Invalid,
    /// The rule did not apply; the field's markers are left as they were.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldOutcome {
    pub key: FieldKey,
    pub status: RuleStatus,
}

/// Outcome of one submit attempt, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    outcomes: Vec<FieldOutcome>,
}

impl ValidationReport {
    pub fn outcomes(&self) -> &[FieldOutcome] {
        &self.outcomes
    }

    /// `true` when no applicable rule failed.
    pub fn is_valid(&self) -> bool {
        self.outcomes.iter().all(|o| o.status != RuleStatus::Invalid)
    }

    pub fn status(&self, key: FieldKey) -> Option<RuleStatus> {
        self.outcomes
            .iter()
            .find(|o| o.key == key)
            .map(|o| o.status)
    }

    pub fn failing(&self) -> Vec<FieldKey> {
        self.outcomes
            .iter()
            .filter(|o| o.status == RuleStatus::Invalid)
            .map(|o| o.key)
            .collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failing = self.failing();
        if failing.is_empty() {
            return f.write_str("all fields valid");
        }
        let names: Vec<&str> = failing.iter().map(FieldKey::as_str).collect();
        write!(f, "invalid: {}", names.join(", "))
    }
}

/// Compiled rule table.
#[derive(Debug, Clone)]
pub struct Validator {
    rules: Vec<FieldRule>,
}

/// `\w` in browser patterns is ASCII-only.
const WORD: &str = "[A-Za-z0-9_]";

fn digits(min: usize, max: usize) -> Result<Regex, regex::Error> {
    if min == max {
        Regex::new(&format!("^[0-9]{{{min}}}$"))
    } else {
        Regex::new(&format!("^[0-9]{{{min},{max}}}$"))
    }
}

impl Validator {
    /// Builds the rule table, in evaluation order: name, email, the card
    /// fields, activities.
    pub fn new(config: &ValidationConfig) -> Result<Self, regex::Error> {
        let email = Regex::new(&format!(
            "^{WORD}+@{WORD}+\\.[a-z]{{{},{}}}$",
            config.email_tld_min, config.email_tld_max
        ))?;
        let card = Applies::WhenPanelVisible(PaymentMethod::CreditCard);

        let rules = vec![
            FieldRule {
                key: FieldKey::Name,
                check: Check::NotBlank,
                applies: Applies::Always,
            },
            FieldRule {
                key: FieldKey::Email,
                check: Check::Matches(email),
                applies: Applies::Always,
            },
            FieldRule {
                key: FieldKey::CardNumber,
                check: Check::Matches(digits(config.card_min_digits, config.card_max_digits)?),
                applies: card,
            },
            FieldRule {
                key: FieldKey::Zip,
                check: Check::Matches(digits(config.zip_digits, config.zip_digits)?),
                applies: card,
            },
            FieldRule {
                key: FieldKey::Cvv,
                check: Check::Matches(digits(config.cvv_digits, config.cvv_digits)?),
                applies: card,
            },
            FieldRule {
                key: FieldKey::Activities,
                check: Check::AnyChecked,
                applies: Applies::Always,
            },
        ];

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn evaluate(&self, snapshot: &FormSnapshot) -> ValidationReport {
        let outcomes = self
            .rules
            .iter()
            .map(|rule| FieldOutcome {
                key: rule.key,
                status: evaluate_rule(rule, snapshot),
            })
            .collect();
        ValidationReport { outcomes }
    }
}

/// Whitespace as browsers match `\s`, which also covers U+FEFF.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn evaluate_rule(
    rule: &FieldRule,
    snapshot: &FormSnapshot,
) -> RuleStatus {
    if let Applies::WhenPanelVisible(method) = rule.applies
        && snapshot.panels().is_hidden(method)
    {
        return RuleStatus::Skipped;
    }

    let passed = match &rule.check {
        Check::NotBlank => !snapshot.value(rule.key).trim_matches(is_blank).is_empty(),
        Check::Matches(pattern) => pattern.is_match(snapshot.value(rule.key)),
        Check::AnyChecked => snapshot.checked_activities() > 0,
    };

    if passed {
        RuleStatus::Valid
    } else {
        RuleStatus::Invalid
    }
}
