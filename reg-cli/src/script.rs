//! Event scripts replayed against the form.
//!
//! A script is a TOML list of `[[step]]` tables, each tagged by `action`:
//!
//! ```toml
//! [[step]]
//! action = "fill"
//! field = "name"
//! value = "Jane Doe"
//!
//! [[step]]
//! action = "select"
//! field = "payment"
//! value = "paypal"
//!
//! [[step]]
//! action = "check"
//! activity = "all"
//!
//! [[step]]
//! action = "focus"
//! activity = "npm"
//!
//! [[step]]
//! action = "submit"
//! ```

use std::{fs, path::Path};

use reg_core::dom::NodeId;
use reg_core::{FieldKey, FormController, SubmitOutcome};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading or replaying a script.
///
/// `step` is 1-based.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read script '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("step {step}: '{field}' is not a text field")]
    NotText { step: usize, field: FieldKey },

    #[error("step {step}: '{field}' is not a selector")]
    NotSelector { step: usize, field: FieldKey },

    #[error("step {step}: '{field}' has no option '{value}'")]
    UnknownOption {
        step: usize,
        field: FieldKey,
        value: String,
    },

    #[error("step {step}: no activity named '{name}'")]
    UnknownActivity { step: usize, name: String },

    #[error("step {step}: focus and blur need exactly one of `field` or `activity`")]
    AmbiguousTarget { step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Step {
    /// Type into a text field.
    Fill { field: FieldKey, value: String },
    /// Pick an option of a selector.
    Select { field: FieldKey, value: String },
    Check { activity: String },
    Uncheck { activity: String },
    Focus {
        field: Option<FieldKey>,
        activity: Option<String>,
    },
    Blur {
        field: Option<FieldKey>,
        activity: Option<String>,
    },
    Submit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// A submit step and what came of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// 1-based step number.
    pub step: usize,
    pub outcome: SubmitOutcome,
}

impl Script {
    pub fn from_toml_str(source: &str) -> Result<Self, ScriptError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let source = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Runs every step in order, stopping at the first invalid one.
    pub fn replay(&self, form: &mut FormController) -> Result<Vec<Submission>, ScriptError> {
        let mut submissions = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            let number = index + 1;
            debug!(step = number, ?step, "replaying");
            if let Some(outcome) = run_step(form, number, step)? {
                info!(step = number, result = %outcome.report, "submitted");
                submissions.push(Submission {
                    step: number,
                    outcome,
                });
            }
        }
        Ok(submissions)
    }
}

fn resolve_target(
    form: &FormController,
    step: usize,
    field: &Option<FieldKey>,
    activity: &Option<String>,
) -> Result<NodeId, ScriptError> {
    match (field, activity) {
        (Some(key), None) => Ok(form.field(*key)),
        (None, Some(name)) => form
            .registry()
            .activity_by_name(name)
            .map(|a| a.input)
            .ok_or_else(|| ScriptError::UnknownActivity {
                step,
                name: name.clone(),
            }),
        _ => Err(ScriptError::AmbiguousTarget { step }),
    }
}

fn set_activity(
    form: &mut FormController,
    step: usize,
    name: &str,
    checked: bool,
) -> Result<(), ScriptError> {
    form.set_activity(name, checked)
        .map(|_| ())
        .ok_or_else(|| ScriptError::UnknownActivity {
            step,
            name: name.to_string(),
        })
}

fn run_step(
    form: &mut FormController,
    step: usize,
    action: &Step,
) -> Result<Option<SubmitOutcome>, ScriptError> {
    match action {
        Step::Fill { field, value } => {
            if !field.is_text_input() {
                return Err(ScriptError::NotText {
                    step,
                    field: *field,
                });
            }
            form.fill(*field, value.as_str());
        }
        Step::Select { field, value } => {
            if !field.is_selector() {
                return Err(ScriptError::NotSelector {
                    step,
                    field: *field,
                });
            }
            let doc = form.document();
            let known = doc
                .options(form.field(*field))
                .into_iter()
                .any(|option| doc.value(option) == value.as_str());
            if !known {
                return Err(ScriptError::UnknownOption {
                    step,
                    field: *field,
                    value: value.clone(),
                });
            }
            form.select(*field, value);
        }
        Step::Check { activity } => set_activity(form, step, activity, true)?,
        Step::Uncheck { activity } => set_activity(form, step, activity, false)?,
        Step::Focus { field, activity } => {
            let target = resolve_target(form, step, field, activity)?;
            form.focus(target);
        }
        Step::Blur { field, activity } => {
            let target = resolve_target(form, step, field, activity)?;
            form.blur(target);
        }
        Step::Submit => return Ok(Some(form.submit())),
    }
    Ok(None)
}
