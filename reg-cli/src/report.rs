//! Plain-text summary of the form after a replay.

use std::fmt;

use reg_core::{FieldKey, FormController, PaymentMethod};
use rust_decimal::Decimal;

use crate::script::Submission;

/// State of the form worth showing once a script has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSummary {
    /// Field key or activity name holding focus.
    pub focused: Option<String>,
    pub other_job_role_shown: bool,
    /// `None` while the color selector is disabled.
    pub color: Option<String>,
    pub total: Decimal,
    pub total_text: String,
    pub payment: PaymentMethod,
    pub submissions: Vec<Submission>,
}

impl FormSummary {
    pub fn capture(
        form: &FormController,
        submissions: Vec<Submission>,
    ) -> Self {
        let doc = form.document();
        let registry = form.registry();

        let focused = doc.active_element().and_then(|node| {
            registry
                .key_of(node)
                .map(|key| key.to_string())
                .or_else(|| registry.activity(node).map(|a| format!("activity '{}'", a.name)))
        });

        let color_select = form.field(FieldKey::Color);
        let color = (!doc.is_disabled(color_select))
            .then(|| doc.select_value(color_select).to_string());

        Self {
            focused,
            other_job_role_shown: !doc.is_hidden(form.field(FieldKey::OtherJobRole)),
            color,
            total: form.total(),
            total_text: form.total_text().to_string(),
            payment: form.payment(),
            submissions,
        }
    }

    /// `true` when the last submit attempt went through.
    pub fn last_submission_accepted(&self) -> bool {
        self.submissions
            .last()
            .is_some_and(|s| !s.outcome.is_blocked())
    }
}

impl fmt::Display for FormSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Focused:        {}", self.focused.as_deref().unwrap_or("-"))?;
        writeln!(
            f,
            "Other job role: {}",
            if self.other_job_role_shown { "shown" } else { "hidden" }
        )?;
        writeln!(f, "Shirt color:    {}", self.color.as_deref().unwrap_or("(disabled)"))?;
        writeln!(f, "Total:          ${}", self.total_text)?;
        writeln!(f, "Payment:        {}", self.payment)?;

        if self.submissions.is_empty() {
            return writeln!(f, "Submissions:    none");
        }
        writeln!(f, "Submissions:")?;
        for (i, submission) in self.submissions.iter().enumerate() {
            let verdict = if submission.outcome.is_blocked() {
                "blocked"
            } else {
                "accepted"
            };
            writeln!(
                f,
                "  #{} (step {}): {verdict}, {}",
                i + 1,
                submission.step,
                submission.outcome.report
            )?;
        }
        Ok(())
    }
}
