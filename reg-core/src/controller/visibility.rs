//! Initial focus, the "other" job role field and the shirt color options.

use tracing::debug;

use super::FormController;
use crate::models::FieldKey;

impl FormController {
    pub(super) fn init_focus_and_visibility(&mut self) {
        let name = self.registry.field(FieldKey::Name);
        self.document.focus(name);

        let other = self.registry.field(FieldKey::OtherJobRole);
        self.document.set_hidden(other, true);

        let color = self.registry.field(FieldKey::Color);
        self.document.set_disabled(color, true);
    }

    pub(super) fn on_job_role_change(&mut self) {
        let job_role = self.registry.field(FieldKey::JobRole);
        let show_other = self.document.select_value(job_role) == self.config.other_job_value;

        let other = self.registry.field(FieldKey::OtherJobRole);
        self.document.set_hidden(other, !show_other);
        debug!(show_other, "job role changed");
    }

    /// Shows only the colors tagged with the chosen design and selects the
    /// first of them. With no match the selector stays enabled and empty.
    pub(super) fn on_design_change(&mut self) {
        let design = self.registry.field(FieldKey::Design);
        let theme = self.document.select_value(design).to_string();

        let color = self.registry.field(FieldKey::Color);
        self.document.set_disabled(color, false);

        let mut first_match = None;
        for option in self.document.options(color) {
            let matches = self.document.data(option, "theme") == Some(theme.as_str());
            self.document.set_hidden(option, !matches);
            self.document.set_disabled(option, !matches);
            if matches && first_match.is_none() {
                first_match = Some(option);
            }
        }

        match first_match {
            Some(option) => {
                self.document.select_option(option);
                debug!(theme = %theme, color = self.document.value(option), "design changed");
            }
            None => debug!(theme = %theme, "design changed, no matching colors"),
        }
    }
}
