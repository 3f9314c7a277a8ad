//! Submit-time validation and its presentation.

use tracing::{info, warn};

use super::FormController;
use crate::models::FieldKey;
use crate::validation::{FormSnapshot, RuleStatus, ValidationReport};

const VALID_CLASS: &str = "valid";
const INVALID_CLASS: &str = "not-valid";

/// Result of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub report: ValidationReport,
}

impl SubmitOutcome {
    /// `true` when the default submit action was prevented.
    pub fn is_blocked(&self) -> bool {
        !self.report.is_valid()
    }
}

impl FormController {
    /// Reads every validated value from the page.
    pub(super) fn snapshot(&self) -> FormSnapshot {
        let checked = self
            .registry
            .activities()
            .iter()
            .filter(|a| self.document.is_checked(a.input))
            .count();

        [
            FieldKey::Name,
            FieldKey::Email,
            FieldKey::CardNumber,
            FieldKey::Zip,
            FieldKey::Cvv,
        ]
        .into_iter()
        .fold(
            FormSnapshot::new(self.panel_visibility()).with_checked_activities(checked),
            |snapshot, key| {
                let value = self.document.value(self.registry.field(key));
                snapshot.with_value(key, value)
            },
        )
    }

    pub(super) fn on_submit(&mut self) -> SubmitOutcome {
        let report = self.validator.evaluate(&self.snapshot());
        self.present(&report);

        let outcome = SubmitOutcome { report };
        if outcome.is_blocked() {
            warn!(failing = ?outcome.report.failing(), "submission blocked");
        } else {
            info!("submission accepted");
        }
        outcome
    }

    /// Marks each evaluated field valid or not-valid and shows or hides its
    /// hint. Skipped fields keep whatever markers they had.
    fn present(&mut self, report: &ValidationReport) {
        for outcome in report.outcomes() {
            let Some(marker) = self.registry.marker(outcome.key) else {
                continue;
            };
            let (add, remove, display) = match outcome.status {
                RuleStatus::Valid => (VALID_CLASS, INVALID_CLASS, "none"),
                RuleStatus::Invalid => (INVALID_CLASS, VALID_CLASS, "block"),
                RuleStatus::Skipped => continue,
            };
            self.document.add_class(marker.container, add);
            self.document.remove_class(marker.container, remove);
            self.document.set_display(marker.hint, display);
        }
    }

    /// `true` when the hint of `key` is currently displayed.
    pub fn hint_visible(&self, key: FieldKey) -> bool {
        self.registry
            .marker(key)
            .is_some_and(|m| self.document.display(m.hint) == Some("block"))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ControllerConfig;
    use crate::controller::{Event, EventOutcome};
    use crate::dom::PageMarkup;

    fn controller() -> FormController {
        FormController::from_markup(&PageMarkup::default(), ControllerConfig::default()).unwrap()
    }

    fn fill_valid(form: &mut FormController) {
        form.fill(FieldKey::Name, "Jane Doe");
        form.fill(FieldKey::Email, "jane@example.com");
        form.fill(FieldKey::CardNumber, "4111111111111111");
        form.fill(FieldKey::Zip, "94107");
        form.fill(FieldKey::Cvv, "123");
        form.set_activity("all", true);
    }

    fn container_classes(form: &FormController, key: FieldKey) -> Vec<String> {
        let marker = form.registry().marker(key).unwrap();
        form.document()
            .element(marker.container)
            .unwrap()
            .classes()
            .to_vec()
    }

    #[test]
    fn empty_form_blocks_and_shows_every_hint() {
        let mut form = controller();

        let outcome = form.submit();

        assert!(outcome.is_blocked());
        for key in [
            FieldKey::Name,
            FieldKey::Email,
            FieldKey::CardNumber,
            FieldKey::Zip,
            FieldKey::Cvv,
            FieldKey::Activities,
        ] {
            assert!(form.hint_visible(key), "{key} hint hidden");
            assert_eq!(container_classes(&form, key), ["not-valid"]);
        }

        let doc = form.document();
        let fieldset = doc.get_element_by_id("activities").unwrap();
        let activities_box = doc.get_element_by_id("activities-box").unwrap();
        assert!(doc.has_class(fieldset, "not-valid"));
        assert!(!doc.has_class(activities_box, "not-valid"));
    }

    #[test]
    fn valid_form_submits_without_hints() {
        let mut form = controller();
        fill_valid(&mut form);

        let outcome = form.submit();

        assert!(!outcome.is_blocked());
        assert!(!form.hint_visible(FieldKey::Name));
        assert!(!form.hint_visible(FieldKey::Activities));
        assert_eq!(container_classes(&form, FieldKey::Email), ["valid"]);
    }

    #[test]
    fn correcting_a_field_clears_its_markers() {
        let mut form = controller();
        fill_valid(&mut form);
        form.fill(FieldKey::Name, "");
        assert!(form.submit().is_blocked());
        assert!(form.hint_visible(FieldKey::Name));

        form.fill(FieldKey::Name, "Jane Doe");
        let outcome = form.submit();

        assert!(!outcome.is_blocked());
        assert!(!form.hint_visible(FieldKey::Name));
        assert_eq!(container_classes(&form, FieldKey::Name), ["valid"]);
    }

    #[test]
    fn card_markers_are_untouched_while_paypal_is_active() {
        let mut form = controller();
        form.submit();
        assert!(form.hint_visible(FieldKey::Zip));

        form.select(FieldKey::Payment, "paypal");
        form.fill(FieldKey::Name, "Jane Doe");
        form.fill(FieldKey::Email, "jane@example.com");
        form.set_activity("npm", true);
        let outcome = form.submit();

        assert!(!outcome.is_blocked());
        assert_eq!(outcome.report.status(FieldKey::Zip), Some(RuleStatus::Skipped));
        assert!(form.hint_visible(FieldKey::Zip));
    }

    #[test]
    fn dispatching_submit_reports_outcome() {
        let mut form = controller();

        let EventOutcome::Submitted(outcome) = form.dispatch(Event::Submit) else {
            panic!("submit was not handled");
        };

        assert_eq!(
            outcome.report.failing(),
            vec![
                FieldKey::Name,
                FieldKey::Email,
                FieldKey::CardNumber,
                FieldKey::Zip,
                FieldKey::Cvv,
                FieldKey::Activities,
            ]
        );
    }

    #[test]
    fn check_does_not_touch_the_page() {
        let form = controller();

        let report = form.check();

        assert!(!report.is_valid());
        assert!(!form.hint_visible(FieldKey::Name));
    }
}
