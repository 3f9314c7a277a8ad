//! Cost accumulator and activity focus styling.

use tracing::{debug, trace};

use super::{EventOutcome, FormController};
use crate::dom::NodeId;

/// Class toggled on an activity's label while its checkbox has focus.
const FOCUS_CLASS: &str = "focus";

impl FormController {
    /// Adds or subtracts the toggled activity's cost and re-renders the
    /// total.
    pub(super) fn on_activity_change(&mut self, target: NodeId) -> EventOutcome {
        let Some(activity) = self.registry.activity(target) else {
            trace!(%target, "change inside activities ignored");
            return EventOutcome::Ignored;
        };
        let checked = self.document.is_checked(target);
        let total = self.total.apply(activity.cost, checked);
        debug!(activity = %activity.name, checked, %total, "activity toggled");

        let rendered = self.total.render();
        self.document.set_text(self.registry.total(), rendered);
        EventOutcome::Handled
    }

    pub(super) fn on_focus(&mut self, target: NodeId) -> EventOutcome {
        self.toggle_activity_focus(target, true)
    }

    pub(super) fn on_blur(&mut self, target: NodeId) -> EventOutcome {
        self.toggle_activity_focus(target, false)
    }

    fn toggle_activity_focus(
        &mut self,
        target: NodeId,
        focused: bool,
    ) -> EventOutcome {
        if self.registry.activity(target).is_none() {
            return EventOutcome::Ignored;
        }
        let Some(label) = self.document.parent(target) else {
            return EventOutcome::Ignored;
        };
        if focused {
            self.document.add_class(label, FOCUS_CLASS);
        } else {
            self.document.remove_class(label, FOCUS_CLASS);
        }
        EventOutcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use crate::config::ControllerConfig;
    use crate::controller::{Event, EventOutcome, FormController};
    use crate::dom::{ActivityMarkup, PageMarkup};
    use crate::models::FieldKey;

    fn controller() -> FormController {
        FormController::from_markup(&PageMarkup::default(), ControllerConfig::default()).unwrap()
    }

    fn checked_sum(form: &FormController) -> Decimal {
        form.registry()
            .activities()
            .iter()
            .filter(|a| form.document().is_checked(a.input))
            .map(|a| a.cost)
            .sum()
    }

    #[test]
    fn toggling_updates_rendered_total() {
        let mut form = controller();

        form.set_activity("all", true);
        form.set_activity("node", true);
        assert_eq!(form.total(), dec!(300));
        assert_eq!(form.total_text(), "300");

        form.set_activity("all", false);
        assert_eq!(form.total_text(), "100");
    }

    #[test]
    fn repeated_check_does_not_double_count() {
        let mut form = controller();

        form.set_activity("all", true);
        assert_eq!(form.set_activity("all", true), Some(EventOutcome::Ignored));

        assert_eq!(form.total(), dec!(200));
    }

    #[test]
    fn unknown_activity_is_reported() {
        let mut form = controller();

        assert_eq!(form.set_activity("knitting", true), None);
    }

    #[test]
    fn total_matches_checked_costs_for_every_prefix() {
        let mut form = controller();
        let steps = [
            ("all", true),
            ("js-libs", true),
            ("npm", true),
            ("js-libs", false),
            ("express", true),
            ("all", false),
            ("npm", false),
            ("all", true),
        ];

        for (name, checked) in steps {
            form.set_activity(name, checked);
            assert_eq!(form.total(), checked_sum(&form), "after {name} -> {checked}");
        }
    }

    #[test]
    fn total_is_seeded_from_page() {
        let markup = PageMarkup {
            initial_total: "50".to_string(),
            activities: vec![ActivityMarkup {
                name: "keynote".to_string(),
                label: "Keynote".to_string(),
                cost: "12.5".to_string(),
            }],
            ..Default::default()
        };
        let mut form = FormController::from_markup(&markup, ControllerConfig::default()).unwrap();

        form.set_activity("keynote", true);

        assert_eq!(form.total_text(), "62.5");
    }

    #[test]
    fn change_on_non_checkbox_inside_activities_is_ignored() {
        let mut form = controller();
        let activities_box = form.field(FieldKey::Activities);

        assert_eq!(form.dispatch(Event::Change(activities_box)), EventOutcome::Ignored);
        assert_eq!(form.total_text(), "0");
    }

    #[test]
    fn focus_marks_activity_label() {
        let mut form = controller();
        let first = form.registry().activities()[0].input;
        let second = form.registry().activities()[1].input;
        let label = |form: &FormController, input| form.document().parent(input).unwrap();

        form.focus(first);
        assert!(form.document().has_class(label(&form, first), "focus"));

        form.focus(second);
        assert!(!form.document().has_class(label(&form, first), "focus"));
        assert!(form.document().has_class(label(&form, second), "focus"));

        form.blur(second);
        assert!(!form.document().has_class(label(&form, second), "focus"));
        assert_eq!(form.document().active_element(), None);
    }

    #[test]
    fn focus_on_other_fields_adds_no_class() {
        let mut form = controller();
        let email = form.field(FieldKey::Email);

        assert_eq!(form.focus(email), EventOutcome::Ignored);
        assert_eq!(form.document().active_element(), Some(email));
    }
}
