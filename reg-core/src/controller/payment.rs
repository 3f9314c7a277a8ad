//! Payment panel switching.

use tracing::debug;

use super::FormController;
use crate::models::{FieldKey, PanelVisibility, PaymentMethod};

impl FormController {
    /// Selects the credit card option and shows only its panel.
    pub(super) fn init_payment(&mut self) {
        let payment = self.registry.field(FieldKey::Payment);
        self.document
            .select_by_value(payment, PaymentMethod::CreditCard.as_str());
        self.show_panel(PaymentMethod::CreditCard);
    }

    pub(super) fn on_payment_change(&mut self) {
        let payment = self.registry.field(FieldKey::Payment);
        let method = PaymentMethod::from_selection(self.document.select_value(payment));
        self.show_panel(method);
    }

    fn show_panel(&mut self, method: PaymentMethod) {
        let flags = method.panel_visibility();
        for panel in PaymentMethod::ALL {
            let node = self.registry.panel(panel);
            self.document.set_hidden(node, flags.is_hidden(panel));
        }
        if self.payment != method {
            debug!(from = %self.payment, to = %method, "payment method changed");
        }
        self.payment = method;
    }

    /// Payment panels as currently shown on the page.
    pub fn panel_visibility(&self) -> PanelVisibility {
        let hidden = |method| self.document.is_hidden(self.registry.panel(method));
        PanelVisibility {
            credit_card_hidden: hidden(PaymentMethod::CreditCard),
            paypal_hidden: hidden(PaymentMethod::PayPal),
            bitcoin_hidden: hidden(PaymentMethod::Bitcoin),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::config::ControllerConfig;
    use crate::controller::FormController;
    use crate::dom::PageMarkup;
    use crate::models::{FieldKey, PaymentMethod};

    fn controller() -> FormController {
        FormController::from_markup(&PageMarkup::default(), ControllerConfig::default()).unwrap()
    }

    #[test]
    fn load_selects_credit_card() {
        let form = controller();

        assert_eq!(form.payment(), PaymentMethod::CreditCard);
        assert_eq!(
            form.document().select_value(form.field(FieldKey::Payment)),
            "credit-card"
        );
        assert_eq!(form.panel_visibility().visible(), vec![PaymentMethod::CreditCard]);
    }

    #[test]
    fn exactly_one_panel_after_any_sequence() {
        let mut form = controller();

        for value in ["paypal", "bitcoin", "bitcoin", "credit-card", "paypal", "credit-card"] {
            form.select(FieldKey::Payment, value);
            let expected = PaymentMethod::from_selection(value);
            assert_eq!(form.payment(), expected);
            assert_eq!(form.panel_visibility().visible(), vec![expected], "after {value}");
        }
    }

    #[test]
    fn placeholder_selection_falls_back_to_credit_card() {
        let mut form = controller();
        form.select(FieldKey::Payment, "bitcoin");

        form.select(FieldKey::Payment, "select method");

        assert_eq!(form.payment(), PaymentMethod::CreditCard);
        assert_eq!(form.panel_visibility().visible(), vec![PaymentMethod::CreditCard]);
    }
}
