use std::fmt;

use serde::{Deserialize, Serialize};

/// The payment panel currently shown. Credit card is the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    #[serde(rename = "paypal")]
    PayPal,
    Bitcoin,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 3] = [Self::CreditCard, Self::PayPal, Self::Bitcoin];

    /// Option value used by the payment selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::PayPal => "paypal",
            Self::Bitcoin => "bitcoin",
        }
    }

    /// Maps a selector value to a method. Anything unrecognised, including
    /// the "select method" placeholder, resolves to credit card.
    pub fn from_selection(value: &str) -> Self {
        match value {
            "paypal" => Self::PayPal,
            "bitcoin" => Self::Bitcoin,
            _ => Self::CreditCard,
        }
    }

    /// Hidden flags for the three panels while `self` is active.
    pub fn panel_visibility(self) -> PanelVisibility {
        PanelVisibility {
            credit_card_hidden: self != Self::CreditCard,
            paypal_hidden: self != Self::PayPal,
            bitcoin_hidden: self != Self::Bitcoin,
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `hidden` attribute of each payment panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelVisibility {
    pub credit_card_hidden: bool,
    pub paypal_hidden: bool,
    pub bitcoin_hidden: bool,
}

impl PanelVisibility {
    pub fn is_hidden(&self, method: PaymentMethod) -> bool {
        match method {
            PaymentMethod::CreditCard => self.credit_card_hidden,
            PaymentMethod::PayPal => self.paypal_hidden,
            PaymentMethod::Bitcoin => self.bitcoin_hidden,
        }
    }

    /// Methods whose panel is shown.
    pub fn visible(&self) -> Vec<PaymentMethod> {
        PaymentMethod::ALL
            .into_iter()
            .filter(|&m| !self.is_hidden(m))
            .collect()
    }
}
