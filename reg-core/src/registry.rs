//! Field registry: every element the controller touches, resolved once.
//!
//! Handlers look elements up by [`FieldKey`] instead of querying the
//! document, so they all observe the same element identities. Building the
//! registry is the only place a malformed page is detected.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::config::FieldIds;
use crate::dom::{Document, NodeId};
use crate::models::{FieldKey, PaymentMethod};

/// The page does not provide what the controller needs.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("no element with id '{id}' for {role}")]
    MissingElement { role: &'static str, id: String },

    #[error("element '{id}' for {role} must be <{expected}>, found <{found}>")]
    WrongTag {
        role: &'static str,
        id: String,
        expected: &'static str,
        found: String,
    },

    #[error("job-role selector has no following input for the other job role")]
    MissingOtherJobRole,

    #[error("{key} has no enclosing element to mark valid or not-valid")]
    MissingContainer { key: FieldKey },

    #[error("activity '{name}' has no cost tag")]
    MissingCost { name: String },

    #[error("activity '{name}' has an invalid cost '{cost}': {source}")]
    InvalidCost {
        name: String,
        cost: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("initial total {initial} plus every activity cost does not fit in a decimal")]
    TotalOverflow { initial: Decimal },

    #[error("initial total '{text}' is not a number: {source}")]
    InvalidTotal {
        text: String,
        #[source]
        source: rust_decimal::Error,
    },
}

/// Parses a numeric tag or text node.
///
/// Surrounding whitespace is ignored; blank text counts as zero.
fn parse_amount(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }
    trimmed.parse()
}

/// One activity checkbox with its parsed cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activity {
    pub input: NodeId,
    /// The checkbox `name`, used to address activities from scripts.
    pub name: String,
    pub cost: Decimal,
}

/// Validation targets of one checked field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Element carrying the valid / not-valid classes.
    pub container: NodeId,
    pub hint: NodeId,
}

#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: BTreeMap<FieldKey, NodeId>,
    markers: BTreeMap<FieldKey, Marker>,
    activities_group: NodeId,
    activities: Vec<Activity>,
    total: NodeId,
    initial_total: Decimal,
    credit_card_panel: NodeId,
    paypal_panel: NodeId,
    bitcoin_panel: NodeId,
}

fn lookup(
    doc: &Document,
    role: &'static str,
    id: &str,
    expected: &'static str,
) -> Result<NodeId, RegistryError> {
    let node = doc
        .get_element_by_id(id)
        .ok_or_else(|| RegistryError::MissingElement {
            role,
            id: id.to_string(),
        })?;
    match doc.element(node) {
        Some(element) if element.is_tag(expected) => Ok(node),
        Some(element) => Err(RegistryError::WrongTag {
            role,
            id: id.to_string(),
            expected,
            found: element.tag.clone(),
        }),
        None => Err(RegistryError::MissingElement {
            role,
            id: id.to_string(),
        }),
    }
}

fn lookup_any(
    doc: &Document,
    role: &'static str,
    id: &str,
) -> Result<NodeId, RegistryError> {
    doc.get_element_by_id(id)
        .ok_or_else(|| RegistryError::MissingElement {
            role,
            id: id.to_string(),
        })
}

/// The running total stays within `|initial| + sum of |cost|` for any
/// toggle sequence, so that bound must be representable.
fn check_total_range(
    initial: Decimal,
    activities: &[Activity],
) -> Result<(), RegistryError> {
    activities
        .iter()
        .try_fold(initial.abs(), |bound, a| bound.checked_add(a.cost.abs()))
        .map(|_| ())
        .ok_or(RegistryError::TotalOverflow { initial })
}

impl FieldRegistry {
    pub fn build(
        doc: &Document,
        ids: &FieldIds,
    ) -> Result<Self, RegistryError> {
        lookup(doc, "form", &ids.form, "form")?;

        let job_role = lookup(doc, "job role", &ids.job_role, "select")?;
        let other_job_role = doc
            .next_element_sibling(job_role)
            .filter(|&n| doc.element(n).is_some_and(|e| e.is_tag("input")))
            .ok_or(RegistryError::MissingOtherJobRole)?;

        let activities_box = lookup_any(doc, "activities box", &ids.activities_box)?;
        let fields = BTreeMap::from([
            (FieldKey::Name, lookup(doc, "name", &ids.name, "input")?),
            (FieldKey::Email, lookup(doc, "email", &ids.email, "input")?),
            (FieldKey::JobRole, job_role),
            (FieldKey::OtherJobRole, other_job_role),
            (FieldKey::Design, lookup(doc, "design", &ids.design, "select")?),
            (FieldKey::Color, lookup(doc, "color", &ids.color, "select")?),
            (FieldKey::Activities, activities_box),
            (FieldKey::Payment, lookup(doc, "payment", &ids.payment, "select")?),
            (
                FieldKey::CardNumber,
                lookup(doc, "card number", &ids.card_number, "input")?,
            ),
            (FieldKey::Zip, lookup(doc, "zip code", &ids.zip, "input")?),
            (FieldKey::Cvv, lookup(doc, "cvv", &ids.cvv, "input")?),
        ]);

        let hints = [
            (FieldKey::Name, &ids.hints.name),
            (FieldKey::Email, &ids.hints.email),
            (FieldKey::CardNumber, &ids.hints.card_number),
            (FieldKey::Zip, &ids.hints.zip),
            (FieldKey::Cvv, &ids.hints.cvv),
            (FieldKey::Activities, &ids.hints.activities),
        ];
        let mut markers = BTreeMap::new();
        for (key, hint_id) in hints {
            let hint = lookup_any(doc, "hint", hint_id)?;
            let container = doc
                .parent(fields[&key])
                .ok_or(RegistryError::MissingContainer { key })?;
            markers.insert(key, Marker { container, hint });
        }

        let activities_group = lookup_any(doc, "activities", &ids.activities)?;
        let activities = doc
            .descendants_by_tag(activities_group, "input")
            .into_iter()
            .filter(|&n| doc.element(n).is_some_and(|e| e.is_checkbox()))
            .map(|input| -> Result<Activity, RegistryError> {
                let name = doc
                    .element(input)
                    .and_then(|e| e.name.clone())
                    .unwrap_or_default();
                let tag = doc
                    .data(input, "cost")
                    .ok_or_else(|| RegistryError::MissingCost { name: name.clone() })?;
                let cost = parse_amount(tag).map_err(|source| RegistryError::InvalidCost {
                    name: name.clone(),
                    cost: tag.to_string(),
                    source,
                })?;
                Ok(Activity { input, name, cost })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = lookup_any(doc, "total", &ids.total)?;
        let total_text = doc.text(total);
        let initial_total =
            parse_amount(total_text).map_err(|source| RegistryError::InvalidTotal {
                text: total_text.to_string(),
                source,
            })?;

        check_total_range(initial_total, &activities)?;

        let registry = Self {
            fields,
            markers,
            activities_group,
            activities,
            total,
            initial_total,
            credit_card_panel: lookup_any(doc, "credit card panel", &ids.credit_card_panel)?,
            paypal_panel: lookup_any(doc, "paypal panel", &ids.paypal_panel)?,
            bitcoin_panel: lookup_any(doc, "bitcoin panel", &ids.bitcoin_panel)?,
        };
        debug!(
            activities = registry.activities.len(),
            initial_total = %registry.initial_total,
            "field registry built"
        );
        Ok(registry)
    }

    /// Element registered under `key`. Every key is present after `build`.
    pub fn field(&self, key: FieldKey) -> NodeId {
        self.fields[&key]
    }

    /// Reverse lookup of a registered element.
    pub fn key_of(&self, node: NodeId) -> Option<FieldKey> {
        self.fields
            .iter()
            .find(|&(_, &n)| n == node)
            .map(|(&key, _)| key)
    }

    /// Container and hint of a validated field; `None` for unvalidated keys.
    pub fn marker(&self, key: FieldKey) -> Option<Marker> {
        self.markers.get(&key).copied()
    }

    /// Element that receives activity change events.
    pub fn activities_group(&self) -> NodeId {
        self.activities_group
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn activity(&self, input: NodeId) -> Option<&Activity> {
        self.activities.iter().find(|a| a.input == input)
    }

    pub fn activity_by_name(&self, name: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.name == name)
    }

    pub fn total(&self) -> NodeId {
        self.total
    }

    /// Total displayed by the page before any interaction.
    pub fn initial_total(&self) -> Decimal {
        self.initial_total
    }

    pub fn panel(&self, method: PaymentMethod) -> NodeId {
        match method {
            PaymentMethod::CreditCard => self.credit_card_panel,
            PaymentMethod::PayPal => self.paypal_panel,
            PaymentMethod::Bitcoin => self.bitcoin_panel,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::dom::{ActivityMarkup, PageMarkup};

    fn build(markup: &PageMarkup) -> Result<(Document, FieldRegistry), RegistryError> {
        let doc = Document::from_markup(markup);
        let registry = FieldRegistry::build(&doc, &FieldIds::default())?;
        Ok((doc, registry))
    }

    #[test]
    fn default_page_registers_every_key() {
        let (doc, registry) = build(&PageMarkup::default()).unwrap();

        for key in FieldKey::ALL {
            let node = registry.field(key);
            assert_eq!(registry.key_of(node), Some(key));
            assert!(doc.element(node).is_some());
        }
        assert_eq!(registry.activities().len(), 8);
        assert_eq!(registry.initial_total(), dec!(0));
    }

    #[test]
    fn other_job_role_is_sibling_of_selector() {
        let (doc, registry) = build(&PageMarkup::default()).unwrap();

        assert_eq!(
            Some(registry.field(FieldKey::OtherJobRole)),
            doc.get_element_by_id("other-job-role")
        );
    }

    #[test]
    fn containers_are_parents_of_their_fields() {
        let (doc, registry) = build(&PageMarkup::default()).unwrap();

        let name = registry.marker(FieldKey::Name).unwrap();
        assert_eq!(Some(name.container), doc.parent(registry.field(FieldKey::Name)));

        let activities = registry.marker(FieldKey::Activities).unwrap();
        assert_eq!(Some(activities.container), doc.get_element_by_id("activities"));
        assert!(registry.marker(FieldKey::Design).is_none());
    }

    #[test]
    fn missing_form_is_reported() {
        let doc = Document::from_markup(&PageMarkup::default());
        let ids = FieldIds {
            form: "signup".to_string(),
            ..Default::default()
        };

        let err = FieldRegistry::build(&doc, &ids).unwrap_err();

        assert_eq!(err.to_string(), "no element with id 'signup' for form");
    }

    #[test]
    fn costs_whose_sum_overflows_are_rejected() {
        let huge = |name: &str| ActivityMarkup {
            name: name.to_string(),
            label: name.to_string(),
            cost: Decimal::MAX.to_string(),
        };
        let markup = PageMarkup {
            activities: vec![huge("a"), huge("b")],
            ..Default::default()
        };

        assert!(matches!(build(&markup), Err(RegistryError::TotalOverflow { .. })));
    }

    #[test]
    fn largest_representable_cost_is_accepted() {
        let markup = PageMarkup {
            activities: vec![ActivityMarkup {
                name: "a".to_string(),
                label: "A".to_string(),
                cost: Decimal::MAX.to_string(),
            }],
            ..Default::default()
        };

        let (_, registry) = build(&markup).unwrap();

        assert_eq!(registry.activities()[0].cost, Decimal::MAX);
    }

    #[test]
    fn activities_are_addressable_by_name() {
        let (_, registry) = build(&PageMarkup::default()).unwrap();

        let all = registry.activity_by_name("all").unwrap();
        assert_eq!(all.cost, dec!(200));
        assert_eq!(registry.activity(all.input), Some(all));
        assert!(registry.activity_by_name("knitting").is_none());
    }

    #[test]
    fn renamed_element_is_reported_missing() {
        let doc = Document::from_markup(&PageMarkup::default());
        let ids = FieldIds {
            email: "e-mail".to_string(),
            ..Default::default()
        };

        let err = FieldRegistry::build(&doc, &ids).unwrap_err();

        assert_eq!(err.to_string(), "no element with id 'e-mail' for email");
    }

    #[test]
    fn element_with_wrong_tag_is_rejected() {
        let doc = Document::from_markup(&PageMarkup::default());
        let ids = FieldIds {
            payment: "credit-card".to_string(),
            ..Default::default()
        };

        assert!(matches!(
            FieldRegistry::build(&doc, &ids),
            Err(RegistryError::WrongTag { expected: "select", .. })
        ));
    }

    #[test]
    fn malformed_cost_is_rejected() {
        let markup = PageMarkup {
            activities: vec![ActivityMarkup {
                name: "all".to_string(),
                label: "Main Conference".to_string(),
                cost: "two hundred".to_string(),
            }],
            ..Default::default()
        };

        assert!(matches!(build(&markup), Err(RegistryError::InvalidCost { .. })));
    }

    #[test]
    fn malformed_total_is_rejected() {
        let markup = PageMarkup {
            initial_total: "$0".to_string(),
            ..Default::default()
        };

        assert!(matches!(build(&markup), Err(RegistryError::InvalidTotal { .. })));
    }

    #[test]
    fn blank_total_counts_as_zero() {
        let markup = PageMarkup {
            initial_total: "  ".to_string(),
            ..Default::default()
        };

        let (_, registry) = build(&markup).unwrap();

        assert_eq!(registry.initial_total(), Decimal::ZERO);
    }
}
