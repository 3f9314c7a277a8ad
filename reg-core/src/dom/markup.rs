//! Declarative description of the registration page.
//!
//! [`PageMarkup`] holds the parts of the page that vary between events
//! (job roles, shirt designs and colors, activities and their costs, payment
//! methods). [`Document::from_markup`] turns it into the element tree the
//! controller expects. The element ids produced here are the defaults of
//! [`crate::config::FieldIds`].
//!
//! A page can be loaded from TOML:
//!
//! ```toml
//! initial_total = "0"
//!
//! [[activities]]
//! name = "all"
//! label = "Main Conference"
//! cost = "200"
//! ```

use serde::{Deserialize, Serialize};

use super::{Document, Element, NodeId};

/// A plain `<option>`: submitted value plus visible label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceMarkup {
    pub value: String,
    pub label: String,
}

/// A shirt color option tagged with the design theme it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorMarkup {
    pub value: String,
    pub label: String,
    pub theme: String,
}

/// One activity checkbox. `cost` is kept as text, the way the page carries
/// it in its `data-cost` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityMarkup {
    pub name: String,
    pub label: String,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMarkup {
    pub job_roles: Vec<ChoiceMarkup>,
    pub designs: Vec<ChoiceMarkup>,
    pub colors: Vec<ColorMarkup>,
    pub activities: Vec<ActivityMarkup>,
    /// Text initially shown in the total element.
    pub initial_total: String,
    pub payment_methods: Vec<ChoiceMarkup>,
}

fn choice(value: &str, label: &str) -> ChoiceMarkup {
    ChoiceMarkup {
        value: value.to_string(),
        label: label.to_string(),
    }
}

fn color(value: &str, label: &str, theme: &str) -> ColorMarkup {
    ColorMarkup {
        value: value.to_string(),
        label: label.to_string(),
        theme: theme.to_string(),
    }
}

fn activity(name: &str, label: &str, cost: &str) -> ActivityMarkup {
    ActivityMarkup {
        name: name.to_string(),
        label: label.to_string(),
        cost: cost.to_string(),
    }
}

impl Default for PageMarkup {
    /// The standard conference registration page.
    fn default() -> Self {
        Self {
            job_roles: vec![
                choice("full-stack js developer", "Full Stack JavaScript Developer"),
                choice("front-end developer", "Front End Developer"),
                choice("back-end developer", "Back End Developer"),
                choice("designer", "Designer"),
                choice("student", "Student"),
                choice("other", "Other"),
            ],
            designs: vec![
                choice("js puns", "Theme - JS Puns"),
                choice("heart js", "Theme - I \u{2665} JS"),
            ],
            colors: vec![
                color("cornflowerblue", "Cornflower Blue (JS Puns shirt only)", "js puns"),
                color("darkslategrey", "Dark Slate Grey (JS Puns shirt only)", "js puns"),
                color("gold", "Gold (JS Puns shirt only)", "js puns"),
                color("tomato", "Tomato (I \u{2665} JS shirt only)", "heart js"),
                color("steelblue", "Steel Blue (I \u{2665} JS shirt only)", "heart js"),
                color("dimgrey", "Dim Grey (I \u{2665} JS shirt only)", "heart js"),
            ],
            activities: vec![
                activity("all", "Main Conference", "200"),
                activity("js-frameworks", "JavaScript Frameworks Workshop", "100"),
                activity("js-libs", "JavaScript Libraries Workshop", "100"),
                activity("node", "Node.js Workshop", "100"),
                activity("tools", "Tools Workshop", "100"),
                activity("build-tools", "Build Tools Workshop", "100"),
                activity("npm", "npm Workshop", "100"),
                activity("express", "Express Workshop", "100"),
            ],
            initial_total: "0".to_string(),
            payment_methods: vec![
                choice("credit-card", "Credit Card"),
                choice("paypal", "PayPal"),
                choice("bitcoin", "Bitcoin"),
            ],
        }
    }
}

impl PageMarkup {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Appends a hidden, pre-selected placeholder option to `select`.
fn placeholder(
    doc: &mut Document,
    select: NodeId,
    value: &str,
    label: &str,
) -> NodeId {
    doc.append(
        select,
        Element::new("option")
            .with_value(value)
            .with_text(label)
            .hidden()
            .selected(),
    )
}

/// Appends `label > input + span.hint` and returns the input.
fn labeled_input(
    doc: &mut Document,
    parent: NodeId,
    id: &str,
    hint_id: &str,
    input_type: &str,
    label: &str,
) -> NodeId {
    let wrapper = doc.append(parent, Element::new("label").with_text(label));
    let input = doc.append(
        wrapper,
        Element::new("input")
            .with_id(id)
            .with_name(format!("user-{id}"))
            .with_type(input_type),
    );
    doc.append(
        wrapper,
        Element::new("span")
            .with_id(hint_id)
            .with_class("hint"),
    );
    input
}

impl Document {
    /// Builds the registration page described by `markup`.
    pub fn from_markup(markup: &PageMarkup) -> Self {
        let mut doc = Document::new();
        let form = doc.create(Element::new("form").with_id("registration"));

        let basic = doc.append(form, Element::new("fieldset").with_class("basic-info"));
        labeled_input(&mut doc, basic, "name", "name-hint", "text", "Name:");
        labeled_input(&mut doc, basic, "email", "email-hint", "email", "Email Address:");

        let job = doc.append(basic, Element::new("div").with_class("job-role"));
        let title = doc.append(
            job,
            Element::new("select")
                .with_id("title")
                .with_name("user-title"),
        );
        placeholder(&mut doc, title, "", "Select Job Role");
        for role in &markup.job_roles {
            doc.append(
                title,
                Element::new("option")
                    .with_value(&role.value)
                    .with_text(&role.label),
            );
        }
        doc.append(
            job,
            Element::new("input")
                .with_id("other-job-role")
                .with_name("other-job-role")
                .with_type("text"),
        );

        let shirts = doc.append(form, Element::new("fieldset").with_id("shirt-designs"));
        let design = doc.append(
            shirts,
            Element::new("select")
                .with_id("design")
                .with_name("user-design"),
        );
        placeholder(&mut doc, design, "", "Select Theme");
        for theme in &markup.designs {
            doc.append(
                design,
                Element::new("option")
                    .with_value(&theme.value)
                    .with_text(&theme.label),
            );
        }
        let colors = doc.append(shirts, Element::new("div").with_id("shirt-colors"));
        let color = doc.append(
            colors,
            Element::new("select")
                .with_id("color")
                .with_name("user-color"),
        );
        placeholder(&mut doc, color, "", "Select a design theme above");
        for shirt in &markup.colors {
            doc.append(
                color,
                Element::new("option")
                    .with_value(&shirt.value)
                    .with_text(&shirt.label)
                    .with_data("theme", &shirt.theme),
            );
        }

        let activities = doc.append(form, Element::new("fieldset").with_id("activities"));
        let activities_box = doc.append(activities, Element::new("div").with_id("activities-box"));
        for item in &markup.activities {
            let label = doc.append(activities_box, Element::new("label"));
            doc.append(
                label,
                Element::new("input")
                    .with_type("checkbox")
                    .with_name(&item.name)
                    .with_data("cost", &item.cost),
            );
            doc.append(label, Element::new("span").with_text(&item.label));
            doc.append(
                label,
                Element::new("span")
                    .with_class("activity-cost")
                    .with_text(format!("${}", item.cost)),
            );
        }
        let cost_line = doc.append(
            activities,
            Element::new("p")
                .with_id("activities-cost")
                .with_text("Total: $"),
        );
        doc.append(
            cost_line,
            Element::new("span")
                .with_id("total-amount")
                .with_text(&markup.initial_total),
        );
        doc.append(
            activities,
            Element::new("span")
                .with_id("activities-hint")
                .with_class("hint"),
        );

        let payment_box = doc.append(form, Element::new("fieldset").with_class("payment-methods"));
        let payment = doc.append(
            payment_box,
            Element::new("select")
                .with_id("payment")
                .with_name("user-payment"),
        );
        placeholder(&mut doc, payment, "select method", "Select Payment Method");
        for method in &markup.payment_methods {
            doc.append(
                payment,
                Element::new("option")
                    .with_value(&method.value)
                    .with_text(&method.label),
            );
        }
        let card = doc.append(payment_box, Element::new("div").with_id("credit-card"));
        labeled_input(&mut doc, card, "cc-num", "cc-hint", "text", "Card Number:");
        labeled_input(&mut doc, card, "zip", "zip-hint", "text", "Zip Code:");
        labeled_input(&mut doc, card, "cvv", "cvv-hint", "text", "CVV:");

        let paypal = doc.append(payment_box, Element::new("div").with_id("paypal"));
        doc.append(
            paypal,
            Element::new("p").with_text(
                "If you selected the PayPal option we'll take you to PayPal's site to set up your billing information, when you click \u{201c}Register\u{201d} below.",
            ),
        );
        let bitcoin = doc.append(payment_box, Element::new("div").with_id("bitcoin"));
        doc.append(
            bitcoin,
            Element::new("p").with_text(
                "If you selected the Bitcoin option we'll take you to the Coinbase site to set up your billing information. Due to the nature of exchanging Bitcoin, all Bitcoin transactions will be final.",
            ),
        );

        doc.append(
            form,
            Element::new("button")
                .with_type("submit")
                .with_text("Register"),
        );

        doc
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_page_exposes_expected_ids() {
        let doc = Document::from_markup(&PageMarkup::default());

        for id in [
            "registration",
            "name",
            "email",
            "title",
            "other-job-role",
            "design",
            "color",
            "activities",
            "activities-box",
            "total-amount",
            "payment",
            "credit-card",
            "paypal",
            "bitcoin",
            "cc-num",
            "zip",
            "cvv",
            "name-hint",
            "email-hint",
            "activities-hint",
            "cc-hint",
            "zip-hint",
            "cvv-hint",
        ] {
            assert!(doc.get_element_by_id(id).is_some(), "missing #{id}");
        }
    }

    #[test]
    fn other_job_role_follows_job_selector() {
        let doc = Document::from_markup(&PageMarkup::default());
        let title = doc.get_element_by_id("title").unwrap();

        assert_eq!(
            doc.next_element_sibling(title),
            doc.get_element_by_id("other-job-role")
        );
    }

    #[test]
    fn activities_carry_cost_tags() {
        let doc = Document::from_markup(&PageMarkup::default());
        let activities = doc.get_element_by_id("activities").unwrap();

        let costs: Vec<&str> = doc
            .descendants_by_tag(activities, "input")
            .into_iter()
            .filter_map(|n| doc.data(n, "cost"))
            .collect();

        assert_eq!(costs, ["200", "100", "100", "100", "100", "100", "100", "100"]);
    }

    #[test]
    fn payment_placeholder_comes_first() {
        let doc = Document::from_markup(&PageMarkup::default());
        let payment = doc.get_element_by_id("payment").unwrap();
        let options = doc.options(payment);

        assert_eq!(doc.value(options[0]), "select method");
        assert_eq!(doc.value(options[1]), "credit-card");
    }

    #[test]
    fn page_loads_from_toml() {
        let markup = PageMarkup::from_toml_str(
            r#"
            initial_total = "10"

            [[activities]]
            name = "keynote"
            label = "Keynote"
            cost = "12.5"
            "#,
        )
        .unwrap();

        assert_eq!(markup.initial_total, "10");
        assert_eq!(markup.activities.len(), 1);
        // Sections missing from the file fall back to the standard page.
        assert_eq!(markup.designs, PageMarkup::default().designs);
    }
}
