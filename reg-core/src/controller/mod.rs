//! The registration form controller.
//!
//! [`FormController`] owns the document together with everything derived
//! from it at load time: the [`FieldRegistry`], the compiled [`Validator`],
//! the [`RunningTotal`] and the active [`PaymentMethod`]. Constructing it
//! runs the load behaviors; afterwards every change to the page goes through
//! [`FormController::dispatch`], which routes an [`Event`] to the behavior
//! listening on its target and runs it to completion.
//!
//! # Example
//!
//! ```
//! use reg_core::config::ControllerConfig;
//! use reg_core::controller::FormController;
//! use reg_core::dom::PageMarkup;
//! use reg_core::models::{FieldKey, PaymentMethod};
//!
//! let mut form =
//!     FormController::from_markup(&PageMarkup::default(), ControllerConfig::default()).unwrap();
//!
//! form.select(FieldKey::Payment, "paypal");
//! assert_eq!(form.payment(), PaymentMethod::PayPal);
//!
//! form.fill(FieldKey::Name, "Jane Doe");
//! form.fill(FieldKey::Email, "jane@example.com");
//! form.set_activity("all", true);
//! assert_eq!(form.total_text(), "200");
//!
//! assert!(!form.submit().is_blocked());
//! ```

mod activities;
mod payment;
mod submit;
mod visibility;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::trace;

use crate::config::{ConfigError, ControllerConfig};
use crate::dom::{Document, NodeId, PageMarkup};
use crate::models::{FieldKey, PaymentMethod, RunningTotal};
use crate::registry::{FieldRegistry, RegistryError};
use crate::validation::{ValidationReport, Validator};

pub use submit::SubmitOutcome;

/// The controller could not attach to the page.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid validation pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Events the page dispatches to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Change(NodeId),
    Focus(NodeId),
    Blur(NodeId),
    Submit,
}

/// What dispatching an event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// No behavior listens on the target.
    Ignored,
    Handled,
    Submitted(SubmitOutcome),
}

#[derive(Debug, Clone)]
pub struct FormController {
    document: Document,
    registry: FieldRegistry,
    validator: Validator,
    config: ControllerConfig,
    total: RunningTotal,
    payment: PaymentMethod,
}

impl FormController {
    /// Attaches to `document` and runs the load behaviors.
    pub fn new(
        document: Document,
        config: ControllerConfig,
    ) -> Result<Self, ControllerError> {
        config.validation.validate()?;
        let registry = FieldRegistry::build(&document, &config.ids)?;
        let validator = Validator::new(&config.validation)?;
        let total = RunningTotal::new(registry.initial_total());

        let mut controller = Self {
            document,
            registry,
            validator,
            config,
            total,
            payment: PaymentMethod::default(),
        };
        controller.load();
        Ok(controller)
    }

    pub fn from_markup(
        markup: &PageMarkup,
        config: ControllerConfig,
    ) -> Result<Self, ControllerError> {
        Self::new(Document::from_markup(markup), config)
    }

    fn load(&mut self) {
        self.init_focus_and_visibility();
        self.init_payment();
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn total(&self) -> Decimal {
        self.total.value()
    }

    /// Text currently shown in the total element.
    pub fn total_text(&self) -> &str {
        self.document.text(self.registry.total())
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    /// Element registered under `key`.
    pub fn field(&self, key: FieldKey) -> NodeId {
        self.registry.field(key)
    }

    pub fn dispatch(&mut self, event: Event) -> EventOutcome {
        match event {
            Event::Change(target) => self.on_change(target),
            Event::Focus(target) => self.on_focus(target),
            Event::Blur(target) => self.on_blur(target),
            Event::Submit => EventOutcome::Submitted(self.on_submit()),
        }
    }

    fn on_change(&mut self, target: NodeId) -> EventOutcome {
        match self.registry.key_of(target) {
            Some(FieldKey::JobRole) => self.on_job_role_change(),
            Some(FieldKey::Design) => self.on_design_change(),
            Some(FieldKey::Payment) => self.on_payment_change(),
            _ if self.document.contains(self.registry.activities_group(), target) => {
                return self.on_activity_change(target);
            }
            _ => {
                trace!(%target, "change event ignored");
                return EventOutcome::Ignored;
            }
        }
        EventOutcome::Handled
    }

    // --- user interaction ---------------------------------------------------

    /// Types `value` into a text field. Typing dispatches no event the
    /// controller listens to.
    pub fn fill(
        &mut self,
        key: FieldKey,
        value: impl Into<String>,
    ) {
        let node = self.registry.field(key);
        self.document.set_value(node, value);
    }

    /// Picks `value` in the selector registered under `key` and dispatches
    /// the change event.
    ///
    /// A value with no matching option leaves the selector with nothing
    /// selected, as a browser does.
    pub fn select(
        &mut self,
        key: FieldKey,
        value: &str,
    ) -> EventOutcome {
        let node = self.registry.field(key);
        self.document.select_by_value(node, value);
        self.dispatch(Event::Change(node))
    }

    /// Checks or unchecks the activity named `name`.
    ///
    /// A change event fires only when the checkbox actually flips. Returns
    /// `None` when no activity has that name.
    pub fn set_activity(
        &mut self,
        name: &str,
        checked: bool,
    ) -> Option<EventOutcome> {
        let input = self.registry.activity_by_name(name)?.input;
        if self.document.is_checked(input) == checked {
            return Some(EventOutcome::Ignored);
        }
        self.document.set_checked(input, checked);
        Some(self.dispatch(Event::Change(input)))
    }

    /// Moves focus to `node`, dispatching blur on the previously focused
    /// element first.
    pub fn focus(&mut self, node: NodeId) -> EventOutcome {
        if let Some(previous) = self.document.active_element() {
            if previous == node {
                return EventOutcome::Ignored;
            }
            self.blur(previous);
        }
        self.document.focus(node);
        self.dispatch(Event::Focus(node))
    }

    /// Removes focus from `node` if it has it.
    pub fn blur(&mut self, node: NodeId) -> EventOutcome {
        if self.document.active_element() != Some(node) {
            return EventOutcome::Ignored;
        }
        self.document.blur(node);
        self.dispatch(Event::Blur(node))
    }

    /// Submits the form.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.on_submit()
    }

    /// Runs the submit rules without touching the page.
    pub fn check(&self) -> ValidationReport {
        self.validator.evaluate(&self.snapshot())
    }
}
