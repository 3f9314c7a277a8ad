//! Form controller for the conference registration page.
//!
//! The controller attaches to an in-memory [`dom::Document`], resolves the
//! page's fields once into a [`registry::FieldRegistry`], and then reacts to
//! change, focus, blur and submit events:
//!
//! - the "other" job role field follows the job-role selector,
//! - shirt colors are filtered by the chosen design,
//! - a running total follows the checked activities,
//! - exactly one payment panel is shown,
//! - submission is validated and blocked with visible hints on failure.

pub mod config;
pub mod controller;
pub mod dom;
pub mod models;
pub mod registry;
pub mod validation;

pub use config::{ConfigError, ControllerConfig};
pub use controller::{ControllerError, Event, EventOutcome, FormController, SubmitOutcome};
pub use models::*;
