pub mod logging;
pub mod report;
pub mod script;
pub mod settings;
