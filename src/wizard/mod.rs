//! Five-step document assistant wizard
//!
//! Upload a document, describe what to extract, wait for the extraction job,
//! preview the table, then generate a report. The state machine in
//! [`machine`] is independent of any front end; [`controller`] runs its
//! effects on tokio.

pub mod controller;
pub mod machine;
pub mod state;

pub use controller::WizardController;
pub use machine::{Action, Effect, Transition};
pub use state::{ExtractionResult, FileDescriptor, Metric, Notice, Report, Step, WizardState};
