//! The wizard session: document store, debounced saving and step progress.

pub mod scheduler;
pub mod steps;
pub mod store;

pub use steps::{CompletionReport, StepStatus, WizardStep, STEP_COUNT};
pub use store::{DocumentStore, SaveOutcome, StoreOptions, StoreSnapshot};
