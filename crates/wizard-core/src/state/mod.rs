//! Estado mutable por sesión de un wizard.

mod wizard_state;

pub use wizard_state::{FieldErrors, StepData, WizardState};
