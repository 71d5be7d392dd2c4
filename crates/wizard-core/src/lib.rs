//! wizard-core: motor de progresión de formularios multi-step.
//!
//! Decide, a partir de un snapshot persistido y sin continuidad en memoria
//! entre requests, en qué step está el usuario, qué datos y errores tiene
//! cada step, cuáles están completados y si un salto está autorizado.
//!
//! Módulos:
//! - `step`: `StepDefinition` y `StepSchema` (versionado, orden fijo).
//! - `state`: `WizardState`, el registro persistido por wizard.
//! - `policy`: `NavigationPolicy` (free / sequential / linear).
//! - `migration`: resolución de desfase de versión (reset / migrate / keep).
//! - `store`: `StateStore`, backend en memoria y decorador versionado.
//! - `validation`: contrato del validador externo.
//! - `engine`: `WizardFlow` (orquestador) y `WizardCtx`.

pub mod constants;
pub mod engine;
pub mod errors;
pub mod hashing;
pub mod migration;
pub mod policy;
pub mod state;
pub mod step;
pub mod store;
pub mod validation;

pub use engine::{SubmitOutcome, WizardCtx, WizardFlow};
pub use errors::{WizardError, WizardResult};
pub use migration::{MismatchStrategy, Resolution};
pub use policy::NavigationPolicy;
pub use state::{FieldErrors, StepData, WizardState};
pub use step::{StepDefinition, StepSchema};
pub use store::{InMemoryStateStore, StateStore, VersionedStateStore};
pub use validation::{FieldRule, RuleSetValidator, Validator, Violation};
