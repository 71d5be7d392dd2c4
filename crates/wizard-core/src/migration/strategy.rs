use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::state::WizardState;
use crate::step::StepSchema;

/// Migrador custom: (state viejo, schema nuevo) -> state nuevo.
pub type StateMigrator = Arc<dyn Fn(&WizardState, &StepSchema) -> WizardState + Send + Sync>;

/// Qué hacer cuando `state.schema_version != schema.version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MismatchStrategy {
    /// Descarta el state: equivale a "no hay state guardado".
    #[default]
    Reset,
    /// Usa el migrador del schema; sin migrador cae en `Keep`.
    Migrate,
    /// Conserva sólo los campos que el schema nuevo declara.
    Keep,
}

impl MismatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MismatchStrategy::Reset => "reset",
            MismatchStrategy::Migrate => "migrate",
            MismatchStrategy::Keep => "keep",
        }
    }
}
