//! Errores del core del wizard.
//!
//! Sólo los errores estructurales (referencias a steps que no existen en el
//! schema) y los fallos del backend de persistencia se modelan aquí. La
//! navegación no autorizada, la validación y el desfase de versiones se
//! resuelven como valores de retorno, nunca como `Err`.

use thiserror::Error;

/// Result type alias para operaciones del core.
pub type WizardResult<T> = std::result::Result<T, WizardError>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum WizardError {
    #[error("unknown step '{0}'")]
    UnknownStep(String),
    #[error("step index {index} out of range (schema has {len} steps)")]
    StepIndexOutOfRange { index: usize, len: usize },
    #[error("duplicate step name '{0}' in schema")]
    DuplicateStep(String),
    #[error("schema must declare at least one step")]
    EmptySchema,
    #[error("store error: {0}")]
    Store(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl WizardError {
    /// Código estable para manejo programático (logs, respuestas HTTP).
    pub fn code(&self) -> &'static str {
        match self {
            WizardError::UnknownStep(_) => "UNKNOWN_STEP",
            WizardError::StepIndexOutOfRange { .. } => "STEP_INDEX_OUT_OF_RANGE",
            WizardError::DuplicateStep(_) => "DUPLICATE_STEP",
            WizardError::EmptySchema => "EMPTY_SCHEMA",
            WizardError::Store(_) => "STORE_ERROR",
            WizardError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Indica un bug de configuración schema/state (no un evento de usuario).
    pub fn is_structural(&self) -> bool {
        matches!(self,
                 WizardError::UnknownStep(_)
                 | WizardError::StepIndexOutOfRange { .. }
                 | WizardError::DuplicateStep(_)
                 | WizardError::EmptySchema)
    }
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        WizardError::Serialization(err.to_string())
    }
}
