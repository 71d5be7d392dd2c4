//! Error de alto nivel del binario.

use thiserror::Error;
use wizard_core::WizardError;
use wizard_persistence::PersistenceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl AppError {
    /// Código de salida del proceso.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Wizard(e) if e.is_structural() => 2,
            AppError::Wizard(_) => 1,
            AppError::Persistence(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_kind() {
        assert_eq!(AppError::from(WizardError::EmptySchema).exit_code(), 2);
        assert_eq!(AppError::from(WizardError::Store("x".into())).exit_code(), 1);
        assert_eq!(AppError::from(PersistenceError::NotFound).exit_code(), 3);
    }
}
