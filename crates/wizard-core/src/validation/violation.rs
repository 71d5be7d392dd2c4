use serde::{Deserialize, Serialize};

use crate::state::FieldErrors;

/// Violación reportada por el validador externo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { property_path: property_path.into(),
               message: message.into() }
    }

    pub fn field(&self) -> String {
        field_from_path(&self.property_path)
    }
}

/// Normaliza una ruta de propiedad al nombre de campo: `[email]` -> `email`,
/// `data[email]` -> `email`, `address.city` -> `address.city`.
pub fn field_from_path(path: &str) -> String {
    let trimmed = path.trim();
    match (trimmed.find('['), trimmed.ends_with(']')) {
        (Some(open), true) => {
            let inner = &trimmed[open + 1..trimmed.len() - 1];
            inner.replace("][", ".")
        }
        _ => trimmed.to_string(),
    }
}

/// Agrupa violaciones por campo conservando el orden de aparición.
pub fn violations_to_field_errors(violations: &[Violation]) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for v in violations {
        errors.entry(v.field()).or_default().push(v.message.clone());
    }
    errors
}
