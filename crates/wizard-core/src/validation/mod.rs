//! Contrato de validación consumido por el orquestador.
//!
//! La ejecución de reglas es externa al core: el orquestador sólo conoce el
//! trait `Validator`, que recibe datos, restricciones opcionales y grupos, y
//! devuelve violaciones `(ruta, mensaje)`.

mod rules;
mod violation;

pub use rules::{FieldRule, RuleSetValidator};
pub use violation::{field_from_path, violations_to_field_errors, Violation};

use serde_json::Value;

use crate::state::StepData;

pub trait Validator {
    fn validate(&self, data: &StepData, constraints: Option<&Value>, groups: &[String]) -> Vec<Violation>;
}

/// Cualquier closure con la firma adecuada sirve como validador.
impl<F> Validator for F where F: Fn(&StepData, Option<&Value>, &[String]) -> Vec<Violation>
{
    fn validate(&self, data: &StepData, constraints: Option<&Value>, groups: &[String]) -> Vec<Violation> {
        self(data, constraints, groups)
    }
}

/// Validador que nunca reporta violaciones.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopValidator;

impl Validator for NoopValidator {
    fn validate(&self, _data: &StepData, _constraints: Option<&Value>, _groups: &[String]) -> Vec<Violation> {
        Vec::new()
    }
}
