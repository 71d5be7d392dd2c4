//! Definiciones relacionadas a Steps.
//!
//! Un wizard es una secuencia ordenada e inmutable de steps. Este módulo define:
//! - `StepDefinition`: descripción inmutable de un step (nombre, label,
//!   permiso de retroceso, grupos de validación y campos propios).
//! - `StepSchema`: colección ordenada de steps con versión, política de
//!   navegación y estrategia ante desfase de versión.

pub mod definition;
pub mod schema;

pub use definition::StepDefinition;
pub use schema::{StepSchema, StepSchemaBuilder};
