//! `WizardState`: registro de progreso persistido por wizard.
//!
//! Layout persistido (serde, claves camelCase): `schemaVersion`,
//! `currentStep`, `stepData`, `stepErrors`, `completedSteps`. Cualquier
//! serialización concreta (JSON, JSONB, blob de sesión) debe preservar los
//! cinco campos.
//!
//! Invariantes:
//! - Un step sin errores no tiene entrada en `step_errors` (nunca un mapa
//!   vacío).
//! - `completed_steps` es un conjunto: insertar dos veces es idempotente. Se
//!   preserva el orden de inserción para que la serialización sea
//!   determinista.
//! - `current_step` nunca es negativo; un valor negativo en el blob se lleva a
//!   0 al rehidratar.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::WizardResult;

/// Datos de un step: campo -> valor.
pub type StepData = IndexMap<String, Value>;

/// Errores de un step: campo -> mensajes.
pub type FieldErrors = IndexMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    schema_version: String,
    #[serde(deserialize_with = "clamped_step")]
    current_step: usize,
    #[serde(default)]
    step_data: IndexMap<String, StepData>,
    #[serde(default)]
    step_errors: IndexMap<String, FieldErrors>,
    #[serde(default)]
    completed_steps: IndexSet<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawStep {
    Signed(i64),
    Unsigned(u64),
}

// Negativo -> 0. Un valor enorme queda fuera de rango (y falla al leerlo
// contra el schema) en lugar de impedir la carga.
fn clamped_step<'de, D>(deserializer: D) -> Result<usize, D::Error>
    where D: Deserializer<'de>
{
    Ok(match RawStep::deserialize(deserializer)? {
        RawStep::Signed(n) => usize::try_from(n.max(0)).unwrap_or(usize::MAX),
        RawStep::Unsigned(n) => usize::try_from(n).unwrap_or(usize::MAX),
    })
}

impl WizardState {
    /// State vacío en el step 0 para la versión dada.
    pub fn new(schema_version: impl Into<String>) -> Self {
        Self { schema_version: schema_version.into(),
               current_step: 0,
               step_data: IndexMap::new(),
               step_errors: IndexMap::new(),
               completed_steps: IndexSet::new() }
    }

    /// Constructor explícito de rehidratación. Normaliza las invariantes:
    /// cursor negativo -> 0, entradas de errores vacías descartadas.
    pub fn from_parts(schema_version: impl Into<String>,
                      current_step: i64,
                      step_data: IndexMap<String, StepData>,
                      step_errors: IndexMap<String, FieldErrors>,
                      completed_steps: impl IntoIterator<Item = String>)
                      -> Self {
        let step_errors = step_errors.into_iter().filter(|(_, errs)| !errs.is_empty()).collect();
        Self { schema_version: schema_version.into(),
               current_step: current_step.max(0) as usize,
               step_data,
               step_errors,
               completed_steps: completed_steps.into_iter().collect() }
    }

    pub fn from_json(value: Value) -> WizardResult<Self> {
        let mut state: WizardState = serde_json::from_value(value)?;
        state.step_errors.retain(|_, errs| !errs.is_empty());
        Ok(state)
    }

    pub fn to_json(&self) -> WizardResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Fija el cursor. No se acota a la longitud del schema: leer fuera de
    /// rango es un error del llamador.
    pub fn set_current_step(&mut self, step: usize) {
        self.current_step = step;
    }

    // ------------------------------------------------------------------
    // Datos
    // ------------------------------------------------------------------

    pub fn step_data(&self, step: &str) -> Option<&StepData> {
        self.step_data.get(step)
    }

    /// Valor de un campo concreto de un step.
    pub fn step_value(&self, step: &str, field: &str) -> Option<&Value> {
        self.step_data.get(step).and_then(|d| d.get(field))
    }

    pub fn set_step_data(&mut self, step: impl Into<String>, data: StepData) {
        self.step_data.insert(step.into(), data);
    }

    pub fn remove_step_data(&mut self, step: &str) -> Option<StepData> {
        self.step_data.shift_remove(step)
    }

    /// Mapa anidado step -> datos.
    pub fn all_data(&self) -> &IndexMap<String, StepData> {
        &self.step_data
    }

    /// Aplana los datos de todos los steps en un único mapa. En colisión de
    /// claves gana el step guardado más tarde.
    pub fn merged_data(&self) -> StepData {
        let mut merged = StepData::new();
        for data in self.step_data.values() {
            for (k, v) in data {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
    }

    // ------------------------------------------------------------------
    // Errores
    // ------------------------------------------------------------------

    pub fn step_errors(&self, step: &str) -> Option<&FieldErrors> {
        self.step_errors.get(step)
    }

    pub fn has_step_errors(&self, step: &str) -> bool {
        self.step_errors.contains_key(step)
    }

    pub fn all_errors(&self) -> &IndexMap<String, FieldErrors> {
        &self.step_errors
    }

    /// Sobrescribe los errores del step; un mapa vacío elimina la entrada.
    pub fn set_step_errors(&mut self, step: impl Into<String>, errors: FieldErrors) {
        let step = step.into();
        if errors.is_empty() {
            self.step_errors.shift_remove(&step);
        } else {
            self.step_errors.insert(step, errors);
        }
    }

    pub fn clear_step_errors(&mut self, step: &str) {
        self.step_errors.shift_remove(step);
    }

    // ------------------------------------------------------------------
    // Completados
    // ------------------------------------------------------------------

    /// Marca el step como completado. Devuelve `false` si ya lo estaba.
    pub fn mark_step_completed(&mut self, step: impl Into<String>) -> bool {
        self.completed_steps.insert(step.into())
    }

    pub fn unmark_step_completed(&mut self, step: &str) -> bool {
        self.completed_steps.shift_remove(step)
    }

    pub fn is_step_completed(&self, step: &str) -> bool {
        self.completed_steps.contains(step)
    }

    pub fn completed_steps(&self) -> impl Iterator<Item = &str> {
        self.completed_steps.iter().map(String::as_str)
    }

    pub fn completed_count(&self) -> usize {
        self.completed_steps.len()
    }

    /// Fracción completada (0.0..=1.0) respecto de `total` steps.
    pub fn progress(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (self.completed_steps.len().min(total) as f64) / (total as f64)
    }
}
