use std::collections::HashMap;

use log::debug;
use serde_json::Value;

use super::StateStore;
use crate::errors::WizardResult;
use crate::state::WizardState;

/// Store en memoria equivalente a una sesión. Guarda el state serializado
/// (blob JSON) para que cada `load` rehidrate una copia independiente, igual
/// que ocurriría entre dos requests.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStateStore {
    inner: HashMap<String, Value>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Blob crudo tal como quedó guardado.
    pub fn raw(&self, wizard: &str) -> Option<&Value> {
        self.inner.get(wizard)
    }

    /// Inserta un blob crudo (p.ej. un state de una versión anterior).
    pub fn insert_raw(&mut self, wizard: impl Into<String>, blob: Value) {
        self.inner.insert(wizard.into(), blob);
    }
}

impl StateStore for InMemoryStateStore {
    fn load(&self, wizard: &str) -> WizardResult<Option<WizardState>> {
        let found = match self.inner.get(wizard) {
            Some(blob) => Some(WizardState::from_json(blob.clone())?),
            None => None,
        };
        debug!("load wizard={wizard} found={}", found.is_some());
        Ok(found)
    }

    fn save(&mut self, wizard: &str, state: &WizardState) -> WizardResult<()> {
        debug!("save wizard={wizard} step={} version={}",
               state.current_step(),
               state.schema_version());
        self.inner.insert(wizard.to_string(), state.to_json()?);
        Ok(())
    }

    fn clear(&mut self, wizard: &str) -> WizardResult<()> {
        let removed = self.inner.remove(wizard).is_some();
        debug!("clear wizard={wizard} removed={removed}");
        Ok(())
    }
}
