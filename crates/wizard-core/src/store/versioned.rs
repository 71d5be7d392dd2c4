//! Decorador que resuelve el desfase de versión al cargar.

use log::debug;

use super::StateStore;
use crate::errors::WizardResult;
use crate::migration::{resolve_version, Resolution};
use crate::state::WizardState;
use crate::step::StepSchema;

/// Envuelve un `StateStore` y, al cargar para un schema, aplica la
/// estrategia de desfase de versión:
/// - `Reset`: borra la entrada y responde "sin state".
/// - `Migrate` / `Keep`: persiste el state migrado y lo devuelve.
/// - Versión vigente: devuelve el state tal cual, sin escribir.
#[derive(Debug, Default, Clone)]
pub struct VersionedStateStore<S: StateStore> {
    inner: S,
}

impl<S: StateStore> VersionedStateStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Carga el state de `schema.name()` ya alineado con `schema.version()`.
    pub fn load_for(&mut self, schema: &StepSchema) -> WizardResult<Option<WizardState>> {
        let Some(stored) = self.inner.load(schema.name())? else {
            return Ok(None);
        };
        match resolve_version(stored, schema) {
            Resolution::Current(state) => Ok(Some(state)),
            Resolution::Migrated(state) => {
                self.inner.save(schema.name(), &state)?;
                debug!("migrated state persisted wizard={} version={}",
                       schema.name(),
                       state.schema_version());
                Ok(Some(state))
            }
            Resolution::Reset => {
                self.inner.clear(schema.name())?;
                Ok(None)
            }
        }
    }
}

impl<S: StateStore> StateStore for VersionedStateStore<S> {
    fn load(&self, wizard: &str) -> WizardResult<Option<WizardState>> {
        self.inner.load(wizard)
    }

    fn save(&mut self, wizard: &str, state: &WizardState) -> WizardResult<()> {
        self.inner.save(wizard, state)
    }

    fn clear(&mut self, wizard: &str) -> WizardResult<()> {
        self.inner.clear(wizard)
    }
}
