//! Persistencia de `WizardState` por nombre de wizard.
//!
//! El core no asume ninguna tecnología: `StateStore` es un mapa clave ->
//! state. Se proveen un backend en memoria (una sesión) y un decorador que
//! resuelve el desfase de versión antes de entregar el state.

mod memory;
mod versioned;

pub use memory::InMemoryStateStore;
pub use versioned::VersionedStateStore;

use crate::errors::WizardResult;
use crate::state::WizardState;

/// Contrato de persistencia. Cada operación es un ciclo síncrono; no hay
/// coordinación entre requests concurrentes (last-write-wins).
pub trait StateStore {
    /// Carga el state guardado bajo `wizard`, si existe.
    fn load(&self, wizard: &str) -> WizardResult<Option<WizardState>>;
    /// Guarda (reemplaza) el state de `wizard`.
    fn save(&mut self, wizard: &str, state: &WizardState) -> WizardResult<()>;
    /// Elimina el state de `wizard`. Borrar algo inexistente no es error.
    fn clear(&mut self, wizard: &str) -> WizardResult<()>;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&self, wizard: &str) -> WizardResult<Option<WizardState>> {
        (**self).load(wizard)
    }
    fn save(&mut self, wizard: &str, state: &WizardState) -> WizardResult<()> {
        (**self).save(wizard, state)
    }
    fn clear(&mut self, wizard: &str) -> WizardResult<()> {
        (**self).clear(wizard)
    }
}
