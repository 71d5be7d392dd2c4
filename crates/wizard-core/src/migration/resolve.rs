//! Resolución determinista del desfase de versión.
//!
//! - `Reset`: el state viejo se descarta.
//! - `Migrate`: se adopta tal cual el state devuelto por el migrador; sin
//!   migrador configurado se aplica `Keep`.
//! - `Keep`: state nuevo en la versión del schema, cursor en 0, sólo los
//!   campos declarados por algún step vigente. Completados y errores no se
//!   arrastran.
//!
//! Resolver un state cuya versión ya coincide devuelve el mismo state sin
//! cambios.

use indexmap::IndexMap;
use log::info;

use crate::state::{StepData, WizardState};
use crate::step::StepSchema;

use super::MismatchStrategy;

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// La versión coincide; el state no se tocó.
    Current(WizardState),
    /// El state se reconstruyó (migrador custom o keep).
    Migrated(WizardState),
    /// El state se descartó; el llamador debe empezar de cero.
    Reset,
}

impl Resolution {
    /// State resultante, si sobrevive alguno.
    pub fn into_state(self) -> Option<WizardState> {
        match self {
            Resolution::Current(s) | Resolution::Migrated(s) => Some(s),
            Resolution::Reset => None,
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Resolution::Current(_))
    }
}

pub fn resolve_version(state: WizardState, schema: &StepSchema) -> Resolution {
    if state.schema_version() == schema.version() {
        return Resolution::Current(state);
    }
    let from = state.schema_version().to_string();
    match schema.mismatch_strategy() {
        MismatchStrategy::Reset => {
            info!("version mismatch wizard={} from={} to={} strategy=reset",
                  schema.name(),
                  from,
                  schema.version());
            Resolution::Reset
        }
        MismatchStrategy::Migrate => match schema.migration() {
            Some(migrate) => {
                info!("version mismatch wizard={} from={} to={} strategy=migrate(custom)",
                      schema.name(),
                      from,
                      schema.version());
                Resolution::Migrated(migrate(&state, schema))
            }
            None => {
                info!("version mismatch wizard={} from={} to={} strategy=migrate(no migrator -> keep)",
                      schema.name(),
                      from,
                      schema.version());
                Resolution::Migrated(keep_compatible(&state, schema))
            }
        },
        MismatchStrategy::Keep => {
            info!("version mismatch wizard={} from={} to={} strategy=keep",
                  schema.name(),
                  from,
                  schema.version());
            Resolution::Migrated(keep_compatible(&state, schema))
        }
    }
}

/// State nuevo con los campos compatibles del viejo.
///
/// Un campo sobrevive si su step sigue en el schema y su nombre está en la
/// unión de `fields` de los steps vigentes; los steps cuyo filtrado queda
/// vacío se omiten.
pub fn keep_compatible(old: &WizardState, schema: &StepSchema) -> WizardState {
    let allowed = schema.all_fields();
    let mut step_data: IndexMap<String, StepData> = IndexMap::new();
    for (step, data) in old.all_data() {
        if !schema.has_step(step) {
            continue;
        }
        let kept: StepData = data.iter()
                                 .filter(|(field, _)| allowed.contains(field.as_str()))
                                 .map(|(k, v)| (k.clone(), v.clone()))
                                 .collect();
        if !kept.is_empty() {
            step_data.insert(step.clone(), kept);
        }
    }
    WizardState::from_parts(schema.version(), 0, step_data, IndexMap::new(), Vec::<String>::new())
}
