//! Core WizardFlow implementation

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;

use crate::errors::WizardResult;
use crate::state::{FieldErrors, StepData, WizardState};
use crate::step::{StepDefinition, StepSchema};
use crate::store::{StateStore, VersionedStateStore};
use crate::validation::{violations_to_field_errors, NoopValidator, Validator, Violation};

use super::WizardCtx;

/// Resultado de `submit_step`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Hubo violaciones; quedaron guardadas como errores del step.
    Invalid(FieldErrors),
    /// Step completado y cursor movido al siguiente.
    Advanced { to: usize },
    /// Step completado; era el último.
    Finished,
}

/// Orquestador de steps.
///
/// Todas las mutaciones pasan por aquí y se persisten inmediatamente. Los
/// rechazos de navegación son `Ok(false)`; sólo los errores estructurales
/// (cursor o nombre inexistente en el schema) y los fallos del store son
/// `Err`.
pub struct WizardFlow<S, V = NoopValidator>
    where S: StateStore,
          V: Validator
{
    store: VersionedStateStore<S>,
    validator: V,
}

impl<S: StateStore> WizardFlow<S, NoopValidator> {
    /// Orquestador sin validación (todas las validaciones pasan).
    pub fn new(store: S) -> Self {
        Self::with_validator(store, NoopValidator)
    }
}

impl<S, V> WizardFlow<S, V>
    where S: StateStore,
          V: Validator
{
    pub fn with_validator(store: S, validator: V) -> Self {
        Self { store: VersionedStateStore::new(store),
               validator }
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.store.inner_mut()
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    pub fn validator(&self) -> &V {
        &self.validator
    }

    fn persist(&mut self, schema: &StepSchema, state: &WizardState) -> WizardResult<()> {
        self.store.save(schema.name(), state)
    }

    /// Crea y persiste un state nuevo en el step 0.
    pub fn start(&mut self, schema: &StepSchema) -> WizardResult<WizardState> {
        let state = WizardState::new(schema.version());
        self.persist(schema, &state)?;
        debug!("start wizard={} version={}", schema.name(), schema.version());
        Ok(state)
    }

    /// Carga el state (resolviendo desfase de versión) o arranca uno nuevo.
    pub fn load_or_start(&mut self, schema: &StepSchema) -> WizardResult<WizardState> {
        match self.store.load_for(schema)? {
            Some(state) => Ok(state),
            None => self.start(schema),
        }
    }

    /// Abre un contexto de request sobre el state cargado.
    pub fn open<'a>(&'a mut self, schema: &'a StepSchema) -> WizardResult<WizardCtx<'a, S, V>> {
        let state = self.load_or_start(schema)?;
        Ok(WizardCtx::new(self, schema, state))
    }

    /// Guarda los datos del step actual.
    ///
    /// Si `data` trae un sub-mapa bajo el nombre del step se usa tal cual; si
    /// no, se filtra por los `fields` del step (o se guarda completo cuando el
    /// step no declara campos).
    pub fn save_step_data(&mut self, schema: &StepSchema, state: &mut WizardState, data: &StepData) -> WizardResult<()> {
        let step = schema.current_step(state)?;
        let extracted = extract_step_data(step, data);
        debug!("save_step_data wizard={} step={} fields={}",
               schema.name(),
               step.name(),
               extracted.len());
        state.set_step_data(step.name(), extracted);
        self.persist(schema, state)
    }

    /// Marca el step actual como completado y limpia sus errores.
    pub fn mark_step_completed(&mut self, schema: &StepSchema, state: &mut WizardState) -> WizardResult<()> {
        let name = schema.current_step(state)?.name().to_string();
        state.mark_step_completed(name.as_str());
        state.clear_step_errors(&name);
        debug!("mark_step_completed wizard={} step={name}", schema.name());
        self.persist(schema, state)
    }

    /// Sobrescribe los errores del step actual (vacío elimina la entrada).
    pub fn set_step_errors(&mut self,
                           schema: &StepSchema,
                           state: &mut WizardState,
                           errors: FieldErrors)
                           -> WizardResult<()> {
        let name = schema.current_step(state)?.name().to_string();
        debug!("set_step_errors wizard={} step={name} fields={}",
               schema.name(),
               errors.len());
        state.set_step_errors(name, errors);
        self.persist(schema, state)
    }

    /// Avanza un step. En el último step no hace nada y devuelve `false`.
    pub fn next_step(&mut self, schema: &StepSchema, state: &mut WizardState) -> WizardResult<bool> {
        let current = state.current_step();
        schema.step_at(current)?;
        if schema.is_last(current) {
            return Ok(false);
        }
        state.set_current_step(current + 1);
        debug!("next_step wizard={} {} -> {}", schema.name(), current, current + 1);
        self.persist(schema, state)?;
        Ok(true)
    }

    /// Retrocede un step si no es el primero y el step actual lo permite.
    pub fn previous_step(&mut self, schema: &StepSchema, state: &mut WizardState) -> WizardResult<bool> {
        let current = state.current_step();
        let step = schema.step_at(current)?;
        if current == 0 || !step.is_back_allowed() {
            return Ok(false);
        }
        state.set_current_step(current - 1);
        debug!("previous_step wizard={} {} -> {}", schema.name(), current, current - 1);
        self.persist(schema, state)?;
        Ok(true)
    }

    /// Salta a `target` si la política de navegación lo autoriza. Un cursor
    /// fuera de rango es un error estructural; un `target` fuera de rango es
    /// sólo una navegación rechazada.
    pub fn go_to_step(&mut self, schema: &StepSchema, state: &mut WizardState, target: usize) -> WizardResult<bool> {
        let current = state.current_step();
        schema.step_at(current)?;
        let allowed = schema.navigation_policy().can_navigate(target, current, state, schema);
        debug!("go_to_step wizard={} policy={} {} -> {} allowed={allowed}",
               schema.name(),
               schema.navigation_policy().as_str(),
               current,
               target);
        if !allowed {
            return Ok(false);
        }
        state.set_current_step(target);
        self.persist(schema, state)?;
        Ok(true)
    }

    /// Igual que `go_to_step` pero por nombre; un nombre inexistente es un
    /// error estructural.
    pub fn go_to_step_by_name(&mut self,
                              schema: &StepSchema,
                              state: &mut WizardState,
                              target: &str)
                              -> WizardResult<bool> {
        let index = schema.index_of(target)?;
        self.go_to_step(schema, state, index)
    }

    /// Valida `data` con los grupos efectivos del step actual.
    pub fn validate_step(&self, schema: &StepSchema, state: &WizardState, data: &StepData) -> WizardResult<Vec<Violation>> {
        let step = schema.current_step(state)?;
        let groups = step.effective_groups();
        Ok(self.validator.validate(data, None, &groups))
    }

    /// Valida `all_data` (datos aplanados) contra cada step con grupos propios
    /// y registra/limpia sus errores. Persiste una sola vez al final.
    ///
    /// Devuelve sólo los steps con errores.
    pub fn validate_all_steps(&mut self,
                              schema: &StepSchema,
                              state: &mut WizardState,
                              all_data: &StepData)
                              -> WizardResult<IndexMap<String, FieldErrors>> {
        let mut failing = IndexMap::new();
        for step in schema.steps().iter().filter(|s| !s.uses_default_group_only()) {
            let violations = self.validator.validate(all_data, None, &step.effective_groups());
            let errors = violations_to_field_errors(&violations);
            if errors.is_empty() {
                state.clear_step_errors(step.name());
            } else {
                state.set_step_errors(step.name(), errors.clone());
                failing.insert(step.name().to_string(), errors);
            }
        }
        debug!("validate_all_steps wizard={} failing={}", schema.name(), failing.len());
        self.persist(schema, state)?;
        Ok(failing)
    }

    /// Composición típica de un POST: valida, guarda datos y, si no hay
    /// violaciones, completa el step y avanza.
    pub fn submit_step(&mut self,
                       schema: &StepSchema,
                       state: &mut WizardState,
                       data: &StepData)
                       -> WizardResult<SubmitOutcome> {
        let step = schema.current_step(state)?;
        let extracted = extract_step_data(step, data);
        let violations = self.validate_step(schema, state, &extracted)?;
        self.save_step_data(schema, state, data)?;
        if !violations.is_empty() {
            let errors = violations_to_field_errors(&violations);
            self.set_step_errors(schema, state, errors.clone())?;
            return Ok(SubmitOutcome::Invalid(errors));
        }
        self.mark_step_completed(schema, state)?;
        if self.next_step(schema, state)? {
            Ok(SubmitOutcome::Advanced { to: state.current_step() })
        } else {
            Ok(SubmitOutcome::Finished)
        }
    }

    /// `true` si todos los steps del schema están completados.
    pub fn is_complete(&self, schema: &StepSchema, state: &WizardState) -> bool {
        schema.steps().iter().all(|s| state.is_step_completed(s.name()))
    }

    /// Elimina el state persistido del wizard.
    pub fn clear(&mut self, schema: &StepSchema) -> WizardResult<()> {
        debug!("clear wizard={}", schema.name());
        self.store.clear(schema.name())
    }
}

fn extract_step_data(step: &StepDefinition, data: &StepData) -> StepData {
    if let Some(Value::Object(nested)) = data.get(step.name()) {
        return nested.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
    }
    if step.has_fields() {
        return data.iter()
                   .filter(|(k, _)| step.owns_field(k))
                   .map(|(k, v)| (k.clone(), v.clone()))
                   .collect();
    }
    data.clone()
}
