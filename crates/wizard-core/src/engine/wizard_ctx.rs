//! Contexto de una request sobre un wizard.

use indexmap::IndexMap;

use crate::engine::{SubmitOutcome, WizardFlow};
use crate::errors::WizardResult;
use crate::state::{FieldErrors, StepData, WizardState};
use crate::step::{StepDefinition, StepSchema};
use crate::store::StateStore;
use crate::validation::{Validator, Violation};

/// Agrupa orquestador, schema y state cargado para una request.
///
/// Proporciona una API ergonómica sobre `WizardFlow`: cada método delega en
/// la operación homónima, que persiste de inmediato. Al terminar la request
/// basta con soltar el contexto; la siguiente request vuelve a cargar.
pub struct WizardCtx<'a, S: StateStore, V: Validator> {
    pub flow: &'a mut WizardFlow<S, V>,
    pub schema: &'a StepSchema,
    state: WizardState,
}

impl<'a, S: StateStore, V: Validator> WizardCtx<'a, S, V> {
    #[inline]
    pub fn new(flow: &'a mut WizardFlow<S, V>, schema: &'a StepSchema, state: WizardState) -> Self {
        Self { flow, schema, state }
    }

    #[inline]
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    #[inline]
    pub fn into_state(self) -> WizardState {
        self.state
    }

    pub fn current(&self) -> WizardResult<&StepDefinition> {
        self.schema.current_step(&self.state)
    }

    #[inline]
    pub fn save(&mut self, data: &StepData) -> WizardResult<()> {
        self.flow.save_step_data(self.schema, &mut self.state, data)
    }

    #[inline]
    pub fn complete(&mut self) -> WizardResult<()> {
        self.flow.mark_step_completed(self.schema, &mut self.state)
    }

    #[inline]
    pub fn set_errors(&mut self, errors: FieldErrors) -> WizardResult<()> {
        self.flow.set_step_errors(self.schema, &mut self.state, errors)
    }

    #[inline]
    pub fn next(&mut self) -> WizardResult<bool> {
        self.flow.next_step(self.schema, &mut self.state)
    }

    #[inline]
    pub fn back(&mut self) -> WizardResult<bool> {
        self.flow.previous_step(self.schema, &mut self.state)
    }

    #[inline]
    pub fn go_to(&mut self, target: usize) -> WizardResult<bool> {
        self.flow.go_to_step(self.schema, &mut self.state, target)
    }

    #[inline]
    pub fn go_to_name(&mut self, target: &str) -> WizardResult<bool> {
        self.flow.go_to_step_by_name(self.schema, &mut self.state, target)
    }

    #[inline]
    pub fn validate(&self, data: &StepData) -> WizardResult<Vec<Violation>> {
        self.flow.validate_step(self.schema, &self.state, data)
    }

    /// Validación global sobre datos aplanados; ver `WizardFlow::validate_all_steps`.
    pub fn validate_all(&mut self, all_data: &StepData) -> WizardResult<IndexMap<String, FieldErrors>> {
        self.flow.validate_all_steps(self.schema, &mut self.state, all_data)
    }

    #[inline]
    pub fn submit(&mut self, data: &StepData) -> WizardResult<SubmitOutcome> {
        self.flow.submit_step(self.schema, &mut self.state, data)
    }

    /// Índices a los que se puede saltar desde el step actual.
    pub fn reachable(&self) -> Vec<usize> {
        self.schema.navigation_policy().reachable_steps(&self.state, self.schema)
    }

    pub fn is_complete(&self) -> bool {
        self.flow.is_complete(self.schema, &self.state)
    }
}
