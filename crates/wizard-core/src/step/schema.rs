//! `StepSchema`: definición versionada e inmutable de un wizard.
//!
//! Invariantes:
//! - El orden de los steps queda fijo al construir.
//! - Los nombres son únicos; `index_of(name)` y `get_by_name(name)` siempre
//!   apuntan al mismo step.
//! - La versión es opaca y sólo se compara por igualdad. Si no se declara una
//!   versión explícita se deriva del layout (nombres + campos) vía hash
//!   canónico, de modo que cualquier cambio estructural la modifica.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexSet;
use serde_json::json;

use crate::constants::{DERIVED_VERSION_LEN, DERIVED_VERSION_PREFIX};
use crate::errors::{WizardError, WizardResult};
use crate::hashing::hash_value;
use crate::migration::{MismatchStrategy, StateMigrator};
use crate::policy::NavigationPolicy;
use crate::state::WizardState;

use super::StepDefinition;

#[derive(Clone)]
pub struct StepSchema {
    name: String,
    version: String,
    steps: Vec<StepDefinition>,
    positions: HashMap<String, usize>,
    navigation_policy: NavigationPolicy,
    mismatch_strategy: MismatchStrategy,
    migration: Option<StateMigrator>,
}

impl fmt::Debug for StepSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepSchema")
         .field("name", &self.name)
         .field("version", &self.version)
         .field("steps", &self.steps)
         .field("navigation_policy", &self.navigation_policy)
         .field("mismatch_strategy", &self.mismatch_strategy)
         .field("migration", &self.migration.as_ref().map(|_| "<fn>"))
         .finish()
    }
}

impl StepSchema {
    pub fn builder(name: impl Into<String>) -> StepSchemaBuilder {
        StepSchemaBuilder { name: name.into(),
                            version: None,
                            steps: Vec::new(),
                            navigation_policy: NavigationPolicy::default(),
                            mismatch_strategy: MismatchStrategy::default(),
                            migration: None }
    }

    /// Nombre del wizard (clave en el store).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Índice del último step. El builder garantiza al menos uno.
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn navigation_policy(&self) -> NavigationPolicy {
        self.navigation_policy
    }

    pub fn mismatch_strategy(&self) -> MismatchStrategy {
        self.mismatch_strategy
    }

    pub fn migration(&self) -> Option<&StateMigrator> {
        self.migration.as_ref()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        index < self.steps.len()
    }

    pub fn has_step(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Step en `index`. Un índice fuera de rango es un bug schema/state.
    pub fn step_at(&self, index: usize) -> WizardResult<&StepDefinition> {
        self.steps.get(index).ok_or(WizardError::StepIndexOutOfRange { index,
                                                                       len: self.steps.len() })
    }

    /// Posición del step `name`.
    pub fn index_of(&self, name: &str) -> WizardResult<usize> {
        self.positions.get(name).copied().ok_or_else(|| WizardError::UnknownStep(name.to_string()))
    }

    pub fn get_by_name(&self, name: &str) -> WizardResult<&StepDefinition> {
        let index = self.index_of(name)?;
        self.step_at(index)
    }

    /// Nombre del step en `index`.
    pub fn step_name(&self, index: usize) -> WizardResult<&str> {
        self.step_at(index).map(StepDefinition::name)
    }

    /// Step actual según el cursor del state.
    pub fn current_step(&self, state: &WizardState) -> WizardResult<&StepDefinition> {
        self.step_at(state.current_step())
    }

    pub fn is_first(&self, index: usize) -> bool {
        index == 0
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.last_index()
    }

    /// Unión de los campos declarados por todos los steps.
    pub fn all_fields(&self) -> IndexSet<String> {
        self.steps.iter().flat_map(|s| s.field_names().iter().cloned()).collect()
    }

    /// Grupos de validación efectivos del step `name`.
    pub fn effective_groups(&self, name: &str) -> WizardResult<Vec<String>> {
        self.get_by_name(name).map(StepDefinition::effective_groups)
    }
}

/// Versión derivada del layout: hash canónico de nombres y campos en orden.
pub fn derive_version(steps: &[StepDefinition]) -> String {
    let layout: Vec<serde_json::Value> = steps.iter()
                                              .map(|s| {
                                                  json!({
                                                      "name": s.name(),
                                                      "fields": s.field_names().iter().collect::<Vec<_>>(),
                                                  })
                                              })
                                              .collect();
    let hash = hash_value(&serde_json::Value::Array(layout));
    format!("{}{}", DERIVED_VERSION_PREFIX, &hash[..DERIVED_VERSION_LEN])
}

pub struct StepSchemaBuilder {
    name: String,
    version: Option<String>,
    steps: Vec<StepDefinition>,
    navigation_policy: NavigationPolicy,
    mismatch_strategy: MismatchStrategy,
    migration: Option<StateMigrator>,
}

impl StepSchemaBuilder {
    /// Versión explícita (opaca). Sin ella se deriva del layout.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn step(mut self, step: StepDefinition) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps<I>(mut self, steps: I) -> Self
        where I: IntoIterator<Item = StepDefinition>
    {
        self.steps.extend(steps);
        self
    }

    pub fn policy(mut self, policy: NavigationPolicy) -> Self {
        self.navigation_policy = policy;
        self
    }

    pub fn on_mismatch(mut self, strategy: MismatchStrategy) -> Self {
        self.mismatch_strategy = strategy;
        self
    }

    /// Migrador custom; sólo se usa con `MismatchStrategy::Migrate`.
    pub fn migration<F>(mut self, migrate: F) -> Self
        where F: Fn(&WizardState, &StepSchema) -> WizardState + Send + Sync + 'static
    {
        self.migration = Some(Arc::new(migrate));
        self
    }

    pub fn build(self) -> WizardResult<StepSchema> {
        if self.steps.is_empty() {
            return Err(WizardError::EmptySchema);
        }
        let mut positions = HashMap::with_capacity(self.steps.len());
        for (i, step) in self.steps.iter().enumerate() {
            if positions.insert(step.name().to_string(), i).is_some() {
                return Err(WizardError::DuplicateStep(step.name().to_string()));
            }
        }
        let version = self.version.unwrap_or_else(|| derive_version(&self.steps));
        Ok(StepSchema { name: self.name,
                        version,
                        steps: self.steps,
                        positions,
                        navigation_policy: self.navigation_policy,
                        mismatch_strategy: self.mismatch_strategy,
                        migration: self.migration })
    }
}
