use indexmap::IndexSet;

use crate::constants::DEFAULT_VALIDATION_GROUP;

/// Descripción inmutable de un step.
///
/// `validation_groups` vacío significa "usar el grupo por defecto"; la regla
/// se resuelve explícitamente en [`StepDefinition::effective_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    name: String,
    label: String,
    allow_back: bool,
    validation_groups: IndexSet<String>,
    fields: IndexSet<String>,
}

impl StepDefinition {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self { name: name.into(),
               label: label.into(),
               allow_back: true,
               validation_groups: IndexSet::new(),
               fields: IndexSet::new() }
    }

    /// Prohíbe volver atrás desde este step.
    pub fn no_back(mut self) -> Self {
        self.allow_back = false;
        self
    }

    pub fn allow_back(mut self, allow: bool) -> Self {
        self.allow_back = allow;
        self
    }

    /// Grupos de validación (orden preservado, duplicados ignorados).
    pub fn groups<I, S>(mut self, groups: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.validation_groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Campos que pertenecen a este step.
    pub fn fields<I, S>(mut self, fields: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_back_allowed(&self) -> bool {
        self.allow_back
    }

    pub fn validation_groups(&self) -> &IndexSet<String> {
        &self.validation_groups
    }

    pub fn field_names(&self) -> &IndexSet<String> {
        &self.fields
    }

    pub fn has_fields(&self) -> bool {
        !self.fields.is_empty()
    }

    pub fn owns_field(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    /// Grupos efectivos: los declarados o, si no hay ninguno, el grupo por
    /// defecto.
    pub fn effective_groups(&self) -> Vec<String> {
        if self.validation_groups.is_empty() {
            vec![DEFAULT_VALIDATION_GROUP.to_string()]
        } else {
            self.validation_groups.iter().cloned().collect()
        }
    }

    /// `true` si los grupos efectivos son exactamente el grupo por defecto.
    pub fn uses_default_group_only(&self) -> bool {
        let groups = self.effective_groups();
        groups.len() == 1 && groups[0] == DEFAULT_VALIDATION_GROUP
    }
}
