//! `NavigationPolicy`: única puerta de autorización para saltos entre steps.
//!
//! Es una función pura de `(target, current, state, schema)` y debe evaluarse
//! en el servidor en cada intento de navegación.
//!
//! Precondiciones comunes a todas las políticas:
//! - `target` dentro de `[0, step_count)`.
//! - `target != current`.
//!
//! Reglas por política:
//! - `Free`: cualquier otro target en rango.
//! - `Sequential`: sólo movimientos adyacentes; avanzar exige que el step
//!   actual esté completado.
//! - `Linear` (default): retroceder siempre; avanzar exige el step actual
//!   completado y además que el target sea `current + 1` o un step ya
//!   completado.

use serde::{Deserialize, Serialize};

use crate::errors::WizardResult;
use crate::state::WizardState;
use crate::step::StepSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationPolicy {
    Free,
    Sequential,
    #[default]
    Linear,
}

impl NavigationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationPolicy::Free => "free",
            NavigationPolicy::Sequential => "sequential",
            NavigationPolicy::Linear => "linear",
        }
    }

    pub fn can_navigate(&self, target: usize, current: usize, state: &WizardState, schema: &StepSchema) -> bool {
        if !schema.contains_index(target) || target == current {
            return false;
        }
        if let NavigationPolicy::Free = self {
            return true;
        }

        let forward = target > current;
        if forward && !current_is_completed(current, state, schema) {
            return false;
        }

        match self {
            NavigationPolicy::Free => true,
            NavigationPolicy::Sequential => target.abs_diff(current) == 1,
            NavigationPolicy::Linear => {
                if !forward || target == current + 1 {
                    return true;
                }
                schema.step_name(target).map(|name| state.is_step_completed(name)).unwrap_or(false)
            }
        }
    }

    /// Variante por nombre. Un nombre inexistente es un error estructural.
    pub fn can_navigate_to_name(&self, target: &str, state: &WizardState, schema: &StepSchema) -> WizardResult<bool> {
        let index = schema.index_of(target)?;
        Ok(self.can_navigate(index, state.current_step(), state, schema))
    }

    /// Índices a los que la política autoriza saltar desde el step actual.
    /// Útil para pintar un indicador de pasos; la autorización real sigue
    /// siendo `can_navigate`.
    pub fn reachable_steps(&self, state: &WizardState, schema: &StepSchema) -> Vec<usize> {
        let current = state.current_step();
        (0..schema.step_count()).filter(|&t| self.can_navigate(t, current, state, schema)).collect()
    }
}

// Un cursor fuera de rango nunca cuenta como completado.
fn current_is_completed(current: usize, state: &WizardState, schema: &StepSchema) -> bool {
    schema.step_name(current).map(|name| state.is_step_completed(name)).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepDefinition;

    fn schema(policy: NavigationPolicy) -> StepSchema {
        StepSchema::builder("nav").version("1")
                                  .policy(policy)
                                  .steps(["s0", "s1", "s2", "s3"].into_iter().map(|n| StepDefinition::new(n, n)))
                                  .build()
                                  .unwrap()
    }

    fn state_at(current: usize, completed: &[&str]) -> WizardState {
        let mut state = WizardState::new("1");
        state.set_current_step(current);
        for c in completed {
            state.mark_step_completed(*c);
        }
        state
    }

    #[test]
    fn out_of_range_and_self_are_always_rejected() {
        for policy in [NavigationPolicy::Free, NavigationPolicy::Sequential, NavigationPolicy::Linear] {
            let schema = schema(policy);
            let state = state_at(1, &["s0", "s1", "s2", "s3"]);
            assert!(!policy.can_navigate(4, 1, &state, &schema));
            assert!(!policy.can_navigate(usize::MAX, 1, &state, &schema));
            assert!(!policy.can_navigate(1, 1, &state, &schema));
        }
    }

    #[test]
    fn free_ignores_completion() {
        let p = NavigationPolicy::Free;
        let schema = schema(p);
        let state = state_at(0, &[]);
        assert!(p.can_navigate(3, 0, &state, &schema));
        assert!(p.can_navigate(2, 0, &state, &schema));
        assert_eq!(p.reachable_steps(&state, &schema), vec![1, 2, 3]);
    }

    #[test]
    fn sequential_only_adjacent() {
        let p = NavigationPolicy::Sequential;
        let schema = schema(p);
        let not_done = state_at(1, &[]);
        assert!(!p.can_navigate(2, 1, &not_done, &schema));
        assert!(p.can_navigate(0, 1, &not_done, &schema));

        let done = state_at(1, &["s1", "s3"]);
        assert!(p.can_navigate(2, 1, &done, &schema));
        assert!(!p.can_navigate(3, 1, &done, &schema));
        let back_two = state_at(2, &[]);
        assert!(!p.can_navigate(0, 2, &back_two, &schema));
    }

    #[test]
    fn linear_rules() {
        let p = NavigationPolicy::Linear;
        let schema = schema(p);
        let state = state_at(2, &[]);
        assert!(p.can_navigate(0, 2, &state, &schema));
        assert!(p.can_navigate(1, 2, &state, &schema));
        assert!(!p.can_navigate(3, 2, &state, &schema));

        let state = state_at(0, &["s0", "s3"]);
        assert!(p.can_navigate(1, 0, &state, &schema));
        assert!(p.can_navigate(3, 0, &state, &schema));
        assert!(!p.can_navigate(2, 0, &state, &schema));

        // step destino completado pero el actual no: rechazado
        let state = state_at(0, &["s3"]);
        assert!(!p.can_navigate(3, 0, &state, &schema));
    }

    #[test]
    fn navigate_by_name() {
        let p = NavigationPolicy::Linear;
        let schema = schema(p);
        let state = state_at(2, &[]);
        assert_eq!(p.can_navigate_to_name("s0", &state, &schema), Ok(true));
        assert!(p.can_navigate_to_name("missing", &state, &schema).is_err());
    }

    #[test]
    fn policy_names_roundtrip_through_serde() {
        let v = serde_json::to_value(NavigationPolicy::Sequential).unwrap();
        assert_eq!(v, serde_json::json!("sequential"));
        assert_eq!(NavigationPolicy::Linear.as_str(), "linear");
    }
}
