//! Validador de referencia basado en reglas declarativas por grupo.
//!
//! No pretende cubrir un motor de validación completo; alcanza para demos y
//! tests del orquestador.

use indexmap::IndexMap;
use serde_json::Value;

use super::{Validator, Violation};
use crate::state::StepData;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// Presente, no nulo y (si es string) no vacío.
    Required,
    MinLength(usize),
    MaxLength(usize),
    OneOf(Vec<Value>),
}

impl FieldRule {
    fn check(&self, value: Option<&Value>) -> Option<String> {
        match self {
            FieldRule::Required => {
                let blank = match value {
                    None | Some(Value::Null) => true,
                    Some(Value::String(s)) => s.trim().is_empty(),
                    _ => false,
                };
                blank.then(|| "This value should not be blank.".to_string())
            }
            FieldRule::MinLength(min) => match value.and_then(Value::as_str) {
                Some(s) if s.chars().count() < *min => {
                    Some(format!("This value is too short. It should have {min} characters or more."))
                }
                _ => None,
            },
            FieldRule::MaxLength(max) => match value.and_then(Value::as_str) {
                Some(s) if s.chars().count() > *max => {
                    Some(format!("This value is too long. It should have {max} characters or less."))
                }
                _ => None,
            },
            FieldRule::OneOf(choices) => match value {
                Some(v) if !v.is_null() && !choices.contains(v) => {
                    Some("The value you selected is not a valid choice.".to_string())
                }
                _ => None,
            },
        }
    }
}

/// grupo -> campo -> reglas.
#[derive(Debug, Default, Clone)]
pub struct RuleSetValidator {
    groups: IndexMap<String, IndexMap<String, Vec<FieldRule>>>,
}

impl RuleSetValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, group: impl Into<String>, field: impl Into<String>, rule: FieldRule) -> Self {
        self.groups.entry(group.into()).or_default().entry(field.into()).or_default().push(rule);
        self
    }
}

impl Validator for RuleSetValidator {
    fn validate(&self, data: &StepData, _constraints: Option<&Value>, groups: &[String]) -> Vec<Violation> {
        let mut out = Vec::new();
        for group in groups {
            let Some(fields) = self.groups.get(group) else { continue };
            for (field, rules) in fields {
                for rule in rules {
                    if let Some(message) = rule.check(data.get(field)) {
                        out.push(Violation::new(format!("[{field}]"), message));
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(pairs: &[(&str, Value)]) -> StepData {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn only_requested_groups_run() {
        let v = RuleSetValidator::new().rule("account", "email", FieldRule::Required)
                                       .rule("profile", "name", FieldRule::Required);
        let out = v.validate(&data(&[]), None, &["account".to_string()]);
        assert_eq!(out, vec![Violation::new("[email]", "This value should not be blank.")]);
    }

    #[test]
    fn length_and_choice_rules() {
        let v = RuleSetValidator::new().rule("g", "pw", FieldRule::MinLength(8))
                                       .rule("g", "nick", FieldRule::MaxLength(3))
                                       .rule("g", "plan", FieldRule::OneOf(vec![json!("free"), json!("pro")]));
        let groups = vec!["g".to_string()];
        let ok = data(&[("pw", json!("longenough")), ("nick", json!("abc")), ("plan", json!("pro"))]);
        assert!(v.validate(&ok, None, &groups).is_empty());

        let bad = data(&[("pw", json!("short")), ("nick", json!("abcd")), ("plan", json!("gold"))]);
        let fields: Vec<String> = v.validate(&bad, None, &groups).iter().map(Violation::field).collect();
        assert_eq!(fields, vec!["pw", "nick", "plan"]);
    }

    #[test]
    fn blank_strings_fail_required() {
        let v = RuleSetValidator::new().rule("g", "name", FieldRule::Required);
        assert_eq!(v.validate(&data(&[("name", json!("  "))]), None, &["g".to_string()]).len(), 1);
        assert!(v.validate(&data(&[("name", json!(0))]), None, &["g".to_string()]).is_empty());
    }
}
