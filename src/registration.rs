//! Wizard de registro usado por el binario de demo.
//!
//! Cuatro steps con política `Linear`: cuenta, perfil, preferencias y
//! confirmación. Las reglas viven en grupos por step; preferencias y
//! confirmación sólo usan el grupo por defecto.

use serde_json::json;
use wizard_core::{FieldRule, MismatchStrategy, NavigationPolicy, RuleSetValidator, StepDefinition, StepSchema,
                  WizardResult};

pub const WIZARD_NAME: &str = "registration";
pub const SCHEMA_VERSION: &str = "2025-06";

pub fn registration_schema() -> WizardResult<StepSchema> {
    StepSchema::builder(WIZARD_NAME).version(SCHEMA_VERSION)
                                    .policy(NavigationPolicy::Linear)
                                    .on_mismatch(MismatchStrategy::Keep)
                                    .step(StepDefinition::new("account", "Account").fields(["email", "password"])
                                                                                   .groups(["account"]))
                                    .step(StepDefinition::new("profile", "Profile").fields(["name", "plan"])
                                                                                   .groups(["profile"]))
                                    .step(StepDefinition::new("preferences", "Preferences").fields(["newsletter"]))
                                    .step(StepDefinition::new("confirm", "Confirm").no_back())
                                    .build()
}

pub fn registration_validator() -> RuleSetValidator {
    RuleSetValidator::new().rule("account", "email", FieldRule::Required)
                           .rule("account", "password", FieldRule::Required)
                           .rule("account", "password", FieldRule::MinLength(8))
                           .rule("profile", "name", FieldRule::Required)
                           .rule("profile", "name", FieldRule::MaxLength(40))
                           .rule("profile", "plan", FieldRule::OneOf(vec![json!("free"), json!("pro")]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_valid() {
        let schema = registration_schema().unwrap();
        assert_eq!(schema.step_count(), 4);
        assert_eq!(schema.version(), SCHEMA_VERSION);
        assert!(!schema.step_at(3).unwrap().is_back_allowed());
    }
}
