use serde_json::json;
use wizard_core::{FieldErrors, StepData, WizardState};

#[test]
fn persisted_layout_has_exactly_five_camel_case_fields() {
    let mut state = WizardState::new("v3");
    state.set_current_step(2);
    let data: StepData = [("email".to_string(), json!("a@b.c"))].into_iter().collect();
    state.set_step_data("account", data);
    let mut errs = FieldErrors::new();
    errs.insert("name".into(), vec!["This value should not be blank.".into()]);
    state.set_step_errors("profile", errs);
    state.mark_step_completed("account");

    let blob = state.to_json().unwrap();
    assert_eq!(blob,
               json!({
                   "schemaVersion": "v3",
                   "currentStep": 2,
                   "stepData": {"account": {"email": "a@b.c"}},
                   "stepErrors": {"profile": {"name": ["This value should not be blank."]}},
                   "completedSteps": ["account"]
               }));
    assert_eq!(WizardState::from_json(blob).unwrap(), state);
}

#[test]
fn missing_collections_default_to_empty() {
    let state = WizardState::from_json(json!({"schemaVersion": "1", "currentStep": 0})).unwrap();
    assert_eq!(state, WizardState::new("1"));
}

#[test]
fn duplicate_completed_entries_collapse() {
    let state = WizardState::from_json(json!({
                                           "schemaVersion": "1",
                                           "currentStep": 1,
                                           "completedSteps": ["a", "a", "b"]
                                       })).unwrap();
    assert_eq!(state.completed_count(), 2);
    assert_eq!(state.progress(4), 0.5);
}

#[test]
fn malformed_blob_is_a_serialization_error() {
    let err = WizardState::from_json(json!({"currentStep": "two"})).unwrap_err();
    assert_eq!(err.code(), "SERIALIZATION_ERROR");
}
