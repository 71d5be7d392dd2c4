use serde_json::{json, Value};
use wizard_core::{InMemoryStateStore, MismatchStrategy, StateStore, StepData, StepDefinition, StepSchema,
                  WizardFlow, WizardState};

fn data(pairs: &[(&str, Value)]) -> StepData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn v1() -> StepSchema {
    StepSchema::builder("profile").version("v1")
                                  .step(StepDefinition::new("S", "Personal").fields(["a", "b", "c"]))
                                  .step(StepDefinition::new("T", "Extra"))
                                  .build()
                                  .unwrap()
}

fn v2(strategy: MismatchStrategy) -> StepSchema {
    StepSchema::builder("profile").version("v2")
                                  .on_mismatch(strategy)
                                  .step(StepDefinition::new("S", "Personal").fields(["a", "b"]))
                                  .step(StepDefinition::new("T", "Extra"))
                                  .build()
                                  .unwrap()
}

/// Sesión en v1: datos en S, S completado, cursor en T.
fn seeded_store() -> InMemoryStateStore {
    let schema = v1();
    let mut flow = WizardFlow::new(InMemoryStateStore::new());
    let mut state = flow.start(&schema).unwrap();
    flow.save_step_data(&schema, &mut state, &data(&[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]))
        .unwrap();
    flow.mark_step_completed(&schema, &mut state).unwrap();
    assert!(flow.next_step(&schema, &mut state).unwrap());
    flow.into_store()
}

#[test]
fn keep_drops_removed_fields_and_progress() {
    let schema = v2(MismatchStrategy::Keep);
    let mut flow = WizardFlow::new(seeded_store());
    let state = flow.load_or_start(&schema).unwrap();

    assert_eq!(state.schema_version(), "v2");
    assert_eq!(state.current_step(), 0);
    assert_eq!(state.step_data("S"), Some(&data(&[("a", json!(1)), ("b", json!(2))])));
    assert_eq!(state.completed_count(), 0);
    assert!(state.all_errors().is_empty());

    // el state migrado quedó persistido
    assert_eq!(flow.store().load("profile").unwrap(), Some(state.clone()));
    // y una segunda carga ya no migra nada
    assert_eq!(flow.load_or_start(&schema).unwrap(), state);
}

#[test]
fn reset_discards_and_starts_fresh() {
    let schema = v2(MismatchStrategy::Reset);
    let mut flow = WizardFlow::new(seeded_store());
    let state = flow.load_or_start(&schema).unwrap();
    assert_eq!(state, WizardState::new("v2"));
    assert_eq!(flow.store().load("profile").unwrap(), Some(state));
}

#[test]
fn migrate_adopts_custom_result() {
    let schema = StepSchema::builder("profile").version("v2")
                                               .on_mismatch(MismatchStrategy::Migrate)
                                               .step(StepDefinition::new("S", "Personal").fields(["a", "b"]))
                                               .step(StepDefinition::new("T", "Extra"))
                                               .migration(|old: &WizardState, schema: &StepSchema| {
                                                   let mut next = WizardState::new(schema.version());
                                                   let c = old.step_value("S", "c").cloned().unwrap_or(Value::Null);
                                                   next.set_step_data("S", [("b".to_string(), c)].into_iter().collect());
                                                   next.mark_step_completed("S");
                                                   next.set_current_step(1);
                                                   next
                                               })
                                               .build()
                                               .unwrap();
    let mut flow = WizardFlow::new(seeded_store());
    let state = flow.load_or_start(&schema).unwrap();
    assert_eq!(state.current_step(), 1);
    assert_eq!(state.step_value("S", "b"), Some(&json!(3)));
    assert!(state.is_step_completed("S"));
}

#[test]
fn migrate_without_migrator_behaves_like_keep() {
    let mut keep = WizardFlow::new(seeded_store());
    let mut migrate = WizardFlow::new(seeded_store());
    let a = keep.load_or_start(&v2(MismatchStrategy::Keep)).unwrap();
    let b = migrate.load_or_start(&v2(MismatchStrategy::Migrate)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn derived_versions_follow_layout_changes() {
    let a = StepSchema::builder("w").step(StepDefinition::new("S", "S").fields(["a", "b", "c"]))
                                    .build()
                                    .unwrap();
    let relabeled = StepSchema::builder("w").step(StepDefinition::new("S", "Other label").fields(["a", "b", "c"]))
                                            .build()
                                            .unwrap();
    let narrowed = StepSchema::builder("w").step(StepDefinition::new("S", "S").fields(["a", "b"]))
                                           .build()
                                           .unwrap();
    assert_eq!(a.version(), relabeled.version());
    assert_ne!(a.version(), narrowed.version());
    assert!(a.version().starts_with("auto:"));
}

#[test]
fn stale_cursor_in_blob_is_clamped_on_load() {
    let mut store = InMemoryStateStore::new();
    store.insert_raw("profile",
                     json!({
                         "schemaVersion": "v1",
                         "currentStep": -4,
                         "stepData": {},
                         "stepErrors": {"S": {}},
                         "completedSteps": []
                     }));
    let mut flow = WizardFlow::new(store);
    let state = flow.load_or_start(&v1()).unwrap();
    assert_eq!(state.current_step(), 0);
    assert!(!state.has_step_errors("S"));
}

#[test]
fn keep_drops_data_of_removed_steps() {
    let mut store = InMemoryStateStore::new();
    let mut old = WizardState::new("v1");
    old.set_step_data("legacy", data(&[("a", json!(1))]));
    old.set_step_data("S", data(&[("a", json!(2)), ("b", json!(3))]));
    store.save("profile", &old).unwrap();

    let schema = StepSchema::builder("profile").version("v2")
                                               .on_mismatch(MismatchStrategy::Keep)
                                               .step(StepDefinition::new("S", "Personal").fields(["a"]))
                                               .build()
                                               .unwrap();
    let mut flow = WizardFlow::new(store);
    let state = flow.load_or_start(&schema).unwrap();
    assert!(state.step_data("legacy").is_none());
    assert_eq!(state.step_data("S"), Some(&data(&[("a", json!(2))])));
}
