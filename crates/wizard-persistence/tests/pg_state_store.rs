//! Paridad del backend Postgres con el store en memoria (requiere
//! DATABASE_URL; sin ella los tests se omiten).

use serde_json::json;
use uuid::Uuid;
use wizard_core::{InMemoryStateStore, MismatchStrategy, NavigationPolicy, StateStore, StepData, StepDefinition,
                  StepSchema, WizardFlow, WizardState};
use wizard_persistence::pg::{PgStateStore, PoolProvider};

mod test_support;
use test_support::with_pool;

fn schema(version: &str) -> StepSchema {
    StepSchema::builder("onboarding").version(version)
                                     .policy(NavigationPolicy::Linear)
                                     .on_mismatch(MismatchStrategy::Keep)
                                     .step(StepDefinition::new("account", "Account").fields(["email"]))
                                     .step(StepDefinition::new("profile", "Profile").fields(["name"]))
                                     .step(StepDefinition::new("confirm", "Confirm"))
                                     .build()
                                     .unwrap()
}

fn data(pairs: &[(&str, serde_json::Value)]) -> StepData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

#[test]
fn save_load_clear_roundtrip() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    with_pool(|pool| {
        let mut store = PgStateStore::with_new_session(PoolProvider { pool: pool.clone() });
        assert!(store.load("onboarding").unwrap().is_none());

        let mut state = WizardState::new("1");
        state.set_step_data("account", data(&[("email", json!("a@b.c"))]));
        state.mark_step_completed("account");
        state.set_current_step(1);
        store.save("onboarding", &state).unwrap();
        assert_eq!(store.load("onboarding").unwrap(), Some(state.clone()));

        // upsert: segundo save reemplaza
        state.set_current_step(2);
        store.save("onboarding", &state).unwrap();
        assert_eq!(store.load("onboarding").unwrap().unwrap().current_step(), 2);
        assert_eq!(store.list_rows().unwrap().len(), 1);

        store.clear("onboarding").unwrap();
        assert!(store.load("onboarding").unwrap().is_none());
        // borrar de nuevo no es error
        store.clear("onboarding").unwrap();
    });
}

#[test]
fn sessions_are_isolated() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    with_pool(|pool| {
        let mut a = PgStateStore::new(PoolProvider { pool: pool.clone() }, Uuid::new_v4());
        let b = PgStateStore::new(PoolProvider { pool: pool.clone() }, Uuid::new_v4());
        a.save("onboarding", &WizardState::new("1")).unwrap();
        assert!(b.load("onboarding").unwrap().is_none());
        assert_eq!(a.clear_session().unwrap(), 1);
    });
}

#[test]
fn flow_parity_with_memory_store() {
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skip (no DATABASE_URL)");
        return;
    }
    with_pool(|pool| {
        fn drive<S: StateStore>(flow: &mut WizardFlow<S>, schema: &StepSchema) -> WizardState {
            let mut state = flow.load_or_start(schema).unwrap();
            flow.save_step_data(schema, &mut state, &data(&[("email", json!("a@b.c")), ("x", json!(1))]))
                .unwrap();
            flow.mark_step_completed(schema, &mut state).unwrap();
            flow.next_step(schema, &mut state).unwrap();
            flow.load_or_start(schema).unwrap()
        }

        let v1 = schema("1");
        let mut mem = WizardFlow::new(InMemoryStateStore::new());
        let mut pg = WizardFlow::new(PgStateStore::with_new_session(PoolProvider { pool: pool.clone() }));
        assert_eq!(drive(&mut mem, &v1), drive(&mut pg, &v1));

        // desfase de versión con Keep: mismo resultado en ambos backends
        let v2 = schema("2");
        let from_mem = mem.load_or_start(&v2).unwrap();
        let from_pg = pg.load_or_start(&v2).unwrap();
        assert_eq!(from_mem, from_pg);
        assert_eq!(from_pg.current_step(), 0);
        assert_eq!(from_pg.step_value("account", "email"), Some(&json!("a@b.c")));

        let rows = pg.store().list_rows().unwrap();
        assert_eq!(rows[0].schema_version, "2");
        pg.store_mut().clear_session().unwrap();
    });
}
