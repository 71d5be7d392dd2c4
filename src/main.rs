//! Demo: recorre el wizard de registro como lo haría una serie de requests
//! HTTP. Cada "request" abre un `WizardCtx` nuevo; sólo el store sobrevive
//! entre ellas.

use log::{info, warn};
use serde_json::{json, Value};
use wizard_core::{InMemoryStateStore, RuleSetValidator, StateStore, StepData, SubmitOutcome, WizardFlow};
use wizard_persistence::{build_dev_pool_from_env, PgStateStore, PoolProvider};
use wizardflow::registration::{registration_schema, registration_validator};
use wizardflow::{init_logging, AppError, StoreBackend, CONFIG};

fn main() {
    init_logging(&CONFIG.log_level);
    for note in &CONFIG.notes {
        warn!("{note}");
    }
    info!("wizardflow-demo store={} session={}",
          CONFIG.store_backend.as_str(),
          CONFIG.session_id);

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    match CONFIG.store_backend {
        StoreBackend::Memory => drive(InMemoryStateStore::new()),
        StoreBackend::Postgres => {
            let pool = build_dev_pool_from_env()?;
            drive(PgStateStore::new(PoolProvider { pool }, CONFIG.session_id))
        }
    }
}

fn form(pairs: &[(&str, Value)]) -> StepData {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}

fn drive<S: StateStore>(store: S) -> Result<(), AppError> {
    let schema = registration_schema()?;
    let mut flow: WizardFlow<S, RuleSetValidator> = WizardFlow::with_validator(store, registration_validator());

    // Request 1: POST de cuenta con password corto.
    {
        let mut ctx = flow.open(&schema)?;
        let outcome = ctx.submit(&form(&[("email", json!("ada@example.org")), ("password", json!("short"))]))?;
        report("account (invalid)", &outcome);
    }

    // Request 2: intento de saltar a la confirmación sin completar nada.
    {
        let mut ctx = flow.open(&schema)?;
        let allowed = ctx.go_to_name("confirm")?;
        println!("jump to confirm from {:?}: allowed={allowed}", ctx.current()?.name());
    }

    // Request 3: cuenta válida.
    {
        let mut ctx = flow.open(&schema)?;
        let outcome = ctx.submit(&form(&[("email", json!("ada@example.org")),
                                         ("password", json!("correct horse")),
                                         ("_token", json!("ignored"))]))?;
        report("account", &outcome);
    }

    // Request 4: perfil, con los datos anidados bajo el nombre del step.
    {
        let mut ctx = flow.open(&schema)?;
        let outcome = ctx.submit(&form(&[("profile", json!({"name": "Ada Lovelace", "plan": "pro"}))]))?;
        report("profile", &outcome);
        println!("reachable from {}: {:?}", ctx.current()?.name(), ctx.reachable());
    }

    // Request 5: volver al perfil y regresar.
    {
        let mut ctx = flow.open(&schema)?;
        println!("back: {}", ctx.back()?);
        println!("forward to preferences: {}", ctx.go_to_name("preferences")?);
        let outcome = ctx.submit(&form(&[("newsletter", json!(true))]))?;
        report("preferences", &outcome);
    }

    // Request 6: confirmación final con validación global.
    {
        let mut ctx = flow.open(&schema)?;
        let merged = ctx.state().merged_data();
        let failing = ctx.validate_all(&merged)?;
        if !failing.is_empty() {
            println!("steps with errors: {:?}", failing.keys().collect::<Vec<_>>());
            return Ok(());
        }
        let outcome = ctx.submit(&StepData::new())?;
        report("confirm", &outcome);
        println!("back from confirm: {}", ctx.back()?);
        println!("complete: {} ({:.0}%)",
                 ctx.is_complete(),
                 ctx.state().progress(schema.step_count()) * 100.0);
        println!("merged data: {}", Value::Object(merged.into_iter().collect()));
    }

    flow.clear(&schema)?;
    info!("wizard {} cleared", schema.name());
    Ok(())
}

fn report(step: &str, outcome: &SubmitOutcome) {
    match outcome {
        SubmitOutcome::Invalid(errors) => {
            for (field, messages) in errors {
                println!("{step}: {field}: {}", messages.join("; "));
            }
        }
        SubmitOutcome::Advanced { to } => println!("{step}: ok -> step {to}"),
        SubmitOutcome::Finished => println!("{step}: ok, wizard finished"),
    }
}
