//! Engine module: orquestador del wizard y contexto por request.
//!
//! `WizardFlow` no guarda state entre llamadas: cada operación recibe el
//! state cargado por el llamador, lo muta y lo persiste de inmediato a
//! través del store. `WizardCtx` agrupa schema + state para una request.

pub mod core;
pub mod wizard_ctx;

pub use self::core::{SubmitOutcome, WizardFlow};
pub use wizard_ctx::WizardCtx;
