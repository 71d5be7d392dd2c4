//! wizardflow
//!
//! Crate de aplicación sobre `wizard-core` y `wizard-persistence`:
//! - `config`: configuración global (`CONFIG`) desde entorno / .env.
//! - `logging`: subscriber de `tracing` para el binario.
//! - `registration`: wizard de ejemplo que usa el demo.

pub mod config;
pub mod errors;
pub mod logging;
pub mod registration;

pub use config::{AppConfig, StoreBackend, CONFIG};
pub use errors::AppError;
pub use logging::init_logging;
