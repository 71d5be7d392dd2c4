//! Inicialización de logging del binario.
//!
//! Las librerías del workspace emiten por la fachada `log`; el subscriber de
//! `tracing` instala también el puente `LogTracer`, así que esos registros
//! salen por el mismo formateador.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` tiene prioridad; si no está, se usa `fallback`.
pub fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    // Un segundo init (p.ej. en tests) no es error.
    let _ = tracing_subscriber::registry().with(filter)
                                          .with(tracing_subscriber::fmt::layer().with_target(true))
                                          .try_init();
}
