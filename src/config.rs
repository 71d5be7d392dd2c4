//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).
//!
//! Los valores inválidos no abortan: caen al default y quedan anotados en
//! `AppConfig::notes` para que el binario los reporte una vez inicializado el
//! logging.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;
use uuid::Uuid;

pub const STORE_VAR: &str = "WIZARDFLOW_STORE";
pub const SESSION_VAR: &str = "WIZARDFLOW_SESSION";
pub const LOG_VAR: &str = "WIZARDFLOW_LOG";

/// Backend de `StateStore` que usa el binario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Memory,
    Postgres,
}

impl StoreBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "postgres" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Postgres => "postgres",
        }
    }
}

/// Configuración global de la aplicación.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    /// Sesión web simulada; todos los wizards del demo la comparten.
    pub session_id: Uuid,
    /// Filtro para `tracing-subscriber` (sintaxis `EnvFilter`).
    pub log_level: String,
    /// Avisos sobre variables ignoradas.
    pub notes: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenv(); // ignora error si no existe .env
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de lookup
    /// (entorno real o mapa en tests).
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let mut notes = Vec::new();

        let store_backend = match lookup(STORE_VAR) {
            None => StoreBackend::default(),
            Some(raw) => StoreBackend::parse(&raw).unwrap_or_else(|| {
                             notes.push(format!("{STORE_VAR}={raw} no reconocido, usando memory"));
                             StoreBackend::default()
                         }),
        };

        let session_id = match lookup(SESSION_VAR) {
            None => Uuid::new_v4(),
            Some(raw) => Uuid::parse_str(raw.trim()).unwrap_or_else(|_| {
                             notes.push(format!("{SESSION_VAR}={raw} no es un UUID, generando sesión nueva"));
                             Uuid::new_v4()
                         }),
        };

        let log_level = lookup(LOG_VAR).filter(|v| !v.trim().is_empty())
                                       .unwrap_or_else(|| "info".to_string());

        Self { store_backend,
               session_id,
               log_level,
               notes }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.notes.is_empty());
    }

    #[test]
    fn reads_explicit_values() {
        let session = "6f1c3e4a-2b7d-4c1e-9a55-0d2f6e8b9c10";
        let cfg = AppConfig::from_lookup(lookup_from(&[(STORE_VAR, "Postgres"),
                                                       (SESSION_VAR, session),
                                                       (LOG_VAR, "wizard_core=debug")]));
        assert_eq!(cfg.store_backend, StoreBackend::Postgres);
        assert_eq!(cfg.session_id.to_string(), session);
        assert_eq!(cfg.log_level, "wizard_core=debug");
    }

    #[test]
    fn invalid_values_fall_back_with_notes() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(STORE_VAR, "redis"), (SESSION_VAR, "nope")]));
        assert_eq!(cfg.store_backend, StoreBackend::Memory);
        assert_eq!(cfg.notes.len(), 2);
    }
}
