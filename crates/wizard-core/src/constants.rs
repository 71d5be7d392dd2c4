//! Constantes del core.

/// Grupo de validación usado cuando un step no declara grupos propios.
pub const DEFAULT_VALIDATION_GROUP: &str = "Default";

/// Prefijo de las versiones derivadas automáticamente del layout del schema.
/// Permite distinguir en logs una versión explícita de una calculada.
pub const DERIVED_VERSION_PREFIX: &str = "auto:";

/// Longitud (en hex) del hash truncado usado en versiones derivadas.
pub const DERIVED_VERSION_LEN: usize = 16;
