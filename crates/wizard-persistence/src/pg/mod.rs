//! Implementación Postgres (Diesel) del `StateStore` del core.
//!
//! - Una fila por `(session_id, wizard_name)`; el `WizardState` completo va en
//!   `payload` (JSONB) con sus cinco campos camelCase.
//! - `save` es un upsert (last-write-wins, sin locking entre requests).
//! - `clear` borra la fila; borrar algo inexistente no es error.
//! - Errores transitorios se reintentan con un backoff corto.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::upsert::excluded;
use log::{debug, warn};
use serde_json::Value;
use uuid::Uuid;

use wizard_core::{StateStore, WizardResult, WizardState};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::wizard_states;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o simular fallos en tests sin acoplar el
/// store a r2d2.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError>;
}

/// Implementación concreta de `ConnectionProvider` respaldada por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<r2d2::PooledConnection<ConnectionManager<PgConnection>>, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila de `wizard_states` para lecturas.
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = wizard_states)]
pub struct StateRow {
    pub session_id: Uuid,
    pub wizard_name: String,
    pub schema_version: String,
    pub payload: Value,
    pub updated_at: DateTime<Utc>,
}

impl StateRow {
    pub fn into_state(self) -> Result<WizardState, PersistenceError> {
        WizardState::from_json(self.payload).map_err(|e| PersistenceError::Payload(e.to_string()))
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = wizard_states)]
struct NewStateRow<'a> {
    session_id: &'a Uuid,
    wizard_name: &'a str,
    schema_version: &'a str,
    payload: &'a Value,
    updated_at: DateTime<Utc>,
}

/// Determina si un error es transitorio (recomendado reintentar).
pub(crate) fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        // Algunos drivers reportan desconexiones como texto.
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("terminating connection due to administrator command")
            || m.contains("connection closed")
            || m.contains("connection refused")
            || m.contains("timeout")
        }
        _ => false,
    }
}

/// Retry con backoff lineal corto: hasta 3 reintentos (15ms, 30ms, 45ms).
pub(crate) fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms",
                      attempts + 1,
                      e,
                      delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// `StateStore` sobre Postgres, acotado a una sesión.
///
/// La sesión equivale al "session store" de una aplicación web: todos los
/// wizards de un mismo usuario comparten `session_id`.
pub struct PgStateStore<P: ConnectionProvider> {
    pub provider: P,
    session_id: Uuid,
}

impl<P: ConnectionProvider> PgStateStore<P> {
    pub fn new(provider: P, session_id: Uuid) -> Self {
        Self { provider, session_id }
    }

    /// Store sobre una sesión nueva (uuid v4).
    pub fn with_new_session(provider: P) -> Self {
        Self::new(provider, Uuid::new_v4())
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Filas de la sesión, ordenadas por nombre de wizard.
    pub fn list_rows(&self) -> Result<Vec<StateRow>, PersistenceError> {
        let session = self.session_id;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            wizard_states::table.filter(wizard_states::session_id.eq(session))
                                .order(wizard_states::wizard_name.asc())
                                .select(StateRow::as_select())
                                .load(&mut conn)
                                .map_err(PersistenceError::from)
        })
    }

    /// Borra todos los wizards de la sesión. Devuelve cuántas filas se borraron.
    pub fn clear_session(&mut self) -> Result<usize, PersistenceError> {
        let session = self.session_id;
        let deleted = with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(wizard_states::table.filter(wizard_states::session_id.eq(session))).execute(&mut conn)
                                                                                              .map_err(PersistenceError::from)
        })?;
        debug!("clear_session session={session} deleted={deleted}");
        Ok(deleted)
    }

    fn load_row(&self, wizard: &str) -> Result<Option<StateRow>, PersistenceError> {
        let session = self.session_id;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            wizard_states::table.filter(wizard_states::session_id.eq(session))
                                .filter(wizard_states::wizard_name.eq(wizard))
                                .select(StateRow::as_select())
                                .first(&mut conn)
                                .optional()
                                .map_err(PersistenceError::from)
        })
    }

    fn upsert(&self, wizard: &str, state: &WizardState) -> Result<(), PersistenceError> {
        let payload = serde_json::to_value(state)?;
        let session = self.session_id;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            let row = NewStateRow { session_id: &session,
                                    wizard_name: wizard,
                                    schema_version: state.schema_version(),
                                    payload: &payload,
                                    updated_at: Utc::now() };
            diesel::insert_into(wizard_states::table).values(&row)
                                                     .on_conflict((wizard_states::session_id,
                                                                   wizard_states::wizard_name))
                                                     .do_update()
                                                     .set((wizard_states::schema_version
                                                               .eq(excluded(wizard_states::schema_version)),
                                                           wizard_states::payload.eq(excluded(wizard_states::payload)),
                                                           wizard_states::updated_at
                                                               .eq(excluded(wizard_states::updated_at))))
                                                     .execute(&mut conn)
                                                     .map(|_| ())
                                                     .map_err(PersistenceError::from)
        })
    }

    fn delete(&self, wizard: &str) -> Result<usize, PersistenceError> {
        let session = self.session_id;
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            diesel::delete(wizard_states::table.filter(wizard_states::session_id.eq(session))
                                               .filter(wizard_states::wizard_name.eq(wizard)))
            .execute(&mut conn)
            .map_err(PersistenceError::from)
        })
    }
}

impl<P: ConnectionProvider> StateStore for PgStateStore<P> {
    fn load(&self, wizard: &str) -> WizardResult<Option<WizardState>> {
        debug!("load:start session={} wizard={wizard}", self.session_id);
        let state = match self.load_row(wizard)? {
            Some(row) => Some(row.into_state()?),
            None => None,
        };
        debug!("load:done session={} wizard={wizard} found={}",
               self.session_id,
               state.is_some());
        Ok(state)
    }

    fn save(&mut self, wizard: &str, state: &WizardState) -> WizardResult<()> {
        self.upsert(wizard, state)?;
        debug!("save session={} wizard={wizard} version={} step={}",
               self.session_id,
               state.schema_version(),
               state.current_step());
        Ok(())
    }

    fn clear(&mut self, wizard: &str) -> WizardResult<()> {
        let deleted = self.delete(wizard)?;
        debug!("clear session={} wizard={wizard} deleted={deleted}", self.session_id);
        Ok(())
    }
}

/// Construye un pool Postgres r2d2 a partir de URL y corre las migraciones
/// pendientes.
///
/// Tamaños en 0 se llevan a 1; si `min_size > max_size` se usa `max_size`.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let final_min = validated_min.min(validated_max);
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(final_min))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Helper de desarrollo: carga `.env`, lee configuración y construye un pool
/// ya migrado.
pub fn build_dev_pool_from_env() -> Result<PgPool, PersistenceError> {
    crate::config::init_dotenv();
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
