//! Resolución de desfase de versión entre un state persistido y el schema
//! vigente.

mod resolve;
mod strategy;

pub use resolve::{keep_compatible, resolve_version, Resolution};
pub use strategy::{MismatchStrategy, StateMigrator};
