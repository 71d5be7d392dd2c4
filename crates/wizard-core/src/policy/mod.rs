//! Políticas de navegación entre steps.

mod navigation;

pub use navigation::NavigationPolicy;
