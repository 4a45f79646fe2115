//! Command implementations.
//!
//! Each command takes the shared [`Engine`] and writes its report through an
//! [`OutputFormat`](crate::output::OutputFormat).

mod migrate;
mod tables;
mod validate;
mod widgets;

use std::sync::Arc;

use dash_fields::{FieldSchemaRegistry, ValidatorRegistry};
use dash_widgets::{FieldValueManager, ManagerConfig, RegistryResult, WidgetConfigRegistry};

pub use migrate::MigrateCommand;
pub use tables::TablesCommand;
pub use validate::ValidateCommand;
pub use widgets::WidgetsCommand;

/// Registries and manager shared by every command.
#[derive(Debug)]
pub struct Engine {
    registry: WidgetConfigRegistry,
    manager: FieldValueManager,
}

impl Engine {
    /// Build the built-in registries with the given manager settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in widget config cannot be registered.
    pub fn new(config: ManagerConfig) -> RegistryResult<Self> {
        let registry = WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new()))?;
        let manager = FieldValueManager::new(Arc::new(ValidatorRegistry::new()), config);
        Ok(Self { registry, manager })
    }

    /// Widget config registry.
    #[must_use]
    pub const fn registry(&self) -> &WidgetConfigRegistry {
        &self.registry
    }

    /// Field value manager.
    #[must_use]
    pub const fn manager(&self) -> &FieldValueManager {
        &self.manager
    }
}
