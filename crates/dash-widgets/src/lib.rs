//! Widget configs and widget field value management.
//!
//! A widget is declared once as a [`WidgetConfig`]: a set of required and
//! optional field keys, each bound to a field type of `dash_fields`.
//!
//! - [`WidgetConfigRegistry`] resolves every config against the field
//!   schema registry and rejects configs that cannot be resolved;
//! - [`FieldValueManager`] completes and validates the values an author
//!   supplied, collecting every failure;
//! - [`sanitize_field_values`] and [`migrate_legacy_options`] bring stored
//!   values in line with the current table and schema generation;
//! - [`publish_widget`] stores the result through a [`WidgetRepository`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use dash_fields::{FieldSchemaRegistry, FieldValue, ValidatorRegistry, WidgetFieldValueMap};
//! use dash_widgets::{FieldValueManager, ManagerConfig, WidgetConfigRegistry};
//! use serde_json::json;
//!
//! let registry = WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new()))?;
//! let manager = FieldValueManager::new(Arc::new(ValidatorRegistry::new()), ManagerConfig::default());
//!
//! let mut values = WidgetFieldValueMap::new();
//! values.insert("granularity".into(), FieldValue::new().with_attribute("granularity", "MONTHLY"));
//! values.insert("xAxis".into(), FieldValue::new().with_data(json!(["Region"])));
//! values.insert(
//!     "tableDataField".into(),
//!     FieldValue::new().with_data(json!(["cost"])).with_version("v1"),
//! );
//!
//! let build = manager.build_field_value_map(registry.get_widget_config("lineChart")?, &values);
//! assert!(build.save_ready);
//! assert_eq!(build.map["xAxis"].count(), Some(&json!(10)));
//! # Ok::<(), dash_widgets::RegistryError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builtin;
mod complex;
mod config;
mod error;
mod manager;
mod migrate;
mod model;
mod publish;
mod registry;
mod sanitize;

pub use builtin::{XY_CHARTS, builtin_widgets};
pub use complex::check_cross_fields;
pub use config::{FieldSchemaInstance, WidgetConfig, WidgetMeta, WidgetSize, integrate_fields_schema};
pub use error::{RegistryError, RegistryResult};
pub use manager::{DEFAULT_GROUP_BY_COUNT, FieldValueBuild, FieldValueManager, ManagerConfig};
pub use migrate::migrate_legacy_options;
pub use model::{PublicWidgetModel, WidgetState, is_valid_transition};
pub use publish::{InMemoryWidgetRepository, PublishOutcome, WidgetRepository, publish_widget};
pub use registry::{FieldOverrides, RegisteredWidget, WidgetConfigRegistry};
pub use sanitize::{WIDGET_HEADER_KEY, sanitize_field_values, table_columns};
