//! Field schemas and field value validators for dashboard widgets.
//!
//! A *field* is one configurable input slot of a widget ("X-Axis",
//! "Legend", ...). This crate describes every field type once:
//!
//! - [`FieldSchemaRegistry`]: one [`FieldSchema`] per [`FieldType`], with
//!   typed option records ([`FieldOptions`]) that widget configs override;
//! - [`ValidatorRegistry`]: one validator per field type, answering whether a
//!   [`FieldValue`] is acceptable for a [`ResolvedFieldSchema`];
//! - [`default_value`] and [`suggest_value`]: static defaults and
//!   table-derived initial values.
//!
//! # Example
//!
//! ```
//! use dash_fields::{
//!     FieldSchemaMap, FieldSchemaRegistry, FieldValue, ResolvedFieldSchema, ValidationContext,
//!     ValidatorRegistry, WidgetFieldValueMap,
//! };
//! use serde_json::{json, Map};
//!
//! let fields = FieldSchemaRegistry::new();
//! let validators = ValidatorRegistry::new();
//!
//! let schema = fields.get_field_schema("xAxis")?;
//! let mut overrides = Map::new();
//! overrides.insert("max".into(), json!(15));
//! let options = schema.resolve_options(&overrides)?;
//! let x_axis = ResolvedFieldSchema::new("xAxis", schema.field_type().clone(), options, true);
//!
//! let all_fields = FieldSchemaMap::new();
//! let all_values = WidgetFieldValueMap::new();
//! let ctx = ValidationContext::new("lineChart", &all_fields, &all_values);
//!
//! let value = FieldValue::new().with_data("region").with_attribute("count", 20);
//! assert!(!validators.is_valid(&value, &x_axis, &ctx));
//! # Ok::<(), dash_fields::FieldSchemaError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
pub mod constants;
mod defaults;
mod error;
mod field_type;
pub mod options;
mod schema;
mod validators;
mod value;

pub use builder::ValidationBuilder;
pub use defaults::{default_attributes, default_value, suggest_value};
pub use error::{FieldError, FieldErrorReason, FieldResult, FieldSchemaError};
pub use field_type::{DataTarget, FieldType};
pub use options::{FieldOptions, MappingConstraints};
pub use schema::{FieldSchema, FieldSchemaMap, FieldSchemaRegistry, ResolvedFieldSchema};
pub use validators::{FieldValidator, ValidationContext, ValidationOutcome, ValidatorRegistry};
pub use value::{FieldValue, TableColumns, WidgetFieldValueMap};
