//! Data tables as composable transform pipelines.
//!
//! An ADDED table loads rows from a backend source; a TRANSFORMED table
//! derives rows from upstream tables through one [`Operator`]. Upstream
//! references form a DAG rooted in ADDED tables:
//!
//! - [`resolve`] turns a table into the ordered [`Operation`]s that
//!   produce it;
//! - [`DataTableStore`] runs the save lifecycle ([`TableState`]), rejects
//!   edits that would close a cycle and re-validates dependents;
//! - [`TableGraph`] exposes references, execution order and descendants.
//!
//! # Example
//!
//! ```
//! use dash_tables::{
//!     AddOptions, DataSource, DataTable, DataTableStore, JoinOptions, TableState,
//!     TransformOptions, resolve,
//! };
//!
//! let source = |key: &str| AddOptions::new(DataSource::UnifiedCost { data_key: key.into() });
//! let mut store = DataTableStore::from_tables([
//!     DataTable::added("T1", "Cost", source("cost")),
//!     DataTable::added("T2", "Usage", source("usage")),
//!     DataTable::transformed(
//!         "T3",
//!         "Cost and usage",
//!         TransformOptions::Join(JoinOptions {
//!             data_tables: vec!["T1".into(), "T2".into()],
//!             ..JoinOptions::default()
//!         }),
//!     ),
//! ])?;
//!
//! store.save_all()?;
//! assert_eq!(store.save("T3")?, TableState::Active);
//!
//! let resolved = resolve("T3", &store)?;
//! assert_eq!(resolved.to_string(), "[load T1, load T2, join T1+T2]");
//! # Ok::<(), dash_tables::TableError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod graph;
mod model;
mod naming;
pub mod operator;
mod resolve;
mod state;
mod store;

pub use error::{FailureReason, TableError, TableResult};
pub use graph::{DataTableReference, TableGraph};
pub use model::{
    AddOptions, DataSource, DataTable, DataType, SourceType, TableOptions, UNSAVED_PREFIX,
    unsaved_id,
};
pub use naming::{duplicated_name, is_field_name_valid, normalized_options, options_changed};
pub use operator::{JoinOptions, Operator, TransformOptions};
pub use resolve::{Operation, ResolvedTable, resolve};
pub use state::{TableState, is_valid_transition};
pub use store::{DataTableStore, TableStore};

#[cfg(test)]
mod tests;
