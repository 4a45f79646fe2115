//! Resolution of a table into the operations that produce it.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{FailureReason, TableError, TableResult};
use crate::model::{AddOptions, DataTable, TableOptions};
use crate::operator::{Operator, TransformOptions};
use crate::store::TableStore;

/// One step of a resolved pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Load an ADDED table from its backend source.
    Load {
        /// Table id.
        data_table_id: String,
        /// Source parameters.
        options: AddOptions,
    },
    /// Apply an operator to already produced tables.
    Transform {
        /// Table id.
        data_table_id: String,
        /// Operator.
        operator: Operator,
        /// Upstream tables, in declared order.
        inputs: Vec<String>,
        /// Operator parameters.
        options: TransformOptions,
    },
}

impl Operation {
    /// Id of the table this step produces.
    #[must_use]
    pub fn data_table_id(&self) -> &str {
        match self {
            Self::Load { data_table_id, .. } | Self::Transform { data_table_id, .. } => {
                data_table_id.as_str()
            }
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { data_table_id, .. } => write!(f, "load {data_table_id}"),
            Self::Transform {
                operator, inputs, ..
            } => write!(f, "{} {}", operator.as_str().to_lowercase(), inputs.join("+")),
        }
    }
}

/// Ordered operations producing one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedTable {
    /// The requested table.
    pub data_table_id: String,
    /// Steps, every upstream before its dependents; each table appears once.
    pub operations: Vec<Operation>,
}

impl ResolvedTable {
    /// Ids of the ADDED tables the pipeline starts from.
    #[must_use]
    pub fn roots(&self) -> Vec<&str> {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Load { .. }))
            .map(Operation::data_table_id)
            .collect()
    }

    /// Table ids in execution order.
    #[must_use]
    pub fn table_ids(&self) -> Vec<&str> {
        self.operations.iter().map(Operation::data_table_id).collect()
    }
}

impl fmt::Display for ResolvedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.operations.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", steps.join(", "))
    }
}

struct Resolver<'a, S: ?Sized> {
    store: &'a S,
    operations: Vec<Operation>,
    visited: HashSet<&'a str>,
    visiting: HashSet<&'a str>,
}

/// A table whose upstreams are being produced.
struct Frame<'a> {
    table: &'a DataTable,
    upstream_ids: Vec<&'a str>,
    next: usize,
}

impl<'a, S: TableStore + ?Sized> Resolver<'a, S> {
    /// Depth-first from `target` on an explicit stack.
    fn run(&mut self, target: &'a DataTable) -> Result<(), FailureReason> {
        let mut stack = vec![self.enter(target)?];
        while let Some(frame) = stack.last_mut() {
            let table = frame.table;
            let Some(&upstream_id) = frame.upstream_ids.get(frame.next) else {
                if let Some(frame) = stack.pop() {
                    self.leave(frame);
                }
                continue;
            };
            frame.next += 1;

            let id = table.data_table_id.as_str();
            if self.visiting.contains(upstream_id) {
                return Err(FailureReason::cycle(id, upstream_id));
            }
            let upstream = self
                .store
                .get(upstream_id)
                .ok_or_else(|| FailureReason::missing_upstream(id, upstream_id))?;
            if !self.visited.contains(upstream_id) {
                stack.push(self.enter(upstream)?);
            }
        }
        Ok(())
    }

    fn enter(&mut self, table: &'a DataTable) -> Result<Frame<'a>, FailureReason> {
        table.check_params()?;
        self.visiting.insert(table.data_table_id.as_str());
        Ok(Frame {
            table,
            upstream_ids: table.upstream_ids(),
            next: 0,
        })
    }

    fn leave(&mut self, frame: Frame<'a>) {
        let id = frame.table.data_table_id.as_str();
        let operation = match &frame.table.options {
            TableOptions::Add(options) => Operation::Load {
                data_table_id: id.to_string(),
                options: options.clone(),
            },
            TableOptions::Transform(options) => Operation::Transform {
                data_table_id: id.to_string(),
                operator: options.operator(),
                inputs: frame.upstream_ids.iter().map(ToString::to_string).collect(),
                options: options.clone(),
            },
        };

        debug!(data_table_id = id, step = %operation, "resolved step");
        self.visiting.remove(id);
        self.visited.insert(id);
        self.operations.push(operation);
    }
}

/// Walk from `data_table_id` back to its ADDED roots.
///
/// Returns operations upstream first. A table shared by several dependents
/// is produced once.
///
/// # Errors
///
/// `UnknownTable` when the requested table is absent, otherwise a
/// rejection carrying `MissingUpstream`, `InvalidOperatorParams` or
/// `CycleDetected`.
pub fn resolve<S>(data_table_id: &str, store: &S) -> TableResult<ResolvedTable>
where
    S: TableStore + ?Sized,
{
    let target = store
        .get(data_table_id)
        .ok_or_else(|| TableError::unknown(data_table_id))?;

    let mut resolver = Resolver {
        store,
        operations: Vec::new(),
        visited: HashSet::new(),
        visiting: HashSet::new(),
    };
    resolver.run(target)?;

    Ok(ResolvedTable {
        data_table_id: data_table_id.to_string(),
        operations: resolver.operations,
    })
}
