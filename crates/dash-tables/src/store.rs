//! Table lookup and the in-memory table lifecycle.

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{FailureReason, TableError, TableResult};
use crate::graph::TableGraph;
use crate::model::{DataTable, TableOptions, unsaved_id};
use crate::naming::duplicated_name;
use crate::operator::{Operator, TransformOptions};
use crate::state::{TableState, is_valid_transition};

/// Read access to already loaded tables.
pub trait TableStore {
    /// Table with this id.
    fn get(&self, data_table_id: &str) -> Option<&DataTable>;

    /// Every table.
    fn list(&self) -> Vec<&DataTable>;
}

impl TableStore for [DataTable] {
    fn get(&self, data_table_id: &str) -> Option<&DataTable> {
        self.iter().find(|t| t.data_table_id == data_table_id)
    }

    fn list(&self) -> Vec<&DataTable> {
        self.iter().collect()
    }
}

impl TableStore for Vec<DataTable> {
    fn get(&self, data_table_id: &str) -> Option<&DataTable> {
        TableStore::get(self.as_slice(), data_table_id)
    }

    fn list(&self) -> Vec<&DataTable> {
        TableStore::list(self.as_slice())
    }
}

impl TableStore for IndexMap<String, DataTable> {
    fn get(&self, data_table_id: &str) -> Option<&DataTable> {
        IndexMap::get(self, data_table_id)
    }

    fn list(&self) -> Vec<&DataTable> {
        self.values().collect()
    }
}

/// In-memory tables with save, edit, cascade and removal.
#[derive(Debug, Clone, Default)]
pub struct DataTableStore {
    tables: IndexMap<String, DataTable>,
}

impl DataTableStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load tables as they are, keeping their states.
    ///
    /// # Errors
    ///
    /// `DuplicateTable` when two tables share an id.
    pub fn from_tables<I>(tables: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = DataTable>,
    {
        let mut store = Self::new();
        for table in tables {
            store.insert(table)?;
        }
        debug!(tables = store.len(), "data table store loaded");
        Ok(store)
    }

    /// Add a table.
    ///
    /// # Errors
    ///
    /// `DuplicateTable` when the id is taken.
    pub fn insert(&mut self, table: DataTable) -> TableResult<()> {
        if self.tables.contains_key(&table.data_table_id) {
            return Err(TableError::DuplicateTable(table.data_table_id));
        }
        self.tables.insert(table.data_table_id.clone(), table);
        Ok(())
    }

    /// Add an unsaved DRAFT transform with empty parameters for `operator`.
    pub fn create_unsaved(&mut self, operator: Operator) -> &DataTable {
        let name = duplicated_name(
            &format!("{operator} Data"),
            self.tables.values().map(|t| t.name.as_str()),
        );
        let table = DataTable::transformed(unsaved_id(), name, TransformOptions::default_for(operator));
        let (index, _) = self.tables.insert_full(table.data_table_id.clone(), table);
        &self.tables[index]
    }

    /// Number of tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Tables in load order.
    pub fn iter(&self) -> impl Iterator<Item = &DataTable> {
        self.tables.values()
    }

    /// Dependency graph of the current tables.
    #[must_use]
    pub fn graph(&self) -> TableGraph {
        TableGraph::build(self.tables.values())
    }

    fn table(&self, id: &str) -> TableResult<&DataTable> {
        self.tables.get(id).ok_or_else(|| TableError::unknown(id))
    }

    fn table_mut(&mut self, id: &str) -> TableResult<&mut DataTable> {
        self.tables.get_mut(id).ok_or_else(|| TableError::unknown(id))
    }

    /// Why `id` cannot become ACTIVE right now, if anything.
    ///
    /// # Errors
    ///
    /// `UnknownTable` when the table is absent.
    pub fn check(&self, id: &str) -> TableResult<Option<FailureReason>> {
        let table = self.table(id)?;
        if let Err(reason) = table.check_params() {
            return Ok(Some(reason));
        }

        let graph = self.graph();
        for upstream_id in table.upstream_ids() {
            if graph.reaches(upstream_id, id) {
                return Ok(Some(FailureReason::cycle(id, upstream_id)));
            }
            let Some(upstream) = self.tables.get(upstream_id) else {
                return Ok(Some(FailureReason::missing_upstream(id, upstream_id)));
            };
            if upstream.state != TableState::Active {
                return Ok(Some(FailureReason::InactiveUpstream {
                    table_id: id.to_string(),
                    upstream_id: upstream_id.to_string(),
                    state: upstream.state,
                }));
            }
        }
        Ok(None)
    }

    /// Save a table: DRAFT (or a settled state) to VALIDATING, then ACTIVE or FAILED.
    ///
    /// A failed validation is not an error; the reason is stored on the
    /// table and the returned state is FAILED.
    ///
    /// # Errors
    ///
    /// `UnknownTable`, or `InvalidStateTransition` when the table is
    /// already validating.
    pub fn save(&mut self, id: &str) -> TableResult<TableState> {
        let state = self.table(id)?.state;
        if !is_valid_transition(state, TableState::Validating) {
            return Err(TableError::invalid_transition(state, TableState::Validating));
        }
        self.table_mut(id)?.transition_to(TableState::Validating)?;

        let failure = self.check(id)?;
        let table = self.table_mut(id)?;
        match failure {
            None => table.transition_to(TableState::Active)?,
            Some(reason) => {
                info!(data_table_id = %id, reason = %reason, "data table failed validation");
                table.fail(reason)?;
            }
        }
        Ok(table.state)
    }

    /// Replace the options of `id` and return it to DRAFT.
    ///
    /// Every new upstream reference is checked first: if the table is
    /// reachable from a candidate, the edit is rejected with
    /// `CycleDetected` naming that candidate and nothing changes.
    ///
    /// # Errors
    ///
    /// `UnknownTable`, `Rejected(CycleDetected)`, or
    /// `InvalidStateTransition` while the table is validating.
    pub fn update_options(&mut self, id: &str, options: TableOptions) -> TableResult<()> {
        let state = self.table(id)?.state;

        let graph = self.graph();
        for candidate in options.upstream_ids() {
            if graph.reaches(candidate, id) {
                debug!(data_table_id = %id, upstream_id = %candidate, "rejected cyclic upstream");
                return Err(FailureReason::cycle(id, candidate).into());
            }
        }

        if state != TableState::Draft && !is_valid_transition(state, TableState::Draft) {
            return Err(TableError::invalid_transition(state, TableState::Draft));
        }

        let table = self.table_mut(id)?;
        table.set_options(options);
        if state != TableState::Draft {
            table.transition_to(TableState::Draft)?;
        }
        Ok(())
    }

    /// Save again every saved table downstream of `id`, upstreams first.
    ///
    /// DRAFT descendants are left for their author to save.
    ///
    /// # Errors
    ///
    /// `UnknownTable` when `id` is absent.
    pub fn cascade_revalidate(&mut self, id: &str) -> TableResult<Vec<(String, TableState)>> {
        self.table(id)?;
        let descendants = self.graph().descendants(id);
        self.revalidate(descendants)
    }

    fn revalidate(&mut self, ids: Vec<String>) -> TableResult<Vec<(String, TableState)>> {
        let mut results = Vec::new();
        for descendant in ids {
            let settled = self.tables.get(&descendant).is_some_and(|t| t.state.is_settled());
            if settled {
                let state = self.save(&descendant)?;
                results.push((descendant, state));
            }
        }
        Ok(results)
    }

    /// Remove `id` and save its saved descendants again.
    ///
    /// Direct dependents fail with `MissingUpstream`.
    ///
    /// # Errors
    ///
    /// `UnknownTable` when `id` is absent.
    pub fn remove(&mut self, id: &str) -> TableResult<DataTable> {
        let descendants = self.graph().descendants(id);
        let removed = self
            .tables
            .shift_remove(id)
            .ok_or_else(|| TableError::unknown(id))?;
        info!(data_table_id = %id, dependents = descendants.len(), "data table removed");
        self.revalidate(descendants)?;
        Ok(removed)
    }

    /// Save every table in execution order.
    ///
    /// # Errors
    ///
    /// `CycleDetected` when the tables cannot be ordered.
    pub fn save_all(&mut self) -> TableResult<Vec<(String, TableState)>> {
        let order = self.graph().execution_order()?;
        let mut results = Vec::with_capacity(order.len());
        for id in order {
            let state = self.save(&id)?;
            results.push((id, state));
        }
        Ok(results)
    }
}

impl TableStore for DataTableStore {
    fn get(&self, data_table_id: &str) -> Option<&DataTable> {
        self.tables.get(data_table_id)
    }

    fn list(&self) -> Vec<&DataTable> {
        self.tables.values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddOptions, DataSource};
    use crate::operator::{JoinOptions, QueryCondition, QueryOptions};

    fn added(id: &str) -> DataTable {
        DataTable::added(
            id,
            id,
            AddOptions::new(DataSource::Cost {
                data_source_id: "ds-1".into(),
                data_key: "cost".into(),
            }),
        )
    }

    fn query_options(upstream: &str) -> TransformOptions {
        TransformOptions::Query(QueryOptions {
            data_table_id: Some(upstream.into()),
            conditions: vec![QueryCondition {
                value: "cost > 0".into(),
            }],
            ..QueryOptions::default()
        })
    }

    fn query(id: &str, upstream: &str) -> DataTable {
        DataTable::transformed(id, id, query_options(upstream))
    }

    fn join(id: &str, left: &str, right: &str) -> DataTable {
        DataTable::transformed(
            id,
            id,
            TransformOptions::Join(JoinOptions {
                data_tables: vec![left.into(), right.into()],
                ..JoinOptions::default()
            }),
        )
    }

    fn chain() -> DataTableStore {
        let mut store =
            DataTableStore::from_tables([added("T1"), query("T2", "T1"), query("T3", "T2")]).unwrap();
        store.save_all().unwrap();
        store
    }

    #[test]
    fn test_duplicate_insert() {
        let err = DataTableStore::from_tables([added("T1"), added("T1")]).unwrap_err();
        assert_eq!(err, TableError::DuplicateTable("T1".into()));
    }

    #[test]
    fn test_save_activates_valid_chain() {
        let store = chain();
        assert!(store.iter().all(|t| t.state == TableState::Active));
    }

    #[test]
    fn test_save_fails_on_inactive_upstream() {
        let mut store = DataTableStore::from_tables([added("T1"), query("T2", "T1")]).unwrap();
        assert_eq!(store.save("T2").unwrap(), TableState::Failed);
        assert!(matches!(
            store.get("T2").unwrap().failure,
            Some(FailureReason::InactiveUpstream {
                state: TableState::Draft,
                ..
            })
        ));
    }

    #[test]
    fn test_save_fails_on_missing_upstream() {
        let mut store = DataTableStore::from_tables([added("T1"), join("T3", "T1", "T2")]).unwrap();
        store.save("T1").unwrap();
        assert_eq!(store.save("T3").unwrap(), TableState::Failed);
        assert_eq!(
            store.get("T3").unwrap().failure,
            Some(FailureReason::missing_upstream("T3", "T2"))
        );
    }

    #[test]
    fn test_save_fails_on_invalid_params() {
        let mut store = DataTableStore::new();
        let id = store.create_unsaved(Operator::Pivot).data_table_id.clone();
        assert_eq!(store.save(&id).unwrap(), TableState::Failed);
        assert!(matches!(
            store.get(&id).unwrap().failure,
            Some(FailureReason::InvalidOperatorParams { .. })
        ));
    }

    #[test]
    fn test_unknown_table() {
        let mut store = DataTableStore::new();
        assert_eq!(store.save("T1").unwrap_err(), TableError::unknown("T1"));
    }

    #[test]
    fn test_update_rejects_cycle_and_leaves_table_unchanged() {
        let mut store = chain();
        let before = store.get("T1").unwrap().clone();

        let err = store
            .update_options("T1", query_options("T3").into())
            .unwrap_err();
        assert_eq!(err.reason(), Some(&FailureReason::cycle("T1", "T3")));
        assert_eq!(store.get("T1").unwrap(), &before);
    }

    #[test]
    fn test_update_rejects_self_reference() {
        let mut store = chain();
        let err = store.update_options("T2", query_options("T2").into()).unwrap_err();
        assert_eq!(err.reason(), Some(&FailureReason::cycle("T2", "T2")));
        assert_eq!(store.get("T2").unwrap().state, TableState::Active);
    }

    #[test]
    fn test_update_returns_to_draft() {
        let mut store = DataTableStore::from_tables([added("T1"), added("T4"), query("T2", "T1")]).unwrap();
        store.save_all().unwrap();

        store.update_options("T2", query_options("T4").into()).unwrap();
        let table = store.get("T2").unwrap();
        assert_eq!(table.state, TableState::Draft);
        assert_eq!(table.upstream_ids(), vec!["T4"]);

        assert_eq!(store.save("T2").unwrap(), TableState::Active);
    }

    #[test]
    fn test_cascade_revalidate_after_upstream_failure() {
        let mut store = chain();
        store
            .update_options("T1", AddOptions::new(DataSource::Asset { metric_id: String::new() }).into())
            .unwrap();
        assert_eq!(store.save("T1").unwrap(), TableState::Failed);

        let results = store.cascade_revalidate("T1").unwrap();
        assert_eq!(
            results,
            vec![
                ("T2".to_string(), TableState::Failed),
                ("T3".to_string(), TableState::Failed)
            ]
        );
    }

    #[test]
    fn test_cascade_skips_drafts() {
        let mut store = DataTableStore::from_tables([added("T1"), query("T2", "T1")]).unwrap();
        store.save("T1").unwrap();
        assert!(store.cascade_revalidate("T1").unwrap().is_empty());
        assert_eq!(store.get("T2").unwrap().state, TableState::Draft);
    }

    #[test]
    fn test_remove_fails_dependents() {
        let mut store = chain();
        let removed = store.remove("T1").unwrap();
        assert_eq!(removed.data_table_id, "T1");
        assert_eq!(
            store.get("T2").unwrap().failure,
            Some(FailureReason::missing_upstream("T2", "T1"))
        );
        assert_eq!(store.get("T3").unwrap().state, TableState::Failed);
        assert!(store.remove("T1").is_err());
    }

    #[test]
    fn test_create_unsaved_names_are_unique() {
        let mut store = DataTableStore::new();
        let first = store.create_unsaved(Operator::Join).name.clone();
        let second = store.create_unsaved(Operator::Join).clone();
        assert_eq!(first, "JOIN Data");
        assert_eq!(second.name, "JOIN Data (2)");
        assert!(second.is_unsaved());
        assert_eq!(second.operator, Some(Operator::Join));
        assert_eq!(second.state, TableState::Draft);
    }
}
