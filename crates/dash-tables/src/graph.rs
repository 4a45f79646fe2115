//! Dependency graph between data tables.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{FailureReason, TableResult};
use crate::model::{DataTable, UNSAVED_PREFIX};

/// Parents and children of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DataTableReference {
    /// Table id.
    pub data_table_id: String,
    /// Upstream tables.
    pub parents: Vec<String>,
    /// Downstream tables.
    pub children: Vec<String>,
}

#[derive(Debug, Clone)]
struct Node {
    id: String,
    /// False for ids that are referenced but not loaded.
    known: bool,
    parents: Vec<usize>,
    children: Vec<usize>,
}

/// Arena of tables linked by upstream references.
///
/// Referenced ids with no table are kept as placeholder nodes so missing
/// upstreams stay visible.
#[derive(Debug, Clone, Default)]
pub struct TableGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl TableGraph {
    /// Build the graph of `tables`.
    pub fn build<'a, I>(tables: I) -> Self
    where
        I: IntoIterator<Item = &'a DataTable>,
    {
        let tables: Vec<&DataTable> = tables.into_iter().collect();
        let mut graph = Self::default();
        for table in &tables {
            let idx = graph.node(&table.data_table_id);
            graph.nodes[idx].known = true;
        }
        for table in &tables {
            let child = graph.node(&table.data_table_id);
            for upstream in table.upstream_ids() {
                let parent = graph.node(upstream);
                if !graph.nodes[child].parents.contains(&parent) {
                    graph.nodes[child].parents.push(parent);
                    graph.nodes[parent].children.push(child);
                }
            }
        }
        graph
    }

    fn node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.to_string(),
            known: false,
            parents: Vec::new(),
            children: Vec::new(),
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    fn ids(&self, indices: &[usize]) -> Vec<&str> {
        indices.iter().map(|&i| self.nodes[i].id.as_str()).collect()
    }

    /// Check if a table with this id was loaded.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.get(id).is_some_and(|&i| self.nodes[i].known)
    }

    /// Number of loaded tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.known).count()
    }

    /// Check if no table was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Upstream ids of `id`, in declared order.
    #[must_use]
    pub fn parents(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&i| self.ids(&self.nodes[i].parents))
            .unwrap_or_default()
    }

    /// Downstream ids of `id`.
    #[must_use]
    pub fn children(&self, id: &str) -> Vec<&str> {
        self.index
            .get(id)
            .map(|&i| self.ids(&self.nodes[i].children))
            .unwrap_or_default()
    }

    /// Parents and children of every table. Unsaved tables are left out.
    #[must_use]
    pub fn reference_map(&self) -> IndexMap<String, DataTableReference> {
        let saved = |i: &&usize| !self.nodes[**i].id.starts_with(UNSAVED_PREFIX);
        self.nodes
            .iter()
            .filter(|n| !n.id.starts_with(UNSAVED_PREFIX))
            .map(|n| {
                let reference = DataTableReference {
                    data_table_id: n.id.clone(),
                    parents: n.parents.iter().filter(saved).map(|&i| self.nodes[i].id.clone()).collect(),
                    children: n.children.iter().filter(saved).map(|&i| self.nodes[i].id.clone()).collect(),
                };
                (n.id.clone(), reference)
            })
            .collect()
    }

    /// Loaded tables ordered so every table follows its upstreams.
    ///
    /// Ties keep load order. Fails with `CycleDetected` when some tables
    /// can never be ordered.
    pub fn execution_order(&self) -> TableResult<Vec<String>> {
        let mut in_degree: Vec<usize> = self
            .nodes
            .iter()
            .map(|n| n.parents.iter().filter(|&&p| self.nodes[p].known).count())
            .collect();

        let mut queue: VecDeque<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(i, n)| n.known && in_degree[*i] == 0)
            .map(|(i, _)| i)
            .collect();

        let mut ordered = Vec::with_capacity(self.nodes.len());
        while let Some(idx) = queue.pop_front() {
            ordered.push(self.nodes[idx].id.clone());
            for &child in &self.nodes[idx].children {
                in_degree[child] -= 1;
                if in_degree[child] == 0 && self.nodes[child].known {
                    queue.push_back(child);
                }
            }
        }

        if ordered.len() < self.len() {
            self.check_acyclic()?;
        }
        Ok(ordered)
    }

    /// Every table downstream of `id`, upstreams before dependents.
    #[must_use]
    pub fn descendants(&self, id: &str) -> Vec<String> {
        let Some(&start) = self.index.get(id) else {
            return Vec::new();
        };
        let mut visited = HashSet::from([start]);
        let mut post_order = Vec::new();
        for &child in &self.nodes[start].children {
            self.collect_descendants(child, &mut visited, &mut post_order);
        }
        post_order
            .into_iter()
            .rev()
            .map(|i| self.nodes[i].id.clone())
            .collect()
    }

    fn collect_descendants(&self, node: usize, visited: &mut HashSet<usize>, post_order: &mut Vec<usize>) {
        if !visited.insert(node) {
            return;
        }
        // (node, next child)
        let mut stack = vec![(node, 0)];
        while let Some(frame) = stack.last_mut() {
            let (idx, next) = *frame;
            match self.nodes[idx].children.get(next) {
                Some(&child) => {
                    frame.1 += 1;
                    if visited.insert(child) {
                        stack.push((child, 0));
                    }
                }
                None => {
                    stack.pop();
                    post_order.push(idx);
                }
            }
        }
    }

    /// Check if following upstream references from `from` reaches `target`.
    ///
    /// A table reaches itself.
    #[must_use]
    pub fn reaches(&self, from: &str, target: &str) -> bool {
        if from == target {
            return true;
        }
        let (Some(&start), Some(&goal)) = (self.index.get(from), self.index.get(target)) else {
            return false;
        };
        let mut visited = HashSet::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            if idx == goal {
                return true;
            }
            if visited.insert(idx) {
                stack.extend(self.nodes[idx].parents.iter().copied());
            }
        }
        false
    }

    /// Fail with the first upstream reference that closes a cycle.
    pub fn check_acyclic(&self) -> Result<(), FailureReason> {
        let mut visited = HashSet::new();
        let mut visiting = HashSet::new();
        for idx in 0..self.nodes.len() {
            self.dfs_visit(idx, &mut visited, &mut visiting)?;
        }
        Ok(())
    }

    fn dfs_visit(
        &self,
        start: usize,
        visited: &mut HashSet<usize>,
        visiting: &mut HashSet<usize>,
    ) -> Result<(), FailureReason> {
        if visited.contains(&start) {
            return Ok(());
        }
        visiting.insert(start);
        // (node, next parent)
        let mut stack = vec![(start, 0)];
        while let Some(frame) = stack.last_mut() {
            let (node, next) = *frame;
            match self.nodes[node].parents.get(next) {
                Some(&parent) => {
                    frame.1 += 1;
                    if visiting.contains(&parent) {
                        return Err(FailureReason::cycle(&self.nodes[node].id, &self.nodes[parent].id));
                    }
                    if !visited.contains(&parent) {
                        visiting.insert(parent);
                        stack.push((parent, 0));
                    }
                }
                None => {
                    stack.pop();
                    visiting.remove(&node);
                    visited.insert(node);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AddOptions, DataSource};
    use crate::operator::{ConcatOptions, QueryCondition, QueryOptions, TransformOptions};

    fn added(id: &str) -> DataTable {
        DataTable::added(
            id,
            id,
            AddOptions::new(DataSource::UnifiedCost {
                data_key: "cost".into(),
            }),
        )
    }

    fn query(id: &str, upstream: &str) -> DataTable {
        DataTable::transformed(
            id,
            id,
            TransformOptions::Query(QueryOptions {
                data_table_id: Some(upstream.into()),
                conditions: vec![QueryCondition {
                    value: "cost > 0".into(),
                }],
                ..QueryOptions::default()
            }),
        )
    }

    fn concat(id: &str, a: &str, b: &str) -> DataTable {
        DataTable::transformed(
            id,
            id,
            TransformOptions::Concat(ConcatOptions {
                data_tables: vec![a.into(), b.into()],
            }),
        )
    }

    #[test]
    fn test_empty_graph() {
        let graph = TableGraph::build(&Vec::<DataTable>::new());
        assert!(graph.is_empty());
        assert!(graph.execution_order().unwrap().is_empty());
        assert!(graph.check_acyclic().is_ok());
    }

    #[test]
    fn test_execution_order_follows_upstreams() {
        let tables = vec![concat("T4", "T2", "T3"), query("T3", "T1"), added("T2"), added("T1")];
        let graph = TableGraph::build(&tables);
        let order = graph.execution_order().unwrap();
        let pos = |id: &str| order.iter().position(|o| o == id).unwrap();
        assert_eq!(order.len(), 4);
        assert!(pos("T1") < pos("T3"));
        assert!(pos("T2") < pos("T4"));
        assert!(pos("T3") < pos("T4"));
    }

    #[test]
    fn test_missing_upstream_is_placeholder() {
        let tables = vec![query("T2", "GONE")];
        let graph = TableGraph::build(&tables);
        assert!(!graph.contains("GONE"));
        assert_eq!(graph.parents("T2"), vec!["GONE"]);
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.execution_order().unwrap(), vec!["T2".to_string()]);
    }

    #[test]
    fn test_reference_map_skips_unsaved() {
        let tables = vec![added("T1"), query("UNSAVED-abc", "T1"), query("T2", "T1")];
        let map = TableGraph::build(&tables).reference_map();
        assert!(!map.contains_key("UNSAVED-abc"));
        assert_eq!(map["T1"].children, vec!["T2".to_string()]);
        assert_eq!(map["T2"].parents, vec!["T1".to_string()]);
    }

    #[test]
    fn test_descendants_in_topological_order() {
        let tables = vec![added("T1"), query("T2", "T1"), query("T3", "T2"), concat("T4", "T1", "T3")];
        let graph = TableGraph::build(&tables);
        assert_eq!(graph.descendants("T1"), vec!["T2", "T3", "T4"]);
        assert_eq!(graph.descendants("T3"), vec!["T4"]);
        assert!(graph.descendants("T4").is_empty());
        assert!(graph.descendants("NOPE").is_empty());
    }

    #[test]
    fn test_reaches() {
        let tables = vec![added("T1"), query("T2", "T1"), query("T3", "T2")];
        let graph = TableGraph::build(&tables);
        assert!(graph.reaches("T3", "T1"));
        assert!(!graph.reaches("T1", "T3"));
        assert!(graph.reaches("T2", "T2"));
    }

    #[test]
    fn test_cycle_detected() {
        let tables = vec![query("T1", "T3"), query("T2", "T1"), query("T3", "T2")];
        let graph = TableGraph::build(&tables);
        let err = graph.check_acyclic().unwrap_err();
        assert!(err.is_cycle());
        assert!(graph.execution_order().is_err());
    }

    #[test]
    fn test_long_chain_walks() {
        let mut tables = vec![added("T0")];
        tables.extend((1..=50_000).map(|i| query(&format!("T{i}"), &format!("T{}", i - 1))));
        let graph = TableGraph::build(&tables);

        assert!(graph.check_acyclic().is_ok());
        let descendants = graph.descendants("T0");
        assert_eq!(descendants.len(), 50_000);
        assert_eq!(descendants.first().map(String::as_str), Some("T1"));
        assert_eq!(descendants.last().map(String::as_str), Some("T50000"));
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let tables = vec![query("T1", "T1")];
        let err = TableGraph::build(&tables).check_acyclic().unwrap_err();
        assert_eq!(err, FailureReason::cycle("T1", "T1"));
    }
}
