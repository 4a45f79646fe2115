//! Property-based tests with proptest.

use crate::operator::{QueryCondition, QueryOptions};
use crate::*;
use proptest::prelude::*;

fn added(id: &str) -> DataTable {
    DataTable::added(
        id,
        id,
        AddOptions::new(DataSource::UnifiedCost {
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

/// A random DAG: table `i` is ADDED or queries / joins tables with a lower index.
fn arb_dag() -> impl Strategy<Value = Vec<DataTable>> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec((any::<bool>(), any::<prop::sample::Index>(), any::<prop::sample::Index>()), n)
            .prop_map(|specs| {
                specs
                    .into_iter()
                    .enumerate()
                    .map(|(i, (binary, a, b))| {
                        let id = format!("T{i}");
                        if i == 0 {
                            return added(&id);
                        }
                        let left = format!("T{}", a.index(i));
                        let right = format!("T{}", b.index(i));
                        if binary && left != right {
                            DataTable::transformed(
                                &id,
                                &id,
                                TransformOptions::Join(JoinOptions {
                                    data_tables: vec![left, right],
                                    ..JoinOptions::default()
                                }),
                            )
                        } else if a.index(2) == 0 {
                            added(&id)
                        } else {
                            DataTable::transformed(&id, &id, query_options(&left))
                        }
                    })
                    .collect()
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    #[test]
    fn prop_resolve_orders_upstreams_first(tables in arb_dag(), pick in any::<prop::sample::Index>()) {
        let target = tables[pick.index(tables.len())].data_table_id.clone();
        let resolved = resolve(&target, tables.as_slice()).unwrap();
        let ids = resolved.table_ids();

        let mut seen = std::collections::HashSet::new();
        for op in &resolved.operations {
            if let Operation::Transform { inputs, .. } = op {
                for input in inputs {
                    prop_assert!(seen.contains(input.as_str()), "{} used before produced", input);
                }
            }
            prop_assert!(seen.insert(op.data_table_id()), "{} produced twice", op.data_table_id());
        }
        prop_assert_eq!(ids.last().copied(), Some(target.as_str()));
    }

    #[test]
    fn prop_resolve_is_idempotent(tables in arb_dag(), pick in any::<prop::sample::Index>()) {
        let target = &tables[pick.index(tables.len())].data_table_id;
        prop_assert_eq!(resolve(target, tables.as_slice()), resolve(target, tables.as_slice()));
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    #[test]
    fn prop_save_all_activates_valid_dag(tables in arb_dag()) {
        let mut store = DataTableStore::from_tables(tables).unwrap();
        for (id, state) in store.save_all().unwrap() {
            prop_assert_eq!(state, TableState::Active, "{} did not activate", id);
        }
    }

    #[test]
    fn prop_cycle_rejection_leaves_store_unchanged(
        tables in arb_dag(),
        edited in any::<prop::sample::Index>(),
        upstream in any::<prop::sample::Index>(),
    ) {
        let mut store = DataTableStore::from_tables(tables).unwrap();
        store.save_all().unwrap();

        let ids: Vec<String> = store.iter().map(|t| t.data_table_id.clone()).collect();
        let edited = ids[edited.index(ids.len())].clone();
        let candidate = ids[upstream.index(ids.len())].clone();
        let closes_cycle = store.graph().reaches(&candidate, &edited);

        let before: Vec<DataTable> = store.iter().cloned().collect();
        let result = store.update_options(&edited, query_options(&candidate).into());

        if closes_cycle {
            let err = result.unwrap_err();
            prop_assert_eq!(err.reason(), Some(&FailureReason::cycle(&edited, &candidate)));
            let after: Vec<DataTable> = store.iter().cloned().collect();
            prop_assert_eq!(before, after);
        } else {
            prop_assert!(result.is_ok());
            prop_assert!(store.graph().check_acyclic().is_ok());
        }
    }

    #[test]
    fn prop_execution_order_respects_references(tables in arb_dag()) {
        let graph = TableGraph::build(&tables);
        let order = graph.execution_order().unwrap();
        prop_assert_eq!(order.len(), tables.len());
        for table in &tables {
            let pos = order.iter().position(|id| id == &table.data_table_id).unwrap();
            for upstream in table.upstream_ids() {
                let up = order.iter().position(|id| id == upstream).unwrap();
                prop_assert!(up < pos);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Naming
    // -------------------------------------------------------------------------

    #[test]
    fn prop_duplicated_name_is_fresh(name in "[A-Za-z ]{1,12}", taken in 0usize..6) {
        let mut existing = vec![name.clone()];
        existing.extend((2..taken + 2).map(|n| format!("{} ({n})", name.trim_end())));
        let fresh = duplicated_name(&name, existing.iter().map(String::as_str));
        prop_assert!(!existing.contains(&fresh));
    }
}
