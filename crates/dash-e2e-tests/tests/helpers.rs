//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use dash_fields::{FieldSchemaRegistry, FieldValue, ValidatorRegistry, WidgetFieldValueMap};
use dash_tables::operator::{QueryCondition, QueryOptions};
use dash_tables::{AddOptions, DataSource, DataTable, DataTableStore, JoinOptions, TransformOptions};
use dash_widgets::{FieldValueManager, ManagerConfig, WidgetConfigRegistry};
use serde_json::json;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Route engine logs to the test writer, filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Registry of every built-in widget.
pub fn registry() -> WidgetConfigRegistry {
    init_tracing();
    WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap()
}

/// Manager with default settings.
pub fn manager() -> FieldValueManager {
    FieldValueManager::new(Arc::new(ValidatorRegistry::new()), ManagerConfig::default())
}

/// Complete line chart values.
pub fn line_chart_values() -> WidgetFieldValueMap {
    let mut values = WidgetFieldValueMap::new();
    values.insert(
        "granularity".into(),
        FieldValue::new().with_attribute("granularity", "MONTHLY"),
    );
    values.insert("xAxis".into(), FieldValue::new().with_data(json!(["Region"])));
    values.insert(
        "tableDataField".into(),
        FieldValue::new().with_data(json!(["cost"])).with_version("v1"),
    );
    values
}

/// An ADDED unified cost table.
pub fn added(id: &str) -> DataTable {
    DataTable::added(
        id,
        id,
        AddOptions::new(DataSource::UnifiedCost {
            data_key: "cost".into(),
        }),
    )
}

/// QUERY parameters reading from `upstream`.
pub fn query_options(upstream: &str) -> TransformOptions {
    TransformOptions::Query(QueryOptions {
        data_table_id: Some(upstream.into()),
        conditions: vec![QueryCondition {
            value: "cost > 0".into(),
        }],
        ..QueryOptions::default()
    })
}

/// A QUERY table reading from `upstream`.
pub fn query(id: &str, upstream: &str) -> DataTable {
    DataTable::transformed(id, id, query_options(upstream))
}

/// A JOIN table of `left` and `right`.
pub fn join(id: &str, left: &str, right: &str) -> DataTable {
    DataTable::transformed(
        id,
        id,
        TransformOptions::Join(JoinOptions {
            data_tables: vec![left.into(), right.into()],
            ..JoinOptions::default()
        }),
    )
}

/// T1, T2 (ADDED) joined into T3, every table saved.
pub fn join_store() -> DataTableStore {
    init_tracing();
    let mut store = DataTableStore::from_tables([join("T3", "T1", "T2"), added("T1"), added("T2")]).unwrap();
    store.save_all().unwrap();
    store
}
