//! Benchmarks for dash-widgets.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use dash_fields::{FieldSchemaRegistry, FieldValue, ValidatorRegistry, WidgetFieldValueMap};
use dash_tables::{AddOptions, DataSource, DataTable};
use dash_widgets::{FieldValueManager, ManagerConfig, WidgetConfigRegistry, sanitize_field_values};
use serde_json::json;

fn benchmark_registry(c: &mut Criterion) {
    let fields = Arc::new(FieldSchemaRegistry::new());
    c.bench_function("register_builtin_widgets", |b| {
        b.iter(|| WidgetConfigRegistry::with_builtin(Arc::clone(&fields)).unwrap());
    });
}

fn benchmark_build(c: &mut Criterion) {
    let registry = WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap();
    let manager = FieldValueManager::new(Arc::new(ValidatorRegistry::new()), ManagerConfig::default());
    let widget = registry.get_widget_config("lineChart").unwrap();

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

    c.bench_function("build_line_chart_values", |b| {
        b.iter(|| manager.build_field_value_map(widget, black_box(&values)));
    });
}

fn benchmark_sanitize(c: &mut Criterion) {
    let registry = WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap();
    let widget = registry.get_widget_config("table").unwrap();
    let table = DataTable::added(
        "T1",
        "Cost",
        AddOptions::new(DataSource::UnifiedCost {
            data_key: "cost".into(),
        }),
    )
    .with_data_info((0..50).map(|i| format!("data{i}")))
    .with_labels_info((0..50).map(|i| format!("label{i}")));
    let config = ManagerConfig::default();

    c.bench_function("sanitize_table_widget", |b| {
        b.iter(|| sanitize_field_values(widget, black_box(&WidgetFieldValueMap::new()), Some(&table), &config));
    });
}

criterion_group!(benches, benchmark_registry, benchmark_build, benchmark_sanitize);

criterion_main!(benches);
