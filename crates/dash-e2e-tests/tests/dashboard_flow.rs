//! End-to-end tests for authoring widgets on an open dashboard.
//!
//! These tests verify:
//! 1. Widgets of the open dashboard are filled from their data table
//! 2. Publishing activates save-ready widgets
//! 3. Editing the data table deactivates its widgets until republished
//! 4. Navigation is visible through the context generation

mod helpers;

use dash_context::{Dashboard, DashboardLayout, WidgetContextStore};
use dash_fields::{FieldValue, WidgetFieldValueMap};
use dash_tables::{DataTable, DataTableStore, TableState, TableStore};
use dash_widgets::{
    InMemoryWidgetRepository, PublicWidgetModel, WidgetRepository, WidgetState, publish_widget,
    sanitize_field_values,
};
use helpers::*;
use serde_json::json;

fn cost_usage_store() -> DataTableStore {
    init_tracing();
    let joined: DataTable = join("T3", "T1", "T2")
        .with_data_info(["cost", "usage"])
        .with_labels_info(["Region", "Provider"]);
    let mut store = DataTableStore::from_tables([added("T1"), added("T2"), joined]).unwrap();
    store.save_all().unwrap();
    store
}

fn open_dashboard(context: &WidgetContextStore) {
    context.set_dashboard(
        Dashboard::new("D1", "Cost overview")
            .with_var("project", ["p-1"])
            .with_layout(DashboardLayout {
                widgets: vec!["W1".into(), "W2".into()],
                ..DashboardLayout::default()
            }),
    );
}

#[test]
fn test_author_publish_and_invalidate() {
    let tables = cost_usage_store();
    let table = tables.get("T3").unwrap();
    assert_eq!(table.state, TableState::Active);

    let context = WidgetContextStore::new();
    open_dashboard(&context);
    let getters = context.getters();
    let dashboard_id = getters.dashboard_id().unwrap();

    let repo = InMemoryWidgetRepository::new();
    repo.create(PublicWidgetModel::new("W1", dashboard_id, "pieChart").with_data_table("T3"))
        .unwrap();
    repo.create(PublicWidgetModel::new("W2", dashboard_id, "numberCard").with_data_table("T3"))
        .unwrap();

    // The board layout and the stored widgets agree.
    let layout: Vec<&str> = getters.dashboard().unwrap().widget_ids().collect();
    let stored: Vec<String> = repo.list(dashboard_id).into_iter().map(|w| w.widget_id).collect();
    assert_eq!(layout, stored);

    let registry = registry();
    let manager = manager();
    for widget in repo.list(dashboard_id) {
        let config = registry.get_widget_config(&widget.widget_type).unwrap();
        let values = sanitize_field_values(config, &WidgetFieldValueMap::new(), Some(table), manager.config());
        let outcome = publish_widget(&repo, &registry, &manager, &widget.widget_id, &values).unwrap();
        assert!(outcome.build.save_ready, "{}: {:?}", widget.widget_id, outcome.build.errors);
        assert_eq!(outcome.widget.state, WidgetState::Active);
    }
    assert_eq!(repo.get("W1").unwrap().options["dataField"].data, json!("cost"));

    // Editing the table deactivates every widget it feeds.
    let deactivated = repo.mark_data_table_updated("T3");
    assert_eq!(deactivated, vec!["W1".to_string(), "W2".to_string()]);
    assert_eq!(repo.get("W2").unwrap().state, WidgetState::Inactive);

    // Republishing the stored values brings the widget back.
    let stored = repo.get("W2").unwrap().options;
    let outcome = publish_widget(&repo, &registry, &manager, "W2", &stored).unwrap();
    assert_eq!(outcome.widget.state, WidgetState::Active);
}

#[test]
fn test_incomplete_widget_stays_inactive() {
    let context = WidgetContextStore::new();
    open_dashboard(&context);
    let getters = context.getters();

    let repo = InMemoryWidgetRepository::new();
    repo.create(PublicWidgetModel::new("W1", getters.dashboard_id().unwrap(), "lineChart"))
        .unwrap();

    let mut values = WidgetFieldValueMap::new();
    values.insert("xAxis".into(), FieldValue::new().with_data(json!(["Region"])));
    let outcome = publish_widget(&repo, &registry(), &manager(), "W1", &values).unwrap();

    assert!(!outcome.build.save_ready);
    assert_eq!(outcome.widget.state, WidgetState::Inactive);
    assert_eq!(outcome.build.blocking_errors().count(), 2);
    // Authoring can continue from what was stored.
    assert!(repo.get("W1").unwrap().options.contains_key("xAxis"));
}

#[test]
fn test_navigation_invalidates_snapshots() {
    let context = WidgetContextStore::new();
    open_dashboard(&context);
    let getters = context.getters();
    assert_eq!(getters.vars().unwrap()["project"], vec!["p-1".to_string()]);

    context.set_dashboard(Dashboard::new("D2", "Usage"));
    assert!(!context.is_current(getters.generation()));
    assert_eq!(getters.dashboard_id(), Some("D1"));
    assert_eq!(context.getters().dashboard_id(), Some("D2"));

    context.clear();
    assert!(context.getters().is_empty());
}
