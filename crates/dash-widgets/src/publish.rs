//! Publishing widget values through the widget persistence seam.

use chrono::Utc;
use dash_fields::WidgetFieldValueMap;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RegistryError, RegistryResult};
use crate::manager::{FieldValueBuild, FieldValueManager};
use crate::model::{PublicWidgetModel, WidgetState};
use crate::registry::WidgetConfigRegistry;

/// Widget persistence as seen by the engine.
pub trait WidgetRepository: Send + Sync {
    /// Load one widget.
    fn get(&self, widget_id: &str) -> Option<PublicWidgetModel>;

    /// Widgets of one dashboard.
    fn list(&self, dashboard_id: &str) -> Vec<PublicWidgetModel>;

    /// Store a new widget.
    ///
    /// # Errors
    ///
    /// `DuplicateWidgetId` when the id is taken.
    fn create(&self, widget: PublicWidgetModel) -> RegistryResult<()>;

    /// Replace a stored widget.
    ///
    /// # Errors
    ///
    /// `WidgetNotFound` when no widget has this id.
    fn update(&self, widget: PublicWidgetModel) -> RegistryResult<()>;
}

/// In-memory [`WidgetRepository`], ordered by creation.
#[derive(Debug, Default)]
pub struct InMemoryWidgetRepository {
    widgets: RwLock<IndexMap<String, PublicWidgetModel>>,
}

impl InMemoryWidgetRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.read().len()
    }

    /// Check if the repository is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.read().is_empty()
    }

    /// Deactivate every active widget fed by `data_table_id`.
    ///
    /// Returns the ids of the deactivated widgets.
    pub fn mark_data_table_updated(&self, data_table_id: &str) -> Vec<String> {
        let mut widgets = self.widgets.write();
        widgets
            .values_mut()
            .filter(|w| w.data_table_id.as_deref() == Some(data_table_id))
            .filter_map(|w| w.mark_data_table_updated().then(|| w.widget_id.clone()))
            .collect()
    }
}

impl WidgetRepository for InMemoryWidgetRepository {
    fn get(&self, widget_id: &str) -> Option<PublicWidgetModel> {
        self.widgets.read().get(widget_id).cloned()
    }

    fn list(&self, dashboard_id: &str) -> Vec<PublicWidgetModel> {
        self.widgets
            .read()
            .values()
            .filter(|w| w.dashboard_id == dashboard_id)
            .cloned()
            .collect()
    }

    fn create(&self, widget: PublicWidgetModel) -> RegistryResult<()> {
        let mut widgets = self.widgets.write();
        if widgets.contains_key(&widget.widget_id) {
            return Err(RegistryError::DuplicateWidgetId(widget.widget_id));
        }
        debug!(widget_id = %widget.widget_id, dashboard_id = %widget.dashboard_id, "created widget");
        widgets.insert(widget.widget_id.clone(), widget);
        Ok(())
    }

    fn update(&self, widget: PublicWidgetModel) -> RegistryResult<()> {
        let mut widgets = self.widgets.write();
        let slot = widgets
            .get_mut(&widget.widget_id)
            .ok_or_else(|| RegistryError::WidgetNotFound(widget.widget_id.clone()))?;
        *slot = widget;
        Ok(())
    }
}

/// Result of publishing a widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutcome {
    /// The widget as stored.
    pub widget: PublicWidgetModel,
    /// The value map build behind it.
    pub build: FieldValueBuild,
}

/// Build the value map of a stored widget from `values` and store it.
///
/// The widget becomes ACTIVE when the values are save-ready and INACTIVE
/// otherwise. Values are stored in both cases so authoring can continue.
///
/// # Errors
///
/// `WidgetNotFound`, `UnknownWidget` for an unregistered widget type, or
/// the repository's update error.
pub fn publish_widget<R>(
    repo: &R,
    registry: &WidgetConfigRegistry,
    manager: &FieldValueManager,
    widget_id: &str,
    values: &WidgetFieldValueMap,
) -> RegistryResult<PublishOutcome>
where
    R: WidgetRepository + ?Sized,
{
    let mut widget = repo
        .get(widget_id)
        .ok_or_else(|| RegistryError::WidgetNotFound(widget_id.to_string()))?;
    let config = registry.get_widget_config(&widget.widget_type)?;

    let build = manager.build_field_value_map(config, values);
    let state = if build.save_ready {
        WidgetState::Active
    } else {
        WidgetState::Inactive
    };
    widget.transition_to(state)?;
    widget.options = build.map.clone();
    widget.updated_at = Utc::now();
    repo.update(widget.clone())?;

    info!(
        widget_id,
        widget_type = %widget.widget_type,
        state = %widget.state,
        errors = build.errors.len(),
        "published widget"
    );
    Ok(PublishOutcome { widget, build })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ManagerConfig;
    use dash_fields::{FieldSchemaRegistry, FieldValue, ValidatorRegistry};
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (InMemoryWidgetRepository, WidgetConfigRegistry, FieldValueManager) {
        let registry = WidgetConfigRegistry::with_builtin(Arc::new(FieldSchemaRegistry::new())).unwrap();
        let manager = FieldValueManager::new(Arc::new(ValidatorRegistry::new()), ManagerConfig::default());
        let repo = InMemoryWidgetRepository::new();
        repo.create(PublicWidgetModel::new("W1", "D1", "numberCard").with_data_table("T1"))
            .unwrap();
        (repo, registry, manager)
    }

    #[test]
    fn test_publish_complete_widget_activates() {
        let (repo, registry, manager) = setup();
        let mut values = WidgetFieldValueMap::new();
        values.insert("dataField".into(), FieldValue::new().with_data("cost"));

        let outcome = publish_widget(&repo, &registry, &manager, "W1", &values).unwrap();
        assert_eq!(outcome.widget.state, WidgetState::Active);
        let stored = repo.get("W1").unwrap();
        assert_eq!(stored.state, WidgetState::Active);
        assert_eq!(stored.options["dataField"].data, json!("cost"));
        assert!(stored.options.contains_key("comparison"));
    }

    #[test]
    fn test_publish_incomplete_widget_is_inactive() {
        let (repo, registry, manager) = setup();
        let outcome =
            publish_widget(&repo, &registry, &manager, "W1", &WidgetFieldValueMap::new()).unwrap();
        assert_eq!(outcome.widget.state, WidgetState::Inactive);
        assert!(!outcome.build.save_ready);
        assert_eq!(repo.get("W1").unwrap().state, WidgetState::Inactive);
    }

    #[test]
    fn test_publish_missing_widget() {
        let (repo, registry, manager) = setup();
        let err = publish_widget(&repo, &registry, &manager, "W9", &WidgetFieldValueMap::new()).unwrap_err();
        assert!(matches!(err, RegistryError::WidgetNotFound(_)));
    }

    #[test]
    fn test_repository_ops() {
        let (repo, _, _) = setup();
        assert!(matches!(
            repo.create(PublicWidgetModel::new("W1", "D1", "gauge")),
            Err(RegistryError::DuplicateWidgetId(_))
        ));
        assert!(matches!(
            repo.update(PublicWidgetModel::new("W2", "D1", "gauge")),
            Err(RegistryError::WidgetNotFound(_))
        ));
        repo.create(PublicWidgetModel::new("W2", "D2", "gauge")).unwrap();
        assert_eq!(repo.list("D1").len(), 1);
        assert_eq!(repo.len(), 2);
    }

    #[test]
    fn test_data_table_update_deactivates_widgets() {
        let (repo, registry, manager) = setup();
        let mut values = WidgetFieldValueMap::new();
        values.insert("dataField".into(), FieldValue::new().with_data("cost"));
        publish_widget(&repo, &registry, &manager, "W1", &values).unwrap();

        assert_eq!(repo.mark_data_table_updated("T1"), vec!["W1".to_string()]);
        assert_eq!(repo.get("W1").unwrap().state, WidgetState::Inactive);
        assert!(repo.mark_data_table_updated("T1").is_empty());
    }
}
