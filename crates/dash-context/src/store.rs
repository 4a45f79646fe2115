//! The widget context store.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::dashboard::{Dashboard, DashboardOptions, DashboardVars};

/// Shared state of the open dashboard.
///
/// Only [`set_dashboard`](Self::set_dashboard) and [`clear`](Self::clear)
/// write. Every write bumps the generation, so a reader holding an older
/// [`ContextGetters`] snapshot can tell that the user navigated away.
#[derive(Debug, Default)]
pub struct WidgetContextStore {
    dashboard: RwLock<Option<Arc<Dashboard>>>,
    generation: AtomicU64,
}

impl WidgetContextStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `dashboard` the open dashboard. Returns the new generation.
    pub fn set_dashboard(&self, dashboard: Dashboard) -> u64 {
        let mut slot = self.dashboard.write();
        let dashboard_id = dashboard.dashboard_id.clone();
        *slot = Some(Arc::new(dashboard));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(dashboard_id = %dashboard_id, generation, "dashboard context set");
        generation
    }

    /// Forget the open dashboard. Returns the new generation.
    pub fn clear(&self) -> u64 {
        let mut slot = self.dashboard.write();
        *slot = None;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        debug!(generation, "dashboard context cleared");
        generation
    }

    /// A consistent snapshot of the current context.
    #[must_use]
    pub fn getters(&self) -> ContextGetters {
        let slot = self.dashboard.read();
        ContextGetters {
            dashboard: slot.clone(),
            generation: self.generation.load(Ordering::Acquire),
        }
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Check if no write happened since `generation` was observed.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }
}

/// Read-only snapshot of the widget context.
#[derive(Debug, Clone, Default)]
pub struct ContextGetters {
    dashboard: Option<Arc<Dashboard>>,
    generation: u64,
}

impl ContextGetters {
    /// The open dashboard.
    #[must_use]
    pub fn dashboard(&self) -> Option<&Dashboard> {
        self.dashboard.as_deref()
    }

    /// Id of the open dashboard.
    #[must_use]
    pub fn dashboard_id(&self) -> Option<&str> {
        self.dashboard().map(|d| d.dashboard_id.as_str())
    }

    /// Options of the open dashboard.
    #[must_use]
    pub fn options(&self) -> Option<&DashboardOptions> {
        self.dashboard().map(|d| &d.options)
    }

    /// Variable selections of the open dashboard.
    #[must_use]
    pub fn vars(&self) -> Option<&DashboardVars> {
        self.dashboard().map(|d| &d.vars)
    }

    /// Generation the snapshot was taken at.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if no dashboard was open.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.dashboard.is_none()
    }
}
