//! Shared context of the open dashboard.
//!
//! Widgets rendered on one dashboard read the dashboard id, its shared
//! options and its variable selections from a [`WidgetContextStore`]. The
//! store holds one dashboard at a time; resetting it on navigation is the
//! caller's job.
//!
//! # Example
//!
//! ```
//! use dash_context::{Dashboard, WidgetContextStore};
//!
//! let store = WidgetContextStore::new();
//! store.set_dashboard(Dashboard::new("D1", "Cost overview"));
//!
//! let getters = store.getters();
//! assert_eq!(getters.dashboard_id(), Some("D1"));
//!
//! store.clear();
//! assert!(!store.is_current(getters.generation()));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dashboard;
mod store;

pub use dashboard::{
    DEFAULT_REFRESH_INTERVAL, Dashboard, DashboardLayout, DashboardOptions, DashboardVars, DateRange,
    REFRESH_INTERVAL_OPTIONS,
};
pub use store::{ContextGetters, WidgetContextStore};
