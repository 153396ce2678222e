// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # SpendBoard Store
//!
//! State reconciliation for the SpendBoard dashboard.
//!
//! This crate provides:
//!
//! - **ViewModelStore**: The shared view model, written by the initial load,
//!   the push channel, and range filtering
//! - **Dashboard**: Mount/unmount lifecycle tying those writers together
//! - **EditBufferController**: Local edits and whole-buffer commits
//! - **SettingsStore**: User preferences with persistence
//!
//! ## Usage
//!
//! ```ignore
//! use spendboard_store::{Dashboard, SettingsStore};
//! use std::sync::Arc;
//!
//! let settings = SettingsStore::load_default().await?.get().await;
//! let client = settings.api_client(None)?;
//! let options = settings.dashboard_options(&client)?;
//!
//! let mut dashboard = Dashboard::mount(Arc::new(HttpBackend::new(client)), options);
//! let status = dashboard.loaded().await;
//!
//! // Subscribe to changes
//! let mut rx = dashboard.store().subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("View updated!");
//! }
//! dashboard.unmount().await;
//! ```

pub mod dashboard;
pub mod edit_buffer;
pub mod error;
pub mod estimator;
pub mod loader;
pub mod persistence;
pub mod push_channel;
pub mod range_filter;
pub mod settings_store;
pub mod view_model;

pub use dashboard::{Dashboard, DashboardOptions};
pub use edit_buffer::{
    CommitOutcome, EditBuffer, EditBufferController, EditField, EditState, EditTarget,
};
pub use error::StoreError;
pub use estimator::request_estimate;
pub use loader::{EndpointReport, InitialLoad, LoadReport, load_all, load_report, run_initial_load};
pub use persistence::{
    default_config_dir, default_settings_path, load_json, load_json_or_default, save_json,
};
pub use push_channel::{PushChannel, ReconnectPolicy, dispatch};
pub use range_filter::{RangeFilterController, RangeOutcome, apply_range};
pub use settings_store::{LogLevel, Settings, SettingsStore};
pub use view_model::{CostSeriesOrdering, ViewModelStore, WriteOutcome};

#[cfg(test)]
mod persistence_tests;
