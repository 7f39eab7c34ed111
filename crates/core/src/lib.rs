//! Core library for the Sort Visualiser application.
//!
//! The crate animates comparison sorts step by step. A [`SortEngine`] sorts a
//! private working copy and publishes a [`Snapshot`] into the
//! [`SequenceStore`] after every mutation, pacing itself through an
//! injectable [`Scheduler`]. The [`Controller`] owns the run lifecycle and
//! guarantees that at most one run is active per store.

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod render;
pub mod store;
pub mod timeline;

pub use config::{parse_values, Algorithm, AppConfig, SortConfig};
pub use controller::Controller;
pub use engine::{RunReport, SortEngine};
pub use error::{Result, SortVizError};
pub use render::BarRenderer;
pub use store::{Change, ListenerId, RunGuard, RunStatus, SequenceStore, Snapshot, StoreEvent};
pub use timeline::{InstantScheduler, Scheduler, TokioScheduler};
