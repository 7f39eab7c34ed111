//! Stepwise sort-animation engine.
//!
//! A [`SortEngine`] sorts a private working copy of the sequence and, after
//! every mutation, publishes a snapshot to the [`SequenceStore`] before
//! yielding to the [`Scheduler`]. The algorithm is picked from the closed
//! [`Algorithm`] set captured in the [`SortConfig`].

mod bubble;
mod merge;
mod quick;

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::{Algorithm, Result, Scheduler, SequenceStore, Snapshot, SortConfig, SortVizError};

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub algorithm: Algorithm,
    pub sorted: Vec<f64>,
    /// Number of snapshots the engine published.
    pub steps: usize,
    pub comparisons: usize,
    pub elapsed: Duration,
}

pub struct SortEngine<'a> {
    store: &'a SequenceStore,
    scheduler: &'a dyn Scheduler,
    config: SortConfig,
    work: Vec<f64>,
    steps: usize,
    comparisons: usize,
}

impl<'a> SortEngine<'a> {
    pub fn new(store: &'a SequenceStore, scheduler: &'a dyn Scheduler, config: SortConfig) -> Self {
        Self {
            store,
            scheduler,
            config,
            work: Vec::new(),
            steps: 0,
            comparisons: 0,
        }
    }

    /// Sorts a copy of `initial`; `initial` itself is never touched.
    ///
    /// Snapshots only reach observers while the store is running, so callers
    /// are expected to hold a [`crate::RunGuard`] for the duration.
    pub async fn run(mut self, initial: &[f64]) -> Result<RunReport> {
        validate(initial)?;

        let algorithm = self.config.algorithm;
        let started = Instant::now();
        tracing::info!(
            %algorithm,
            len = initial.len(),
            paced = self.config.paced,
            delay_ms = self.config.delay_ms,
            "starting sort"
        );

        self.work = initial.to_vec();
        let last = self.work.len().saturating_sub(1);
        match algorithm {
            Algorithm::BubbleSort => self.bubble_sort().await,
            Algorithm::QuickSort => self.quick_sort(0, last).await,
            Algorithm::MergeSort => self.merge_sort(0, last).await,
        }

        let elapsed = started.elapsed();
        tracing::info!(
            %algorithm,
            steps = self.steps,
            comparisons = self.comparisons,
            ?elapsed,
            "sort finished"
        );

        Ok(RunReport {
            algorithm,
            sorted: self.work,
            steps: self.steps,
            comparisons: self.comparisons,
            elapsed,
        })
    }

    /// Publishes the working sequence and paces.
    async fn step(&mut self) {
        self.steps += 1;
        self.store.publish(Snapshot::new(&self.work));
        self.scheduler
            .pace(self.config.delay(), self.config.paced)
            .await;
    }

    fn less(&mut self, a: f64, b: f64) -> bool {
        self.comparisons += 1;
        a < b
    }

    fn less_or_equal(&mut self, a: f64, b: f64) -> bool {
        self.comparisons += 1;
        a <= b
    }
}

/// Rejects elements that cannot be totally ordered.
pub fn validate(values: &[f64]) -> Result<()> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(index) => Err(SortVizError::invalid_input(format!(
            "element {index} is not finite ({})",
            values[index]
        ))),
        None => Ok(()),
    }
}
