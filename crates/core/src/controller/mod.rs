use std::sync::{Arc, Mutex, MutexGuard};

use rand::{rngs::StdRng, SeedableRng};

use crate::{
    Algorithm, Result, RunReport, RunStatus, Scheduler, SequenceStore, Snapshot, SortConfig,
    SortEngine, SortVizError,
};

/// Orchestrates the run lifecycle on top of a [`SequenceStore`].
///
/// Reconfiguration and resets are rejected with
/// [`SortVizError::InvalidState`] while a run is active; callers that keep
/// their controls disabled during a run may ignore those errors.
pub struct Controller {
    store: Arc<SequenceStore>,
    scheduler: Arc<dyn Scheduler>,
    config: Mutex<SortConfig>,
    rng: Mutex<StdRng>,
}

impl Controller {
    pub fn new(store: Arc<SequenceStore>, scheduler: Arc<dyn Scheduler>, config: SortConfig) -> Self {
        Self {
            store,
            scheduler,
            config: Mutex::new(config),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Makes subsequent resets reproducible.
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn store(&self) -> &Arc<SequenceStore> {
        &self.store
    }

    pub fn status(&self) -> RunStatus {
        self.store.status()
    }

    pub fn sequence(&self) -> Snapshot {
        self.store.sequence()
    }

    pub fn config(&self) -> Result<SortConfig> {
        Ok(*self.lock_config()?)
    }

    pub fn select_algorithm(&self, algorithm: Algorithm) -> Result<()> {
        self.update_config("select algorithm", |config| config.algorithm = algorithm)
    }

    pub fn set_paced(&self, paced: bool) -> Result<()> {
        self.update_config("toggle pacing", |config| config.paced = paced)
    }

    pub fn set_delay_ms(&self, delay_ms: u64) -> Result<()> {
        self.update_config("change delay", |config| config.delay_ms = delay_ms)
    }

    pub fn set_config(&self, new_config: SortConfig) -> Result<()> {
        self.update_config("replace config", |config| *config = new_config)
    }

    /// Replaces the sequence while idle.
    pub fn load(&self, values: Vec<f64>) -> Result<()> {
        self.store.initialize(values)
    }

    /// Shuffles the sequence while idle.
    pub fn reset(&self) -> Result<()> {
        self.ensure_idle("reset")?;
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| SortVizError::invalid_state("shuffle rng has been poisoned"))?;
        self.store.shuffle_with(&mut *rng)
    }

    /// Sorts the current sequence with the configured algorithm.
    ///
    /// Returns `Ok(None)` without doing anything when a run is already
    /// active. The store returns to idle when the run ends, fails, or the
    /// returned future is dropped.
    pub async fn start(&self) -> Result<Option<RunReport>> {
        let Some(_run) = self.store.begin_run() else {
            tracing::debug!("sort already running, ignoring start");
            return Ok(None);
        };

        let config = self.config()?;
        let initial = self.store.sequence();
        let report = SortEngine::new(&self.store, self.scheduler.as_ref(), config)
            .run(&initial)
            .await?;

        // Quick sort leaves its last pivot swap unpublished.
        if self.store.sequence().values() != report.sorted.as_slice() {
            self.store.publish(Snapshot::new(&report.sorted));
        }

        Ok(Some(report))
    }

    fn update_config(&self, action: &str, apply: impl FnOnce(&mut SortConfig)) -> Result<()> {
        let mut config = self.lock_config()?;
        self.ensure_idle(action)?;
        apply(&mut config);
        tracing::debug!(config = ?*config, "sort config updated");
        Ok(())
    }

    fn ensure_idle(&self, action: &str) -> Result<()> {
        if self.store.is_running() {
            tracing::debug!(action, "rejected while a sort is running");
            return Err(SortVizError::invalid_state(format!(
                "cannot {action} while a sort is running"
            )));
        }
        Ok(())
    }

    fn lock_config(&self) -> Result<MutexGuard<'_, SortConfig>> {
        self.config
            .lock()
            .map_err(|_| SortVizError::invalid_state("sort config has been poisoned"))
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("store", &self.store)
            .field("config", &self.config)
            .finish()
    }
}
