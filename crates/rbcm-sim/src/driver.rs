// crates/rbcm-sim/src/driver.rs
//
// SimulationDriver: background loop that perturbs ghost node scores.
//
// Lifecycle: Idle -> Running -> Stopped
//   Running -> Stopped on an explicit stop signal or when the virtual
//   partition is empty.
//
// Each tick picks one virtual id uniformly at random, draws a Bernoulli
// outcome (p = 0.95 normally, 0.20 under rogue mode), and applies it with
// distance 1.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use rbcm_core::RbcmError;
use rbcm_reputation::{NodeRegistry, RogueMode};

use crate::outcome::OutcomeModel;

/// Distance attributed to simulated feedback.
const SIMULATED_DISTANCE: f64 = 1.0;

/// Lifecycle states of the simulation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Stopped,
}

impl fmt::Display for DriverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverState::Idle => write!(f, "Idle"),
            DriverState::Running => write!(f, "Running"),
            DriverState::Stopped => write!(f, "Stopped"),
        }
    }
}

/// Why the run loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    /// The stop signal fired (or its sender was dropped).
    Cancelled,
    /// The virtual partition was empty at tick time.
    PopulationEmpty,
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Updated {
        id: String,
        success: bool,
        score: f64,
    },
    Empty,
}

/// Drives virtual node scores from a single background task.
pub struct SimulationDriver {
    registry: Arc<NodeRegistry>,
    rogue: Arc<RogueMode>,
    model: OutcomeModel,
    tick_interval: Duration,
    rng: StdRng,
    state: DriverState,
    ticks: u64,
}

impl fmt::Debug for SimulationDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationDriver")
            .field("model", &self.model)
            .field("tick_interval", &self.tick_interval)
            .field("state", &self.state)
            .field("ticks", &self.ticks)
            .finish()
    }
}

impl SimulationDriver {
    /// Create an idle driver seeded from OS entropy.
    pub fn new(
        registry: Arc<NodeRegistry>,
        rogue: Arc<RogueMode>,
        model: OutcomeModel,
        tick_interval: Duration,
    ) -> Self {
        Self {
            registry,
            rogue,
            model,
            tick_interval,
            rng: StdRng::from_entropy(),
            state: DriverState::Idle,
            ticks: 0,
        }
    }

    /// Replace the RNG with one seeded from `seed` for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Number of ticks that updated a node.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Perform one simulation step.
    pub async fn tick(&mut self) -> Result<TickOutcome, RbcmError> {
        let id = match self.registry.random_virtual_id(&mut self.rng).await {
            Some(id) => id,
            None => return Ok(TickOutcome::Empty),
        };

        let success = self.model.draw(&mut self.rng, self.rogue.is_active());
        let score = self
            .registry
            .upsert_virtual(&id, success, SIMULATED_DISTANCE)
            .await?;
        self.ticks += 1;

        Ok(TickOutcome::Updated { id, success, score })
    }

    /// Run the tick loop until the stop signal fires or the virtual
    /// partition is empty.
    ///
    /// The stop signal is a `watch` channel; sending `true` (or dropping the
    /// sender) cancels the loop before the next tick. A driver can only be
    /// run once.
    pub async fn run(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<DriverExit, RbcmError> {
        if self.state != DriverState::Idle {
            return Err(RbcmError::InvalidState(format!(
                "simulation driver cannot start from {} state",
                self.state
            )));
        }
        self.state = DriverState::Running;
        tracing::info!(
            "Simulation driver started (tick_interval={:?}, normal_p={}, rogue_p={})",
            self.tick_interval,
            self.model.success_probability(false),
            self.model.success_probability(true)
        );

        let result = self.run_loop(&mut shutdown).await;
        self.state = DriverState::Stopped;

        match &result {
            Ok(DriverExit::Cancelled) => {
                tracing::info!("Simulation driver stopped after {} ticks", self.ticks)
            }
            Ok(DriverExit::PopulationEmpty) => {
                tracing::warn!("Simulation driver halted: virtual partition is empty")
            }
            Err(e) => tracing::error!("Simulation driver error: {}", e),
        }
        result
    }

    async fn run_loop(
        &mut self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<DriverExit, RbcmError> {
        if *shutdown.borrow() {
            return Ok(DriverExit::Cancelled);
        }

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        return Ok(DriverExit::Cancelled);
                    }
                }
                _ = interval.tick() => {
                    if let TickOutcome::Empty = self.tick().await? {
                        return Ok(DriverExit::PopulationEmpty);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbcm_reputation::ghost_ids;

    fn driver(registry: Arc<NodeRegistry>, rogue: Arc<RogueMode>) -> SimulationDriver {
        SimulationDriver::new(
            registry,
            rogue,
            OutcomeModel::default(),
            Duration::from_millis(1),
        )
        .with_seed(42)
    }

    #[tokio::test]
    async fn tick_on_empty_registry_reports_empty() {
        let mut d = driver(Arc::new(NodeRegistry::new()), Arc::new(RogueMode::new()));
        assert_eq!(d.tick().await.unwrap(), TickOutcome::Empty);
        assert_eq!(d.ticks(), 0);
    }

    #[tokio::test]
    async fn tick_updates_a_seeded_ghost() {
        let registry = Arc::new(NodeRegistry::new());
        registry.seed_virtual(ghost_ids(5)).await;
        let mut d = driver(registry.clone(), Arc::new(RogueMode::new()));

        match d.tick().await.unwrap() {
            TickOutcome::Updated { id, score, .. } => {
                assert!(id.starts_with("ghost-"));
                assert_eq!(registry.score_of(&id).await.unwrap().score, score);
                assert_ne!(score, rbcm_core::DEFAULT_SCORE);
            }
            TickOutcome::Empty => panic!("expected an update"),
        }
        assert_eq!(registry.virtual_count().await, 5);
    }

    #[tokio::test]
    async fn rogue_mode_shifts_outcome_rate() {
        let registry = Arc::new(NodeRegistry::new());
        registry.seed_virtual(ghost_ids(10)).await;
        let rogue = Arc::new(RogueMode::new());
        let mut d = driver(registry.clone(), rogue.clone());

        let mut normal_successes = 0;
        for _ in 0..1000 {
            if let TickOutcome::Updated { success: true, .. } = d.tick().await.unwrap() {
                normal_successes += 1;
            }
        }

        rogue.toggle();
        let mut rogue_successes = 0;
        for _ in 0..1000 {
            if let TickOutcome::Updated { success: true, .. } = d.tick().await.unwrap() {
                rogue_successes += 1;
            }
        }

        assert!(normal_successes > 900, "normal successes: {}", normal_successes);
        assert!(rogue_successes < 300, "rogue successes: {}", rogue_successes);

        for (_, entry) in registry.snapshot_merged().await {
            assert!((0.0..=100.0).contains(&entry.score));
        }
    }

    #[tokio::test]
    async fn run_halts_when_population_empty() {
        let mut d = driver(Arc::new(NodeRegistry::new()), Arc::new(RogueMode::new()));
        let (_tx, rx) = watch::channel(false);
        assert_eq!(d.run(rx).await.unwrap(), DriverExit::PopulationEmpty);
        assert_eq!(d.state(), DriverState::Stopped);
    }

    #[tokio::test]
    async fn run_stops_on_signal() {
        let registry = Arc::new(NodeRegistry::new());
        registry.seed_virtual(ghost_ids(3)).await;
        let mut d = driver(registry, Arc::new(RogueMode::new()));
        let (tx, rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let exit = d.run(rx).await;
            (exit, d)
        });
        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();

        let (exit, d) = handle.await.unwrap();
        assert_eq!(exit.unwrap(), DriverExit::Cancelled);
        assert_eq!(d.state(), DriverState::Stopped);
        assert!(d.ticks() > 0);
    }

    #[tokio::test]
    async fn run_with_signal_already_set_does_not_tick() {
        let registry = Arc::new(NodeRegistry::new());
        registry.seed_virtual(ghost_ids(3)).await;
        let mut d = driver(registry, Arc::new(RogueMode::new()));
        let (_tx, rx) = watch::channel(true);
        assert_eq!(d.run(rx).await.unwrap(), DriverExit::Cancelled);
        assert_eq!(d.ticks(), 0);
    }

    #[tokio::test]
    async fn driver_cannot_run_twice() {
        let mut d = driver(Arc::new(NodeRegistry::new()), Arc::new(RogueMode::new()));
        let (_tx, rx) = watch::channel(false);
        d.run(rx.clone()).await.unwrap();
        assert!(matches!(d.run(rx).await, Err(RbcmError::InvalidState(_))));
    }
}
