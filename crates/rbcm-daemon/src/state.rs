// crates/rbcm-daemon/src/state.rs
//
// Lifecycle state machine for the RBCM daemon.
//
// Valid transitions:
//   Initializing -> Seeding -> Running
//   Any state -> ShuttingDown

use std::fmt;

/// Lifecycle states of the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonState {
    /// Loading configuration and building shared state.
    Initializing,
    /// Seeding the ghost population.
    Seeding,
    /// Simulation and RPC tasks are live.
    Running,
    /// Shutting down gracefully.
    ShuttingDown,
}

impl fmt::Display for DaemonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DaemonState::Initializing => write!(f, "Initializing"),
            DaemonState::Seeding => write!(f, "Seeding"),
            DaemonState::Running => write!(f, "Running"),
            DaemonState::ShuttingDown => write!(f, "ShuttingDown"),
        }
    }
}

/// State machine for managing daemon lifecycle transitions.
pub struct DaemonStateMachine {
    pub current: DaemonState,
}

impl DaemonStateMachine {
    /// Create a new state machine starting in the Initializing state.
    pub fn new() -> Self {
        Self {
            current: DaemonState::Initializing,
        }
    }

    /// Attempt to transition to a new state.
    ///
    /// Returns an error if the transition is not valid.
    pub fn transition(&mut self, new_state: DaemonState) -> Result<(), String> {
        let valid = match (&self.current, &new_state) {
            (_, DaemonState::ShuttingDown) => true,
            (DaemonState::Initializing, DaemonState::Seeding) => true,
            (DaemonState::Seeding, DaemonState::Running) => true,
            _ => false,
        };

        if valid {
            tracing::info!("State transition: {} -> {}", self.current, new_state);
            self.current = new_state;
            Ok(())
        } else {
            Err(format!(
                "Invalid state transition: {} -> {}",
                self.current, new_state
            ))
        }
    }
}

impl Default for DaemonStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
