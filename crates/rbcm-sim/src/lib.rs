// crates/rbcm-sim/src/lib.rs
//
// rbcm-sim: Autonomous simulation of virtual ("ghost") nodes.
//
// A single background driver repeatedly picks a random virtual node, draws a
// success/failure outcome from the current regime (normal or rogue), and feeds
// it through the registry like any other feedback signal.

pub mod driver;
pub mod outcome;

pub use driver::{DriverExit, DriverState, SimulationDriver, TickOutcome};
pub use outcome::OutcomeModel;
