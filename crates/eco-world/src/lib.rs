//! World simulation engine.
//!
//! Rabbits, foxes and grass share a toroidal grid. Each tick every live agent
//! acts once, in a freshly shuffled order.

pub mod agent;
pub mod behavior;
pub mod grid;
pub mod scheduler;
pub mod simulation;

pub use agent::{Agent, AgentView};
pub use grid::SpatialGrid;
pub use scheduler::Scheduler;
pub use simulation::{RunSummary, World, WorldSnapshot};
