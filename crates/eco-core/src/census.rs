//! Population counts and lifecycle statistics.

use crate::types::Species;
use serde::{Deserialize, Serialize};

/// Head count of the live population at one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCensus {
    pub tick: u64,
    pub rabbits: u32,
    pub foxes: u32,
    pub grass: u32,
    /// Grass patches currently edible
    pub grass_grown: u32,
}

impl PopulationCensus {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            ..Default::default()
        }
    }

    /// Count one live agent.
    pub fn record(&mut self, species: Species, fully_grown: bool) {
        match species {
            Species::Rabbit => self.rabbits += 1,
            Species::Fox => self.foxes += 1,
            Species::Grass => {
                self.grass += 1;
                if fully_grown {
                    self.grass_grown += 1;
                }
            }
        }
    }

    pub fn animals(&self) -> u32 {
        self.rabbits + self.foxes
    }

    pub fn total(&self) -> u32 {
        self.animals() + self.grass
    }
}

/// Cumulative lifecycle events since the world was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleCounters {
    pub births: u64,
    pub starvations: u64,
    pub predations: u64,
    pub grass_eaten: u64,
    /// Pairs that met the energy threshold and rolled for reproduction
    pub reproduction_attempts: u64,
}

impl LifecycleCounters {
    pub fn deaths(&self) -> u64 {
        self.starvations + self.predations
    }

    /// Observed fraction of attempts that produced an offspring.
    pub fn reproduction_rate(&self) -> f64 {
        if self.reproduction_attempts == 0 {
            0.0
        } else {
            self.births as f64 / self.reproduction_attempts as f64
        }
    }
}
