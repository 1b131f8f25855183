//! Configuration types for the simulation.

use crate::constants::MAX_ENERGY;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the world grid
    pub width: i32,
    /// Height of the world grid
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 20,
        }
    }
}

/// Initial population seeded into a fresh world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of rabbits placed at start
    pub initial_rabbits: i32,
    /// Number of foxes placed at start
    pub initial_foxes: i32,
    /// Number of grass patches placed at start
    pub initial_grass: i32,
    /// Starting energy for every seeded animal
    pub animal_energy: i32,
    /// Whether seeded grass starts out edible
    pub grass_fully_grown: bool,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_rabbits: 50,
            initial_foxes: 5,
            initial_grass: 50,
            animal_energy: 100,
            grass_fully_grown: true,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks `run` advances
    pub num_ticks: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Ticks between population census samples (0 disables sampling)
    pub census_interval: u64,
    /// World configuration
    pub world_config: WorldConfig,
    /// Initial population
    pub population_config: PopulationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_ticks: 1_000,
            seed: 0,
            census_interval: 10,
            world_config: WorldConfig::default(),
            population_config: PopulationConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Reject dimensions and populations the engine cannot start from.
    pub fn validate(&self) -> Result<()> {
        let world = &self.world_config;
        if world.width <= 0 || world.height <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid dimensions must be positive, got {}x{}",
                world.width, world.height
            )));
        }
        if world.width.checked_mul(world.height).is_none() {
            return Err(Error::InvalidConfiguration(format!(
                "grid of {}x{} cells is too large",
                world.width, world.height
            )));
        }

        let population = &self.population_config;
        for (name, count) in [
            ("initial_rabbits", population.initial_rabbits),
            ("initial_foxes", population.initial_foxes),
            ("initial_grass", population.initial_grass),
        ] {
            if count < 0 {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must not be negative, got {count}"
                )));
            }
        }

        if !(0..=MAX_ENERGY).contains(&population.animal_energy) {
            return Err(Error::InvalidConfiguration(format!(
                "animal_energy must be within 0..={MAX_ENERGY}, got {}",
                population.animal_energy
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let config = SimulationConfig::default();
        assert_eq!(config.world_config.width, 20);
        assert_eq!(config.world_config.height, 20);
        assert_eq!(config.population_config.initial_rabbits, 50);
        assert_eq!(config.population_config.initial_foxes, 5);
        assert_eq!(config.population_config.initial_grass, 50);
        assert_eq!(config.population_config.animal_energy, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_dimensions() {
        let mut config = SimulationConfig::default();
        config.world_config.height = 0;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        config.world_config.height = 5;
        config.world_config.width = -3;
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_rejects_overflowing_grid_size() {
        let mut config = SimulationConfig::default();
        config.world_config = WorldConfig {
            width: 50_000,
            height: 50_000,
        };
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        config.world_config.height = 40_000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_negative_counts() {
        let mut config = SimulationConfig::default();
        config.population_config.initial_foxes = -1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("initial_foxes"));
    }

    #[test]
    fn test_zero_counts_are_valid() {
        let mut config = SimulationConfig::default();
        config.population_config.initial_rabbits = 0;
        config.population_config.initial_foxes = 0;
        config.population_config.initial_grass = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_energy() {
        let mut config = SimulationConfig::default();
        config.population_config.animal_energy = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json_str(
            r#"{ "seed": 7, "world_config": { "width": 3 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.world_config.width, 3);
        assert_eq!(config.world_config.height, 20);
        assert_eq!(config.population_config, PopulationConfig::default());
    }

    #[test]
    fn test_json_validation_runs_on_load() {
        let result = SimulationConfig::from_json_str(r#"{ "world_config": { "width": 0 } }"#);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));

        let result = SimulationConfig::from_json_str("{ not json");
        assert!(matches!(result, Err(Error::Serialization(_))));
    }
}
