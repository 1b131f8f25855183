//! Agent records and their per-species state.

use eco_core::constants::{GRASS_REGROW_TIME, MAX_ENERGY, METABOLIC_COST, REPRODUCTION_THRESHOLD};
use eco_core::{AgentId, Position, Species};
use serde::{Deserialize, Serialize};

/// Energy bookkeeping shared by rabbits and foxes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animal {
    pub energy: i32,
}

impl Animal {
    pub fn new(energy: i32) -> Self {
        Self { energy }
    }

    /// Pay the per-activation cost. Energy may go negative here; the caller
    /// decides what death means.
    pub fn metabolize(&mut self) -> i32 {
        self.energy -= METABOLIC_COST;
        self.energy
    }

    pub fn is_starved(&self) -> bool {
        self.energy < 0
    }

    /// Add a feeding gain, capped at `MAX_ENERGY`.
    pub fn feed(&mut self, gain: i32) -> i32 {
        self.energy = (self.energy + gain).min(MAX_ENERGY);
        self.energy
    }

    pub fn can_reproduce(&self) -> bool {
        self.energy >= REPRODUCTION_THRESHOLD
    }

    pub fn halve_energy(&mut self) {
        self.energy /= 2;
    }
}

/// A grass patch that regrows after being eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grass {
    pub fully_grown: bool,
    pub regrow_time: u32,
    pub timer: u32,
}

impl Grass {
    pub fn new(fully_grown: bool) -> Self {
        Self {
            fully_grown,
            regrow_time: GRASS_REGROW_TIME,
            timer: 0,
        }
    }

    /// Advance regrowth by one activation. Returns true on the activation the
    /// patch becomes edible again.
    pub fn regrow(&mut self) -> bool {
        if self.fully_grown {
            return false;
        }

        self.timer += 1;
        if self.timer >= self.regrow_time {
            self.fully_grown = true;
            self.timer = 0;
            return true;
        }
        false
    }

    pub fn be_eaten(&mut self) {
        self.fully_grown = false;
        self.timer = 0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Animal(Animal),
    Grass(Grass),
}

/// An agent in the simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub position: Position,
    pub state: AgentState,
}

impl Agent {
    pub fn rabbit(id: AgentId, position: Position, energy: i32) -> Self {
        Self::animal(id, Species::Rabbit, position, energy)
    }

    pub fn fox(id: AgentId, position: Position, energy: i32) -> Self {
        Self::animal(id, Species::Fox, position, energy)
    }

    fn animal(id: AgentId, species: Species, position: Position, energy: i32) -> Self {
        Self {
            id,
            species,
            position,
            state: AgentState::Animal(Animal::new(energy)),
        }
    }

    pub fn grass(id: AgentId, position: Position, fully_grown: bool) -> Self {
        Self {
            id,
            species: Species::Grass,
            position,
            state: AgentState::Grass(Grass::new(fully_grown)),
        }
    }

    pub fn energy(&self) -> Option<i32> {
        match &self.state {
            AgentState::Animal(animal) => Some(animal.energy),
            AgentState::Grass(_) => None,
        }
    }

    pub fn fully_grown(&self) -> Option<bool> {
        match &self.state {
            AgentState::Grass(grass) => Some(grass.fully_grown),
            AgentState::Animal(_) => None,
        }
    }

    pub fn as_animal_mut(&mut self) -> Option<&mut Animal> {
        match &mut self.state {
            AgentState::Animal(animal) => Some(animal),
            AgentState::Grass(_) => None,
        }
    }

    pub fn as_grass_mut(&mut self) -> Option<&mut Grass> {
        match &mut self.state {
            AgentState::Grass(grass) => Some(grass),
            AgentState::Animal(_) => None,
        }
    }

    pub fn is_edible_grass(&self) -> bool {
        self.fully_grown() == Some(true)
    }

    /// Same species and enough energy to take part in reproduction.
    pub fn is_mate_for(&self, species: Species) -> bool {
        self.species == species
            && matches!(&self.state, AgentState::Animal(animal) if animal.can_reproduce())
    }
}

/// Read-only view of an agent for rendering layers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub species: Species,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fully_grown: Option<bool>,
}

impl From<&Agent> for AgentView {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            species: agent.species,
            position: agent.position,
            energy: agent.energy(),
            fully_grown: agent.fully_grown(),
        }
    }
}
