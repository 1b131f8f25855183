//! The world: grid, scheduler and the run loop around them.

use crate::agent::{Agent, AgentView, Animal, Grass};
use crate::behavior;
use crate::grid::SpatialGrid;
use crate::scheduler::Scheduler;
use eco_core::{
    record_counter, record_gauge, AgentId, Error, LifecycleCounters, PopulationCensus, Position,
    Result, SimulationConfig, Species,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

pub struct World {
    grid: SpatialGrid,
    scheduler: Scheduler,
    config: SimulationConfig,
    rng: ChaCha8Rng,
    tick: u64,
    counters: LifecycleCounters,
    last_order: Vec<AgentId>,
    animals_extinct: bool,
}

impl World {
    /// Build a world and seed the configured population at random cells.
    ///
    /// Rabbits are created first, then foxes, then grass, so ids are dense
    /// across species in that order.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut world = Self::empty(config)?;
        let population = world.config.population_config.clone();

        for _ in 0..population.initial_rabbits {
            let pos = world.random_position();
            world.spawn_animal(Species::Rabbit, pos, population.animal_energy)?;
        }
        for _ in 0..population.initial_foxes {
            let pos = world.random_position();
            world.spawn_animal(Species::Fox, pos, population.animal_energy)?;
        }
        for _ in 0..population.initial_grass {
            let pos = world.random_position();
            world.spawn_grass(pos, population.grass_fully_grown)?;
        }

        debug!(
            seed = world.config.seed,
            width = world.grid.width,
            height = world.grid.height,
            agents = world.scheduler.len(),
            "World seeded"
        );
        Ok(world)
    }

    /// Build a world with the configured grid but no agents.
    pub fn empty(config: SimulationConfig) -> Result<Self> {
        config.validate()?;

        let grid = SpatialGrid::new(config.world_config.width, config.world_config.height);
        let rng = ChaCha8Rng::seed_from_u64(config.seed);

        Ok(Self {
            grid,
            scheduler: Scheduler::new(),
            config,
            rng,
            tick: 0,
            counters: LifecycleCounters::default(),
            last_order: Vec::new(),
            animals_extinct: false,
        })
    }

    /// Create a rabbit or fox at `pos` (wrapped) and register it.
    pub fn spawn_animal(&mut self, species: Species, pos: Position, energy: i32) -> Result<AgentId> {
        let build: fn(AgentId, Position, i32) -> Agent = match species {
            Species::Rabbit => Agent::rabbit,
            Species::Fox => Agent::fox,
            Species::Grass => {
                return Err(Error::InvalidConfiguration(format!(
                    "{species} is not an animal"
                )))
            }
        };
        let id = self.scheduler.allocate_id();
        self.register(build(id, pos, energy))
    }

    /// Create a grass patch at `pos` (wrapped) and register it.
    pub fn spawn_grass(&mut self, pos: Position, fully_grown: bool) -> Result<AgentId> {
        let id = self.scheduler.allocate_id();
        self.register(Agent::grass(id, pos, fully_grown))
    }

    fn register(&mut self, mut agent: Agent) -> Result<AgentId> {
        let id = agent.id;
        agent.position = self.grid.place(id, agent.position)?;
        self.scheduler.add(agent)?;
        Ok(id)
    }

    /// Remove an agent from the grid and the scheduler.
    ///
    /// Returns `None` when the agent was already gone. Only that case is
    /// tolerated: a live agent missing from the grid is an error.
    pub fn despawn(&mut self, id: AgentId) -> Result<Option<Agent>> {
        if !self.scheduler.contains(id) {
            return Ok(None);
        }
        self.grid.remove(id)?;
        Ok(self.scheduler.remove(id))
    }

    /// Move an agent to `pos` (wrapped), keeping grid and record in step.
    pub fn relocate(&mut self, id: AgentId, pos: Position) -> Result<Position> {
        let agent = self.scheduler.get_mut(id).ok_or(Error::NotFound(id))?;
        let target = self.grid.move_agent(id, pos)?;
        agent.position = target;
        Ok(target)
    }

    /// Add a feeding gain to an animal, returning its capped energy.
    pub fn feed(&mut self, id: AgentId, gain: i32) -> Result<i32> {
        let animal = self.animal_mut(id).ok_or(Error::NotFound(id))?;
        Ok(animal.feed(gain))
    }

    /// Advance the whole world by one tick.
    pub fn step(&mut self) -> Result<()> {
        let mut pass = self.scheduler.begin_pass(&mut self.rng);
        while let Some(id) = pass.next_live(&self.scheduler) {
            behavior::activate(self, id)?;
        }

        self.last_order = pass.into_order();
        self.tick += 1;
        Ok(())
    }

    /// Run one agent's per-tick logic outside of a pass.
    pub fn activate(&mut self, id: AgentId) -> Result<()> {
        behavior::activate(self, id)
    }

    /// Run for `num_ticks` ticks, sampling the census along the way
    #[instrument(skip(self), fields(seed = self.config.seed))]
    pub fn run(&mut self, num_ticks: u64) -> Result<RunSummary> {
        info!("Starting simulation for {} ticks", num_ticks);

        let interval = self.config.census_interval;
        let mut census_history = Vec::new();
        if interval > 0 {
            census_history.push(self.census());
        }

        for _ in 0..num_ticks {
            self.step()?;

            let census = self.census();
            if interval > 0 && self.tick % interval == 0 {
                self.emit_population_metrics(&census);
                census_history.push(census);
            }
            self.note_extinction(&census);
        }

        let final_census = self.census();
        info!(
            event = "run_summary",
            ticks = num_ticks,
            final_tick = self.tick,
            rabbits = final_census.rabbits,
            foxes = final_census.foxes,
            grass_grown = final_census.grass_grown,
            births = self.counters.births,
            starvations = self.counters.starvations,
            predations = self.counters.predations,
            reproduction_rate = self.counters.reproduction_rate(),
            "Simulation complete"
        );

        Ok(RunSummary {
            ticks: num_ticks,
            census_history,
            counters: self.counters,
            final_census,
        })
    }

    fn emit_population_metrics(&self, census: &PopulationCensus) {
        info!(
            event = "population_metrics",
            tick = census.tick,
            rabbits = census.rabbits,
            foxes = census.foxes,
            grass = census.grass,
            grass_grown = census.grass_grown,
            "Population metrics snapshot"
        );

        record_gauge!("population_rabbits", census.rabbits, tick = census.tick);
        record_gauge!("population_foxes", census.foxes, tick = census.tick);
        record_gauge!("grass_grown", census.grass_grown, tick = census.tick);
        record_gauge!("population_total", census.total(), tick = census.tick);
        record_counter!("births_total", self.counters.births, tick = census.tick);
        record_counter!("deaths_total", self.counters.deaths(), tick = census.tick);
    }

    fn note_extinction(&mut self, census: &PopulationCensus) {
        if census.animals() == 0 && !self.animals_extinct {
            self.animals_extinct = true;
            warn!(tick = census.tick, "All animals are extinct");
        }
    }

    /// Count the live population right now.
    pub fn census(&self) -> PopulationCensus {
        let mut census = PopulationCensus::new(self.tick);
        for agent in self.scheduler.agents() {
            census.record(agent.species, agent.is_edible_grass());
        }
        census
    }

    /// Everything a renderer needs to draw the current state.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            width: self.grid.width,
            height: self.grid.height,
            agents: self.scheduler.agents().map(AgentView::from).collect(),
        }
    }

    /// Live agents whose record and grid cell disagree.
    pub fn inconsistencies(&self) -> Vec<AgentId> {
        let mut broken: Vec<AgentId> = self
            .scheduler
            .agents()
            .filter(|agent| {
                let entries = self
                    .grid
                    .contents_of(agent.position)
                    .iter()
                    .filter(|&&occupant| occupant == agent.id)
                    .count();
                self.grid.locate(agent.id) != Some(agent.position) || entries != 1
            })
            .map(|agent| agent.id)
            .collect();

        // Grid entries with no live agent behind them
        for (_, cell) in self.grid.occupied_cells() {
            broken.extend(cell.iter().filter(|&&id| !self.scheduler.contains(id)));
        }
        broken
    }

    pub(crate) fn any_in_cell(&self, pos: Position, pred: impl Fn(&Agent) -> bool) -> bool {
        self.find_in_cell(pos, pred).is_some()
    }

    /// First agent in the cell, in cell order, that matches `pred`.
    pub(crate) fn find_in_cell(
        &self,
        pos: Position,
        pred: impl Fn(&Agent) -> bool,
    ) -> Option<AgentId> {
        self.grid
            .contents_of(pos)
            .iter()
            .copied()
            .find(|&id| self.scheduler.get(id).is_some_and(&pred))
    }

    pub(crate) fn position_of(&self, id: AgentId) -> Result<Position> {
        self.scheduler
            .get(id)
            .map(|agent| agent.position)
            .ok_or(Error::NotFound(id))
    }

    pub(crate) fn animal_mut(&mut self, id: AgentId) -> Option<&mut Animal> {
        self.scheduler.get_mut(id).and_then(Agent::as_animal_mut)
    }

    pub(crate) fn grass_mut(&mut self, id: AgentId) -> Option<&mut Grass> {
        self.scheduler.get_mut(id).and_then(Agent::as_grass_mut)
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    pub(crate) fn counters_mut(&mut self) -> &mut LifecycleCounters {
        &mut self.counters
    }

    fn random_position(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.grid.width);
        let y = self.rng.gen_range(0..self.grid.height);
        Position::new(x, y)
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.scheduler.get(id)
    }

    /// Live agents in id order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.scheduler.agents()
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn counters(&self) -> &LifecycleCounters {
        &self.counters
    }

    /// Activation order of the most recent pass, removed agents included.
    pub fn last_activation_order(&self) -> &[AgentId] {
        &self.last_order
    }
}

/// Serializable view of the whole world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub width: i32,
    pub height: i32,
    pub agents: Vec<AgentView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub census_history: Vec<PopulationCensus>,
    pub counters: LifecycleCounters,
    pub final_census: PopulationCensus,
}
