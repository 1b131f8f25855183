//! Per-species activation rules.
//!
//! Every rule takes the world and the acting agent's id explicitly. Species
//! dispatch goes through [`behavior_for`], so the grid and scheduler never
//! need to know which species they are holding.

use crate::agent::Agent;
use crate::simulation::World;
use eco_core::constants::{
    FEED_GAIN, HUNGER_THRESHOLD, OFFSPRING_ENERGY, REPRODUCTION_PROBABILITY,
};
use eco_core::{AgentId, Error, Position, Result, Species};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, trace};

pub type Rule = fn(&mut World, AgentId) -> Result<()>;

/// Movement and feeding for one animal species
pub struct AnimalRules {
    pub movement: Rule,
    pub feed: Rule,
}

pub enum Behavior {
    Animal(&'static AnimalRules),
    Grass,
}

static RABBIT_RULES: AnimalRules = AnimalRules {
    movement: rabbit_move,
    feed: rabbit_feed,
};

static FOX_RULES: AnimalRules = AnimalRules {
    movement: random_walk,
    feed: fox_feed,
};

pub fn behavior_for(species: Species) -> Behavior {
    match species {
        Species::Rabbit => Behavior::Animal(&RABBIT_RULES),
        Species::Fox => Behavior::Animal(&FOX_RULES),
        Species::Grass => Behavior::Grass,
    }
}

/// Run one agent's per-tick logic. Agents that are no longer live are skipped.
pub fn activate(world: &mut World, id: AgentId) -> Result<()> {
    let Some(species) = world.agent(id).map(|agent| agent.species) else {
        return Ok(());
    };

    match behavior_for(species) {
        Behavior::Animal(rules) => animal_step(world, id, rules),
        Behavior::Grass => grass_step(world, id),
    }
}

/// move, pay metabolism, starve or feed, then maybe reproduce
fn animal_step(world: &mut World, id: AgentId, rules: &AnimalRules) -> Result<()> {
    (rules.movement)(world, id)?;

    let animal = world.animal_mut(id).ok_or(Error::NotFound(id))?;
    let energy = animal.metabolize();
    if animal.is_starved() {
        world.despawn(id)?;
        world.counters_mut().starvations += 1;
        debug!(agent_id = %id, tick = world.tick(), "Animal starved");
        return Ok(());
    }
    trace!(agent_id = %id, energy, "Animal metabolized");

    (rules.feed)(world, id)?;

    let ready = world
        .animal_mut(id)
        .map(|animal| animal.can_reproduce())
        .unwrap_or(false);
    if ready {
        reproduce(world, id)?;
    }

    Ok(())
}

fn grass_step(world: &mut World, id: AgentId) -> Result<()> {
    let grass = world.grass_mut(id).ok_or(Error::NotFound(id))?;
    if grass.regrow() {
        trace!(agent_id = %id, "Grass fully grown");
    }
    Ok(())
}

/// Step to a uniformly random cell of the 3x3 block around the agent,
/// staying put included.
fn random_walk(world: &mut World, id: AgentId) -> Result<()> {
    let position = world.position_of(id)?;
    let dx = world.rng_mut().gen_range(-1..=1);
    let dy = world.rng_mut().gen_range(-1..=1);
    world.relocate(id, position.add(dx, dy))?;
    Ok(())
}

/// Avoid foxes, head for grass when hungry, wander otherwise.
fn rabbit_move(world: &mut World, id: AgentId) -> Result<()> {
    let agent = world.agent(id).ok_or(Error::NotFound(id))?;
    let (position, energy) = (agent.position, agent.energy().unwrap_or_default());

    let safe: Vec<Position> = world
        .grid()
        .neighborhood(position, 1, false)
        .into_iter()
        .filter(|&cell| !world.any_in_cell(cell, |other| other.species == Species::Fox))
        .collect();

    if safe.is_empty() {
        trace!(agent_id = %id, %position, "Rabbit surrounded, staying put");
        return Ok(());
    }

    if energy < HUNGER_THRESHOLD {
        let forage: Vec<Position> = safe
            .into_iter()
            .filter(|&cell| world.any_in_cell(cell, Agent::is_edible_grass))
            .collect();
        if let Some(&destination) = forage.choose(world.rng_mut()) {
            trace!(agent_id = %id, energy, %destination, "Rabbit foraging");
            world.relocate(id, destination)?;
            return Ok(());
        }
    }

    random_walk(world, id)
}

fn rabbit_feed(world: &mut World, id: AgentId) -> Result<()> {
    let position = world.position_of(id)?;
    let Some(grass_id) = world.find_in_cell(position, |other| other.is_edible_grass()) else {
        return Ok(());
    };

    if let Some(grass) = world.grass_mut(grass_id) {
        grass.be_eaten();
    }
    let energy = world.feed(id, FEED_GAIN)?;
    world.counters_mut().grass_eaten += 1;
    trace!(agent_id = %id, grass_id = %grass_id, energy, "Rabbit grazed");
    Ok(())
}

fn fox_feed(world: &mut World, id: AgentId) -> Result<()> {
    let position = world.position_of(id)?;
    let Some(prey) = world.find_in_cell(position, |other| other.species == Species::Rabbit) else {
        return Ok(());
    };

    if world.despawn(prey)?.is_some() {
        world.counters_mut().predations += 1;
    }
    let energy = world.feed(id, FEED_GAIN)?;
    debug!(
        fox_id = %id,
        rabbit_id = %prey,
        %position,
        energy,
        tick = world.tick(),
        "Fox caught a rabbit"
    );
    Ok(())
}

/// Pair with the first eligible same-species neighbor in the cell and roll once.
fn reproduce(world: &mut World, id: AgentId) -> Result<()> {
    let agent = world.agent(id).ok_or(Error::NotFound(id))?;
    let (species, position) = (agent.species, agent.position);

    let Some(partner) = world.find_in_cell(position, |other| {
        other.id != id && other.is_mate_for(species)
    }) else {
        return Ok(());
    };

    world.counters_mut().reproduction_attempts += 1;
    if !world.rng_mut().gen_bool(REPRODUCTION_PROBABILITY) {
        trace!(agent_id = %id, partner_id = %partner, "Reproduction roll failed");
        return Ok(());
    }

    for parent in [id, partner] {
        if let Some(animal) = world.animal_mut(parent) {
            animal.halve_energy();
        }
    }

    let offspring = world.spawn_animal(species, position, OFFSPRING_ENERGY)?;
    world.counters_mut().births += 1;
    debug!(
        %species,
        parent_id = %id,
        partner_id = %partner,
        offspring_id = %offspring,
        %position,
        tick = world.tick(),
        "Offspring born"
    );
    Ok(())
}
