//! Agent registry and random-order activation.

use crate::agent::Agent;
use eco_core::{AgentId, Error, Result};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Owns every live agent and decides who acts when.
///
/// Membership here is what makes an agent alive. Agents are keyed by id in a
/// `BTreeMap` so iteration order, and with it every shuffle, only depends on
/// the seed.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    agents: BTreeMap<AgentId, Agent>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next identifier. Never returns the same id twice.
    pub fn allocate_id(&mut self) -> AgentId {
        let id = AgentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a live agent. It joins from the next pass on.
    pub fn add(&mut self, agent: Agent) -> Result<()> {
        if self.agents.contains_key(&agent.id) {
            return Err(Error::AlreadyRegistered(agent.id));
        }

        // Ids chosen by the caller still advance the counter
        self.next_id = self.next_id.max(agent.id.0 + 1);
        self.agents.insert(agent.id, agent);
        Ok(())
    }

    /// Deregister an agent. Removing an agent that is already gone is a no-op.
    pub fn remove(&mut self, id: AgentId) -> Option<Agent> {
        self.agents.remove(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Live agents in id order
    pub fn agents(&self) -> impl Iterator<Item = &Agent> + '_ {
        self.agents.values()
    }

    /// Snapshot the live set and shuffle it into this pass's activation order.
    pub fn begin_pass(&self, rng: &mut ChaCha8Rng) -> ActivationPass {
        let mut order: Vec<AgentId> = self.agents.keys().copied().collect();
        order.shuffle(rng);
        ActivationPass { order, cursor: 0 }
    }
}

/// One pass over the agents that were live when it began.
///
/// The order is fixed up front. Agents added afterwards are not part of it,
/// and agents removed afterwards are skipped when their turn comes.
#[derive(Debug, Clone)]
pub struct ActivationPass {
    order: Vec<AgentId>,
    cursor: usize,
}

impl ActivationPass {
    /// Next agent in the order that is still registered.
    pub fn next_live(&mut self, scheduler: &Scheduler) -> Option<AgentId> {
        while let Some(&id) = self.order.get(self.cursor) {
            self.cursor += 1;
            if scheduler.contains(id) {
                return Some(id);
            }
        }
        None
    }

    pub fn order(&self) -> &[AgentId] {
        &self.order
    }

    pub fn into_order(self) -> Vec<AgentId> {
        self.order
    }
}
