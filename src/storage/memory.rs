use super::repository::{AgentDirectory, AgentRegistry, TicketStore};
use crate::core::{Agent, AgentId, Ticket, TicketId};
use crate::error::{DeskError, Result};
use crate::filter::PredicateSet;
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-process store backed by ordered maps
///
/// Every `put` runs under the map's write lock, so the version check and the
/// write form one step.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tickets: RwLock<BTreeMap<TicketId, Ticket>>,
    agents: RwLock<BTreeMap<AgentId, Agent>>,
}

fn poisoned<T>(_: T) -> DeskError {
    DeskError::custom("Storage lock poisoned")
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn tickets(&self) -> Result<RwLockReadGuard<'_, BTreeMap<TicketId, Ticket>>> {
        self.tickets.read().map_err(poisoned)
    }

    fn tickets_mut(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<TicketId, Ticket>>> {
        self.tickets.write().map_err(poisoned)
    }

    fn agents(&self) -> Result<RwLockReadGuard<'_, BTreeMap<AgentId, Agent>>> {
        self.agents.read().map_err(poisoned)
    }
}

impl TicketStore for MemoryStore {
    fn get(&self, id: &TicketId) -> Result<Ticket> {
        self.tickets()?
            .get(id)
            .cloned()
            .ok_or(DeskError::TicketNotFound { id: *id })
    }

    fn put(&self, mut ticket: Ticket) -> Result<Ticket> {
        let mut tickets = self.tickets_mut()?;

        if ticket.id.is_unassigned() {
            let next = tickets.last_key_value().map_or(1, |(id, _)| id.value() + 1);
            ticket.id = TicketId::new(next);
            ticket.version = 1;
        } else {
            let stored = tickets
                .get(&ticket.id)
                .ok_or(DeskError::TicketNotFound { id: ticket.id })?;
            if stored.version != ticket.version {
                return Err(DeskError::ConcurrentModification { id: ticket.id });
            }
            ticket.version += 1;
        }

        tickets.insert(ticket.id, ticket.clone());
        Ok(ticket)
    }

    fn scan(&self, predicates: &PredicateSet) -> Result<Vec<Ticket>> {
        Ok(self
            .tickets()?
            .values()
            .filter(|t| predicates.matches(t))
            .cloned()
            .collect())
    }
}

impl AgentDirectory for MemoryStore {
    fn find_by_id(&self, id: &AgentId) -> Result<Agent> {
        self.agents()?
            .get(id)
            .cloned()
            .ok_or_else(|| DeskError::agent_not_found(id))
    }

    fn find_by_name(&self, name: &str) -> Result<Agent> {
        self.agents()?
            .values()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| DeskError::agent_name_not_found(name))
    }
}

impl AgentRegistry for MemoryStore {
    fn register(&self, name: &str) -> Result<Agent> {
        let name = validate_agent_name(name)?;
        let mut agents = self.agents.write().map_err(poisoned)?;

        if agents.values().any(|a| a.name == name) {
            return Err(DeskError::AgentAlreadyExists {
                name: name.to_string(),
            });
        }

        let next = agents.last_key_value().map_or(1, |(id, _)| id.value() + 1);
        let agent = Agent::new(AgentId::new(next), name);
        agents.insert(agent.id, agent.clone());
        Ok(agent)
    }

    fn list_agents(&self) -> Result<Vec<Agent>> {
        Ok(self.agents()?.values().cloned().collect())
    }
}

/// Trims an agent name and rejects blank ones
pub(crate) fn validate_agent_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DeskError::InvalidInput(
            "Agent name cannot be empty".to_string(),
        ));
    }
    Ok(name)
}
