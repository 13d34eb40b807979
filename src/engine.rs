//! Ticket lifecycle engine
//!
//! [`TicketService`] is the only place tickets change state. Each mutation
//! runs as one unit of work: load the ticket, check preconditions in a fixed
//! order, mutate a local copy, then `put` it. Validation always finishes
//! before the copy is touched, so a failed call never reaches the store.
//!
//! Stores reject writes based on a stale version. When that happens the whole
//! unit is re-run against fresh state, so of two racing `assign` calls on the
//! same `NEW` ticket exactly one succeeds and the other sees `IN_PROGRESS`.

use crate::core::{Agent, AgentId, AgentRef, NewTicket, Status, Ticket, TicketFilter, TicketId, TicketUpdate, is_blank};
use crate::error::{
    CLOSED_CANNOT_BE_UPDATED, DeskError, ONLY_IN_PROGRESS_CAN_BE_RESOLVED,
    ONLY_NEW_CAN_BE_ASSIGNED, ONLY_RESOLVED_CAN_BE_CLOSED, Result,
};
use crate::filter::PredicateSet;
use crate::storage::{AgentDirectory, TicketStore};
use chrono::Utc;
use std::sync::Arc;

/// Write attempts per operation when the store reports a version conflict
pub const DEFAULT_WRITE_RETRIES: u32 = 3;

/// Applies lifecycle operations against a ticket store and agent directory
pub struct TicketService<S: ?Sized, A: ?Sized> {
    store: Arc<S>,
    agents: Arc<A>,
    write_retries: u32,
}

impl<S: ?Sized, A: ?Sized> Clone for TicketService<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            agents: Arc::clone(&self.agents),
            write_retries: self.write_retries,
        }
    }
}

impl<T> TicketService<T, T>
where
    T: TicketStore + AgentDirectory + ?Sized,
{
    /// Uses one backend as both ticket store and agent directory
    pub fn with_storage(storage: Arc<T>) -> Self {
        Self::new(Arc::clone(&storage), storage)
    }
}

impl<S, A> TicketService<S, A>
where
    S: TicketStore + ?Sized,
    A: AgentDirectory + ?Sized,
{
    pub fn new(store: Arc<S>, agents: Arc<A>) -> Self {
        Self {
            store,
            agents,
            write_retries: DEFAULT_WRITE_RETRIES,
        }
    }

    /// Sets how many times a conflicting write is re-run; at least one
    /// attempt is always made
    #[must_use]
    pub fn with_write_retries(mut self, write_retries: u32) -> Self {
        self.write_retries = write_retries.max(1);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn agents(&self) -> &A {
        &self.agents
    }

    /// Creates a ticket in the `NEW` stage
    pub fn create(&self, request: NewTicket) -> Result<Ticket> {
        if is_blank(Some(request.description.as_str())) {
            return Err(DeskError::MissingDescription);
        }

        let ticket = self.store.put(Ticket::new(request.description, Utc::now()))?;
        tracing::info!("Created ticket {}", ticket.id);
        Ok(ticket)
    }

    /// Assigns a `NEW` ticket to an agent and moves it to `IN_PROGRESS`
    ///
    /// The ticket stage is checked before the agent is looked up, so a ticket
    /// in the wrong stage reports `InvalidStateTransition` even when the
    /// agent does not exist.
    pub fn assign(&self, ticket_id: &TicketId, agent_id: &AgentId) -> Result<Ticket> {
        self.assign_to(ticket_id, &AgentRef::Id(*agent_id))
    }

    /// Like [`TicketService::assign`], naming the agent by id or by name
    pub fn assign_to(&self, ticket_id: &TicketId, agent: &AgentRef) -> Result<Ticket> {
        let ticket = self.apply(ticket_id, |ticket| {
            if ticket.status != Status::New {
                return Err(DeskError::invalid_state(ONLY_NEW_CAN_BE_ASSIGNED));
            }

            let agent = self.resolve_agent(agent)?;
            ticket.assigned_agent = Some(agent);
            ticket.status = Status::InProgress;
            Ok(())
        })?;

        tracing::info!(
            "Assigned ticket {} to agent '{}'",
            ticket.id,
            ticket.assigned_agent_name().unwrap_or_default()
        );
        Ok(ticket)
    }

    /// Moves an `IN_PROGRESS` ticket to `RESOLVED`
    pub fn resolve(&self, ticket_id: &TicketId) -> Result<Ticket> {
        let ticket = self.apply(ticket_id, |ticket| {
            if ticket.status != Status::InProgress {
                return Err(DeskError::invalid_state(ONLY_IN_PROGRESS_CAN_BE_RESOLVED));
            }

            ticket.status = Status::Resolved;
            Ok(())
        })?;

        tracing::info!("Resolved ticket {}", ticket.id);
        Ok(ticket)
    }

    /// Moves a `RESOLVED` ticket with a resolution summary to `CLOSED`
    pub fn close(&self, ticket_id: &TicketId) -> Result<Ticket> {
        let ticket = self.apply(ticket_id, |ticket| {
            if ticket.status != Status::Resolved {
                return Err(DeskError::invalid_state(ONLY_RESOLVED_CAN_BE_CLOSED));
            }
            if is_blank(ticket.resolution_summary.as_deref()) {
                return Err(DeskError::MissingResolutionSummary);
            }

            ticket.status = Status::Closed;
            ticket.closed_at = Some(Utc::now());
            Ok(())
        })?;

        tracing::info!("Closed ticket {}", ticket.id);
        Ok(ticket)
    }

    /// Overwrites the provided fields of a ticket that is not closed
    pub fn update(&self, ticket_id: &TicketId, update: TicketUpdate) -> Result<Ticket> {
        let ticket = self.apply(ticket_id, |ticket| {
            if ticket.status.is_terminal() {
                return Err(DeskError::invalid_state(CLOSED_CANNOT_BE_UPDATED));
            }
            if let Some(description) = &update.description {
                ticket.description.clone_from(description);
            }
            if let Some(summary) = &update.resolution_summary {
                ticket.resolution_summary = Some(summary.clone());
            }
            Ok(())
        })?;

        tracing::info!("Updated ticket {}", ticket.id);
        Ok(ticket)
    }

    pub fn get_by_id(&self, ticket_id: &TicketId) -> Result<Ticket> {
        self.store.get(ticket_id)
    }

    /// Lists tickets matching the filter, ordered by id
    ///
    /// An inverted date range fails before the store is consulted.
    pub fn list(&self, filter: Option<&TicketFilter>) -> Result<Vec<Ticket>> {
        let predicates = PredicateSet::from_filter(filter)?;
        tracing::debug!("Scanning tickets with {} predicate(s)", predicates.len());

        let mut tickets = self.store.scan(&predicates)?;
        tickets.sort_by_key(|t| t.id);
        Ok(tickets)
    }

    fn resolve_agent(&self, agent: &AgentRef) -> Result<Agent> {
        tracing::debug!("Resolving agent {}", agent);
        match agent {
            AgentRef::Id(id) => self.agents.find_by_id(id),
            AgentRef::Name(name) => self.agents.find_by_name(name),
        }
    }

    /// Runs one read-validate-mutate-write unit, re-running it when the
    /// write loses a version race
    fn apply<F>(&self, ticket_id: &TicketId, mutate: F) -> Result<Ticket>
    where
        F: Fn(&mut Ticket) -> Result<()>,
    {
        let mut attempt = 1;
        loop {
            let mut ticket = self.store.get(ticket_id)?;
            mutate(&mut ticket)?;

            match self.store.put(ticket) {
                Err(DeskError::ConcurrentModification { id }) if attempt < self.write_retries => {
                    tracing::debug!(
                        "Write to ticket {} conflicted, retrying ({}/{})",
                        id,
                        attempt,
                        self.write_retries
                    );
                    attempt += 1;
                },
                Err(e @ DeskError::ConcurrentModification { .. }) => {
                    tracing::warn!(
                        "Giving up on ticket {} after {} conflicting writes",
                        ticket_id,
                        attempt
                    );
                    return Err(e);
                },
                result => return result,
            }
        }
    }
}
