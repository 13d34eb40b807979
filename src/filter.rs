//! Translation of a [`TicketFilter`] into the predicate set handed to a
//! store scan.

use crate::core::{Status, Ticket, TicketFilter, is_blank};
use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// A single condition over ticket fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    StatusIn(BTreeSet<Status>),
    CreatedOnOrAfter(DateTime<Utc>),
    CreatedOnOrBefore(DateTime<Utc>),
    /// Tickets without an assigned agent never match
    AssignedAgentNamed(String),
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        match self {
            Self::StatusIn(statuses) => statuses.contains(&ticket.status),
            Self::CreatedOnOrAfter(start) => ticket.created_at >= *start,
            Self::CreatedOnOrBefore(end) => ticket.created_at <= *end,
            Self::AssignedAgentNamed(name) => ticket.assigned_agent_name() == Some(name.as_str()),
        }
    }
}

/// Conjunction of predicates; the empty set matches every ticket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
}

impl PredicateSet {
    /// Builds the predicate set for an optional filter request
    ///
    /// Fails with [`DeskError::InvalidDateRange`] when both bounds are given
    /// and the start lies after the end; no predicate is built in that case.
    pub fn from_filter(filter: Option<&TicketFilter>) -> Result<Self> {
        let Some(filter) = filter else {
            return Ok(Self::default());
        };

        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(DeskError::InvalidDateRange { start, end });
            }
        }

        let mut predicates = Vec::new();

        if let Some(statuses) = filter.statuses.as_ref().filter(|s| !s.is_empty()) {
            predicates.push(Predicate::StatusIn(statuses.iter().copied().collect()));
        }

        if let Some(start) = filter.start_date {
            predicates.push(Predicate::CreatedOnOrAfter(start));
        }

        if let Some(end) = filter.end_date {
            predicates.push(Predicate::CreatedOnOrBefore(end));
        }

        if let Some(name) = filter
            .assigned_agent_name
            .as_deref()
            .filter(|name| !is_blank(Some(*name)))
        {
            predicates.push(Predicate::AssignedAgentNamed(name.to_string()));
        }

        Ok(Self { predicates })
    }

    #[must_use]
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.predicates.iter().all(|p| p.matches(ticket))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }
}
