//! Assignment strategy abstraction
//!
//! An orchestrating layer may try an alternative, best-effort assigner
//! (e.g. an ML-backed one) before the deterministic engine. Whatever the
//! strategy, its output must satisfy the one-to-one contract; the
//! orchestrator verifies it and falls back to the greedy engine on any
//! failure or violation. The engine's own output is never checked here --
//! it holds the invariant by construction.

use thiserror::Error;

use crate::core::engine::{EngineError, MatchEngine, MatchOutcome};
use crate::models::{Agent, Facility};

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("strategy failed: {0}")]
    Failed(String),
    #[error("one-to-one violation: agent {agent_id} holds more than one assignment")]
    OneToOneViolation { agent_id: i64 },
}

/// A pluggable assigner with the same output contract as the engine
pub trait AssignmentStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn propose(
        &self,
        agents: &[Agent],
        facilities: &[Facility],
    ) -> Result<MatchOutcome, StrategyError>;
}

impl AssignmentStrategy for MatchEngine {
    fn name(&self) -> &'static str {
        "greedy-nearest"
    }

    fn propose(
        &self,
        agents: &[Agent],
        facilities: &[Facility],
    ) -> Result<MatchOutcome, StrategyError> {
        self.run(agents, facilities)
            .map_err(|e| StrategyError::Failed(e.to_string()))
    }
}

/// Check the one-to-one contract on a proposed outcome
///
/// An agent id may appear on at most one facility, and no agent may hold
/// more than one facility id.
pub fn verify_one_to_one(outcome: &MatchOutcome) -> Result<(), StrategyError> {
    let mut seen: Vec<i64> = Vec::new();
    for facility in &outcome.facilities {
        if let Some(agent_id) = facility.assigned_agent_id {
            if seen.contains(&agent_id) {
                return Err(StrategyError::OneToOneViolation { agent_id });
            }
            seen.push(agent_id);
        }
    }

    for agent in &outcome.agents {
        if agent.assigned_facility_ids.len() > 1 {
            return Err(StrategyError::OneToOneViolation { agent_id: agent.id });
        }
    }

    Ok(())
}

/// Tries an optional primary strategy, falling back to the greedy engine
pub struct Orchestrator {
    primary: Option<Box<dyn AssignmentStrategy>>,
    engine: MatchEngine,
}

impl Orchestrator {
    pub fn new(engine: MatchEngine) -> Self {
        Self {
            primary: None,
            engine,
        }
    }

    pub fn with_primary(engine: MatchEngine, primary: Box<dyn AssignmentStrategy>) -> Self {
        Self {
            primary: Some(primary),
            engine,
        }
    }

    /// Produce an assignment outcome, never letting an unverified primary
    /// result through
    pub fn run(
        &self,
        agents: &[Agent],
        facilities: &[Facility],
    ) -> Result<MatchOutcome, EngineError> {
        if let Some(primary) = &self.primary {
            match primary.propose(agents, facilities) {
                Ok(outcome) => match verify_one_to_one(&outcome) {
                    Ok(()) => {
                        tracing::debug!("strategy '{}' accepted", primary.name());
                        return Ok(outcome);
                    }
                    Err(violation) => {
                        tracing::warn!(
                            "strategy '{}' violated the one-to-one contract ({}), falling back",
                            primary.name(),
                            violation
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!("strategy '{}' failed ({}), falling back", primary.name(), e);
                }
            }
        }

        self.engine.run(agents, facilities)
    }
}
