//! The data collector: append-only model- and agent-level series.
//!
//! Every step contributes one [`ModelRecord`] and one [`AgentRecord`] per
//! agent, in `AgentId` order.  Steps are recorded contiguously from
//! [`Step::ZERO`], so records are addressed by arithmetic rather than lookup.
//! Nothing is ever rewritten.

use ev_core::{AgentId, NodeId, Step};

/// Aggregate state at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRecord {
    pub step:      Step,
    /// Agents on the target node.
    pub evacuated: usize,
}

/// One agent's state at the start of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentRecord {
    pub step:      Step,
    pub agent:     AgentId,
    pub position:  NodeId,
    pub at_target: bool,
}

// ── TimeSeries ────────────────────────────────────────────────────────────────

/// The agent-level series, keyed by `(step, agent)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    agent_count: usize,
    records:     Vec<AgentRecord>,
}

impl TimeSeries {
    pub(crate) fn new(agent_count: usize) -> Self {
        Self { agent_count, records: Vec::new() }
    }

    pub fn agent_count(&self) -> usize {
        self.agent_count
    }

    /// Number of recorded steps.
    pub fn step_count(&self) -> usize {
        self.records.len().checked_div(self.agent_count).unwrap_or(0)
    }

    /// Recorded step indices, ascending.
    pub fn steps(&self) -> impl Iterator<Item = Step> + '_ {
        (0..self.step_count() as u64).map(Step)
    }

    /// Total number of `(step, agent)` records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, step: Step, agent: AgentId) -> Option<&AgentRecord> {
        if agent.index() >= self.agent_count {
            return None;
        }
        self.records.get(step.index() * self.agent_count + agent.index())
    }

    /// Every agent's record for `step`, in `AgentId` order (empty if the
    /// step was not recorded).
    pub fn at_step(&self, step: Step) -> &[AgentRecord] {
        let start = step.index().saturating_mul(self.agent_count);
        self.records.get(start..start.saturating_add(self.agent_count)).unwrap_or(&[])
    }

    /// One agent's records across all steps, in step order.
    pub fn for_agent(&self, agent: AgentId) -> impl Iterator<Item = &AgentRecord> + '_ {
        let n = self.agent_count.max(1);
        let skip = if agent.index() < self.agent_count { agent.index() } else { self.records.len() };
        self.records.iter().skip(skip).step_by(n)
    }

    /// All records, step-major then `AgentId`.
    pub fn records(&self) -> &[AgentRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AgentRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a AgentRecord;
    type IntoIter = std::slice::Iter<'a, AgentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ── DataCollector ─────────────────────────────────────────────────────────────

/// Owns both series for a run.  Read-only outside this crate.
#[derive(Debug, Clone, Default)]
pub struct DataCollector {
    model:  Vec<ModelRecord>,
    agents: TimeSeries,
}

impl DataCollector {
    pub(crate) fn new(agent_count: usize) -> Self {
        Self { model: Vec::new(), agents: TimeSeries::new(agent_count) }
    }

    /// Record `step`.  `positions` must list every agent in `AgentId` order.
    pub(crate) fn collect<I>(&mut self, step: Step, target: NodeId, positions: I)
    where
        I: IntoIterator<Item = (AgentId, NodeId)>,
    {
        debug_assert_eq!(step.index(), self.model.len(), "steps must be recorded in order");
        let before = self.agents.records.len();
        self.agents.records.extend(positions.into_iter().map(|(agent, position)| AgentRecord {
            step,
            agent,
            position,
            at_target: position == target,
        }));
        debug_assert_eq!(self.agents.records.len() - before, self.agents.agent_count);

        let evacuated = self.agents.records[before..].iter().filter(|r| r.at_target).count();
        self.model.push(ModelRecord { step, evacuated });
    }

    /// One value per recorded step.
    pub fn model_series(&self) -> &[ModelRecord] {
        &self.model
    }

    pub fn agent_series(&self) -> &TimeSeries {
        &self.agents
    }

    /// The records of the most recent step, if any.
    pub fn latest(&self) -> Option<(&ModelRecord, &[AgentRecord])> {
        let model = self.model.last()?;
        Some((model, self.agents.at_step(model.step)))
    }
}
