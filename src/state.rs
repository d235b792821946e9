//! Quest State Tracking
//!
//! Per-quest runtime record: lifecycle flags plus one progress counter per
//! objective index. The externally visible stage is derived from this state
//! by the engine, never stored.

use serde::{Deserialize, Serialize};

use crate::definition::Objective;

/// Derived lifecycle position of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStage {
    /// Prerequisites not yet met (or quest unknown)
    Locked,
    /// Quest can be accepted
    Available,
    /// Quest is active and in progress
    InProgress,
    /// All objectives complete, ready to turn in
    ReadyToTurnIn,
    /// Quest has been turned in
    Completed,
}

impl QuestStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestStage::Locked => "locked",
            QuestStage::Available => "available",
            QuestStage::InProgress => "in_progress",
            QuestStage::ReadyToTurnIn => "ready_to_turn_in",
            QuestStage::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "locked" => Some(QuestStage::Locked),
            "available" => Some(QuestStage::Available),
            "in_progress" => Some(QuestStage::InProgress),
            "ready_to_turn_in" => Some(QuestStage::ReadyToTurnIn),
            "completed" => Some(QuestStage::Completed),
            _ => None,
        }
    }
}

/// Mutable runtime state for a single quest
#[derive(Debug, Clone, Default)]
pub struct QuestState {
    pub accepted: bool,
    pub ready_to_turn_in: bool,
    pub completed: bool,
    /// One counter per objective index, clamped to [0, required]
    pub counts: Vec<i32>,
}

impl QuestState {
    pub fn new(objective_count: usize) -> Self {
        Self {
            accepted: false,
            ready_to_turn_in: false,
            completed: false,
            counts: vec![0; objective_count],
        }
    }

    /// Reset into the freshly-accepted configuration
    pub fn begin(&mut self) {
        self.accepted = true;
        self.ready_to_turn_in = false;
        for count in &mut self.counts {
            *count = 0;
        }
    }

    /// Progress counter for an objective index, 0 when out of range
    pub fn count(&self, index: usize) -> i32 {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Add progress to one objective, clamped to [0, required].
    /// Returns true if the stored count actually changed.
    pub fn add_progress(&mut self, index: usize, amount: i32, required: i32) -> bool {
        let Some(slot) = self.counts.get_mut(index) else {
            return false;
        };
        let next = (*slot + amount).clamp(0, required);
        if next == *slot {
            return false;
        }
        *slot = next;
        true
    }

    /// Whether every objective has reached its required count
    pub fn objectives_satisfied(&self, objectives: &[Objective]) -> bool {
        objectives
            .iter()
            .enumerate()
            .all(|(index, objective)| self.count(index) >= objective.required())
    }

    /// Accepted and still collecting progress
    pub fn in_flight(&self) -> bool {
        self.accepted && !self.completed && !self.ready_to_turn_in
    }

    /// Accepted or ready, not yet turned in
    pub fn is_active(&self) -> bool {
        (self.accepted || self.ready_to_turn_in) && !self.completed
    }

    /// Fit counters to the given objective shape: resize to the objective
    /// count and clamp each entry. Tolerates catalog changes between saves.
    pub fn clamp_to(&mut self, objectives: &[Objective]) {
        self.counts.resize(objectives.len(), 0);
        for (index, objective) in objectives.iter().enumerate() {
            self.counts[index] = self.counts[index].clamp(0, objective.required());
        }
    }
}
