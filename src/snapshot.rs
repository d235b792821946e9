//! Persistence Snapshot
//!
//! Serializable representation of all quest runtime state: per-objective
//! progress for active quests plus the set of completed quest ids. The JSON
//! field names are the stable version 1.0 save format.

use serde::{Deserialize, Serialize};

/// Progress record for one active quest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveQuestRecord {
    pub quest_id: i32,
    /// One counter per objective index, in definition order
    pub objective_progress: Vec<i32>,
}

/// Complete save state for the quest engine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestSnapshot {
    #[serde(default)]
    pub active_quests: Vec<ActiveQuestRecord>,
    #[serde(default)]
    pub completed_quest_ids: Vec<i32>,
}

impl QuestSnapshot {
    /// Serialize to JSON for storage
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Deserialize from stored JSON
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("Failed to parse snapshot: {}", e))
    }

    pub fn is_empty(&self) -> bool {
        self.active_quests.is_empty() && self.completed_quest_ids.is_empty()
    }
}
