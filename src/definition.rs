//! Quest Definition Structures
//!
//! These structures are deserialized from TOML quest files.

use serde::{Deserialize, Serialize};

/// A quest definition file as loaded from disk
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuestFile {
    pub quest: RawQuest,
}

/// Raw quest data as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawQuest {
    pub id: i32,
    pub title: String,
    /// NPC that offers this quest
    pub start_npc: i32,
    /// NPC that accepts the turn-in
    pub end_npc: i32,
    /// Quests that must be completed before this one unlocks
    #[serde(default)]
    pub prereq_quests: Vec<i32>,
    /// Narrative text per stage
    #[serde(default)]
    pub descriptions: RawDescriptions,
    /// Quest objectives
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
    /// Quest reward
    #[serde(default)]
    pub reward: Option<RawReward>,
}

/// Narrative text keyed by stage, as it appears in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDescriptions {
    #[serde(default)]
    pub available: String,
    #[serde(default)]
    pub in_progress: String,
    #[serde(default)]
    pub finished: String,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    #[serde(rename = "type")]
    pub action: String,
    /// Target entity/item/npc/location ID
    pub target: i32,
    #[serde(default = "default_count")]
    pub count: i32,
    #[serde(default)]
    pub text: String,
}

fn default_count() -> i32 {
    1
}

/// Raw reward as it appears in TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawReward {
    #[serde(default)]
    pub tokens: i32,
    #[serde(default)]
    pub items: Vec<i32>,
}

// ============================================================================
// Resolved Quest Structures (after parsing)
// ============================================================================

/// Action kinds that objectives can match against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    /// Kill X monsters of type Y
    KillMonster,
    /// Collect X items of type Y
    CollectItem,
    /// Talk to a specific NPC
    TalkTo,
    /// Reach a specific location
    ReachLocation,
}

impl ActionType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "kill_monster" | "kill" => Some(ActionType::KillMonster),
            "collect_item" | "collect" => Some(ActionType::CollectItem),
            "talk_to" | "talk" => Some(ActionType::TalkTo),
            "reach_location" | "reach" | "location" => Some(ActionType::ReachLocation),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::KillMonster => "kill_monster",
            ActionType::CollectItem => "collect_item",
            ActionType::TalkTo => "talk_to",
            ActionType::ReachLocation => "reach_location",
        }
    }
}

/// A resolved quest objective
#[derive(Debug, Clone, Serialize)]
pub struct Objective {
    pub action: ActionType,
    /// Target entity/item/npc/location ID
    pub target_id: i32,
    /// Number required (1 for talk_to, reach_location)
    pub required_count: i32,
    /// Display description
    pub text: String,
}

impl Objective {
    pub fn from_raw(raw: &RawObjective) -> Option<Self> {
        let action = ActionType::from_str(&raw.action)?;
        Some(Self {
            action,
            target_id: raw.target,
            required_count: raw.count,
            text: raw.text.clone(),
        })
    }

    /// Required count, never below 1 regardless of authored data
    pub fn required(&self) -> i32 {
        self.required_count.max(1)
    }

    pub fn matches(&self, action: ActionType, target_id: i32) -> bool {
        self.action == action && self.target_id == target_id
    }
}

/// Quest reward payload, signaled on turn-in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub tokens: i32,
    pub reward_item_ids: Vec<i32>,
}

impl Reward {
    pub fn from_raw(raw: &RawReward) -> Self {
        Self {
            tokens: raw.tokens.max(0),
            reward_item_ids: raw.items.clone(),
        }
    }
}

/// Narrative text keyed by stage
#[derive(Debug, Clone, Default, Serialize)]
pub struct StageText {
    /// Shown while the quest is offered but not yet accepted
    pub available: String,
    /// Shown while the quest is underway
    pub in_progress: String,
    /// Shown once the quest has been completed
    pub finished: String,
}

impl StageText {
    pub fn from_raw(raw: &RawDescriptions) -> Self {
        Self {
            available: raw.available.clone(),
            in_progress: raw.in_progress.clone(),
            finished: raw.finished.clone(),
        }
    }
}

/// A fully resolved quest definition
#[derive(Debug, Clone)]
pub struct QuestDef {
    pub quest_id: i32,
    pub title: String,
    /// NPC entity ID that offers this quest
    pub start_npc_id: i32,
    /// NPC entity ID that accepts the turn-in
    pub end_npc_id: i32,
    /// Quests that must all be completed before this one unlocks
    pub prereq_quest_ids: Vec<i32>,
    /// Narrative text per stage
    pub descriptions: StageText,
    /// Quest objectives
    pub objectives: Vec<Objective>,
    /// Quest reward
    pub reward: Reward,
}

impl QuestDef {
    /// Create a QuestDef from raw TOML data
    pub fn from_raw(raw: &RawQuest) -> Result<Self, String> {
        let objectives: Vec<Objective> = raw
            .objectives
            .iter()
            .enumerate()
            .map(|(i, o)| {
                Objective::from_raw(o)
                    .ok_or_else(|| format!("Invalid objective type '{}' at index {}", o.action, i))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if objectives.is_empty() {
            return Err(format!("Quest {} has no objectives", raw.id));
        }

        Ok(Self {
            quest_id: raw.id,
            title: raw.title.clone(),
            start_npc_id: raw.start_npc,
            end_npc_id: raw.end_npc,
            prereq_quest_ids: raw.prereq_quests.clone(),
            descriptions: StageText::from_raw(&raw.descriptions),
            objectives,
            reward: raw.reward.as_ref().map(Reward::from_raw).unwrap_or_default(),
        })
    }

    /// Get objective by index
    pub fn objective(&self, index: usize) -> Option<&Objective> {
        self.objectives.get(index)
    }

    /// Check whether this quest has prerequisites at all
    pub fn has_prereqs(&self) -> bool {
        !self.prereq_quest_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_parsing() {
        assert_eq!(ActionType::from_str("kill_monster"), Some(ActionType::KillMonster));
        assert_eq!(ActionType::from_str("collect_item"), Some(ActionType::CollectItem));
        assert_eq!(ActionType::from_str("talk_to"), Some(ActionType::TalkTo));
        assert_eq!(ActionType::from_str("reach_location"), Some(ActionType::ReachLocation));
        assert_eq!(ActionType::from_str("invalid"), None);
    }

    #[test]
    fn test_from_raw_rejects_unknown_objective_type() {
        let raw = RawQuest {
            id: 1,
            title: "Broken".to_string(),
            start_npc: 10,
            end_npc: 11,
            prereq_quests: Vec::new(),
            descriptions: RawDescriptions::default(),
            objectives: vec![RawObjective {
                action: "dance".to_string(),
                target: 5,
                count: 1,
                text: String::new(),
            }],
            reward: None,
        };
        assert!(QuestDef::from_raw(&raw).is_err());
    }

    #[test]
    fn test_from_raw_rejects_empty_objectives() {
        let raw = RawQuest {
            id: 2,
            title: "Empty".to_string(),
            start_npc: 10,
            end_npc: 11,
            prereq_quests: Vec::new(),
            descriptions: RawDescriptions::default(),
            objectives: Vec::new(),
            reward: None,
        };
        assert!(QuestDef::from_raw(&raw).is_err());
    }

    #[test]
    fn test_required_count_clamped_to_one() {
        let objective = Objective {
            action: ActionType::TalkTo,
            target_id: 7,
            required_count: 0,
            text: String::new(),
        };
        assert_eq!(objective.required(), 1);
    }
}
