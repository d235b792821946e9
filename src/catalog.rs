//! Quest Catalog
//!
//! Indexes an already-parsed list of quest definitions by id. Entries with
//! non-positive or duplicate ids are skipped at build time with a diagnostic;
//! the catalog itself is immutable after construction.

use std::collections::HashMap;

use tracing::warn;

use crate::definition::QuestDef;

/// Immutable index of quest definitions
pub struct QuestCatalog {
    /// Accepted definitions, insertion order
    quests: Vec<QuestDef>,
    /// quest_id -> index into `quests`
    by_id: HashMap<i32, usize>,
}

impl QuestCatalog {
    /// Build a catalog from an ordered list of definitions.
    ///
    /// Rejected entries (non-positive or duplicate ids) are logged and
    /// skipped; the remaining catalog is still usable.
    pub fn build(definitions: Vec<QuestDef>) -> Self {
        let mut quests: Vec<QuestDef> = Vec::with_capacity(definitions.len());
        let mut by_id = HashMap::new();

        for def in definitions {
            if def.quest_id <= 0 {
                warn!("Skipping quest '{}': id {} is not positive", def.title, def.quest_id);
                continue;
            }
            if by_id.contains_key(&def.quest_id) {
                warn!("Skipping quest '{}': duplicate id {}", def.title, def.quest_id);
                continue;
            }
            by_id.insert(def.quest_id, quests.len());
            quests.push(def);
        }

        let catalog = Self { quests, by_id };
        catalog.validate_prereqs();
        catalog
    }

    /// Warn about prerequisite references that point outside the catalog.
    /// Dangling prereqs leave a quest permanently locked; they never reject
    /// the entry itself.
    pub fn validate_prereqs(&self) {
        for quest in &self.quests {
            for prereq_id in &quest.prereq_quest_ids {
                if !self.contains(*prereq_id) {
                    warn!(
                        "Quest {} references non-existent prerequisite quest {}",
                        quest.quest_id, prereq_id
                    );
                }
            }
        }
    }

    /// Get a quest definition by ID
    pub fn get(&self, quest_id: i32) -> Option<&QuestDef> {
        self.by_id.get(&quest_id).map(|&i| &self.quests[i])
    }

    pub fn contains(&self, quest_id: i32) -> bool {
        self.by_id.contains_key(&quest_id)
    }

    /// All accepted definitions, in insertion order
    pub fn all(&self) -> &[QuestDef] {
        &self.quests
    }

    /// Definitions offered by a specific NPC, regardless of runtime stage
    pub fn quests_for_npc(&self, npc_id: i32) -> Vec<&QuestDef> {
        self.quests.iter().filter(|q| q.start_npc_id == npc_id).collect()
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ActionType, Objective, Reward, StageText};

    fn def(quest_id: i32, start_npc_id: i32) -> QuestDef {
        QuestDef {
            quest_id,
            title: format!("Quest {}", quest_id),
            start_npc_id,
            end_npc_id: start_npc_id,
            prereq_quest_ids: Vec::new(),
            descriptions: StageText::default(),
            objectives: vec![Objective {
                action: ActionType::KillMonster,
                target_id: 100,
                required_count: 1,
                text: String::new(),
            }],
            reward: Reward::default(),
        }
    }

    #[test]
    fn test_build_skips_invalid_ids() {
        let catalog = QuestCatalog::build(vec![def(0, 1), def(-3, 1), def(5, 1)]);
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(5).is_some());
        assert!(catalog.get(0).is_none());
        assert!(catalog.get(-3).is_none());
    }

    #[test]
    fn test_build_skips_duplicate_ids() {
        let mut second = def(7, 2);
        second.title = "Imposter".to_string();
        let catalog = QuestCatalog::build(vec![def(7, 1), second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(7).unwrap().title, "Quest 7");
    }

    #[test]
    fn test_all_preserves_insertion_order() {
        let catalog = QuestCatalog::build(vec![def(3, 1), def(1, 1), def(2, 1)]);
        let ids: Vec<i32> = catalog.all().iter().map(|q| q.quest_id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_dangling_prereq_does_not_reject() {
        let mut gated = def(4, 1);
        gated.prereq_quest_ids = vec![999];
        let catalog = QuestCatalog::build(vec![gated]);
        assert!(catalog.get(4).is_some());
    }

    #[test]
    fn test_quests_for_npc() {
        let catalog = QuestCatalog::build(vec![def(1, 10), def(2, 11), def(3, 10)]);
        let offered = catalog.quests_for_npc(10);
        assert_eq!(offered.len(), 2);
        assert!(offered.iter().all(|q| q.start_npc_id == 10));
    }
}
