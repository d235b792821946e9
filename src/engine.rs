//! Quest Engine
//!
//! The stateful service: owns one QuestState per catalog entry, derives the
//! visible stage for each quest, applies progress events, and executes the
//! accept and turn-in transactions. Every operation is synchronous and total;
//! bad caller input is a rejected no-op, never an error.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::catalog::QuestCatalog;
use crate::definition::QuestDef;
use crate::events::{ProgressEvent, QuestListener, QuestNotification};
use crate::snapshot::{ActiveQuestRecord, QuestSnapshot};
use crate::state::{QuestStage, QuestState};

pub struct QuestEngine {
    /// Shared, read-only definition index
    catalog: Arc<QuestCatalog>,
    /// Exclusively owned runtime state, one entry per catalog quest
    states: HashMap<i32, QuestState>,
    /// Subscribed observers, notified inline after each transaction
    listeners: Vec<Box<dyn QuestListener>>,
}

impl QuestEngine {
    pub fn new(catalog: Arc<QuestCatalog>) -> Self {
        let states = catalog
            .all()
            .iter()
            .map(|def| (def.quest_id, QuestState::new(def.objectives.len())))
            .collect();
        Self {
            catalog,
            states,
            listeners: Vec::new(),
        }
    }

    /// Construct an engine and immediately restore a saved snapshot into it
    pub fn with_snapshot(catalog: Arc<QuestCatalog>, snapshot: &QuestSnapshot) -> Self {
        let mut engine = Self::new(catalog);
        engine.load_snapshot(snapshot);
        engine
    }

    /// Register an observer for change notifications
    pub fn subscribe(&mut self, listener: Box<dyn QuestListener>) {
        self.listeners.push(listener);
    }

    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    /// Definition lookup passthrough for UI collaborators
    pub fn definition(&self, quest_id: i32) -> Option<&QuestDef> {
        self.catalog.get(quest_id)
    }

    // ========================================================================
    // Stage derivation
    // ========================================================================

    /// Derive the visible stage for a quest. Recomputed on every call, never
    /// cached. Unknown quest ids derive to Locked.
    pub fn stage(&self, quest_id: i32) -> QuestStage {
        let Some(def) = self.catalog.get(quest_id) else {
            return QuestStage::Locked;
        };
        let Some(state) = self.states.get(&quest_id) else {
            return QuestStage::Locked;
        };

        if state.completed {
            return QuestStage::Completed;
        }
        if state.ready_to_turn_in {
            return QuestStage::ReadyToTurnIn;
        }
        if state.accepted {
            return QuestStage::InProgress;
        }

        let unlocked = def
            .prereq_quest_ids
            .iter()
            .all(|id| self.states.get(id).map(|s| s.completed).unwrap_or(false));
        if unlocked {
            QuestStage::Available
        } else {
            QuestStage::Locked
        }
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Accept a quest. Succeeds only when the stage is exactly Available;
    /// any other stage (or an unknown id) is a rejected no-op.
    pub fn try_accept(&mut self, quest_id: i32) -> bool {
        if self.stage(quest_id) != QuestStage::Available {
            return false;
        }
        let Some(state) = self.states.get_mut(&quest_id) else {
            return false;
        };
        state.begin();
        info!("Quest {} accepted", quest_id);
        self.emit(QuestNotification::Accepted { quest_id });
        true
    }

    /// Apply a progress event to every in-flight quest. A single event may
    /// advance several quests at once. Returns the notifications raised,
    /// which are also delivered to subscribed listeners.
    pub fn submit_event(&mut self, event: &ProgressEvent) -> Vec<QuestNotification> {
        let catalog = Arc::clone(&self.catalog);
        let amount = event.count.max(1);

        // Iterate a stable snapshot of in-flight ids, not the live table:
        // listeners reacting to these notifications may start new quests.
        let in_flight: Vec<i32> = catalog
            .all()
            .iter()
            .map(|def| def.quest_id)
            .filter(|id| self.states.get(id).map(|s| s.in_flight()).unwrap_or(false))
            .collect();

        let mut raised = Vec::new();
        for quest_id in in_flight {
            let Some(def) = catalog.get(quest_id) else {
                continue;
            };
            let Some(state) = self.states.get_mut(&quest_id) else {
                continue;
            };

            let mut changed = false;
            for (index, objective) in def.objectives.iter().enumerate() {
                if objective.matches(event.action, event.target_id) {
                    changed |= state.add_progress(index, amount, objective.required());
                }
            }
            if !changed {
                continue;
            }

            debug!("Quest {} progress on {:?} target {}", quest_id, event.action, event.target_id);
            raised.push(QuestNotification::ProgressChanged { quest_id });

            if state.objectives_satisfied(&def.objectives) {
                state.ready_to_turn_in = true;
                info!("Quest {} is ready to turn in", quest_id);
                raised.push(QuestNotification::ReadyToTurnIn { quest_id });
            }
        }

        for notification in &raised {
            self.dispatch(notification);
        }
        raised
    }

    /// Whether a quest can be turned in at the given NPC right now
    pub fn can_turn_in(&self, quest_id: i32, npc_id: i32) -> bool {
        let Some(def) = self.catalog.get(quest_id) else {
            return false;
        };
        def.end_npc_id == npc_id && self.stage(quest_id) == QuestStage::ReadyToTurnIn
    }

    /// Finalize a ready quest at its end NPC. Signals the reward payload
    /// exactly once; granting it is the subscriber's responsibility.
    pub fn try_turn_in(&mut self, quest_id: i32, npc_id: i32) -> bool {
        if !self.can_turn_in(quest_id, npc_id) {
            return false;
        }
        let reward = match self.catalog.get(quest_id) {
            Some(def) => def.reward.clone(),
            None => return false,
        };
        let Some(state) = self.states.get_mut(&quest_id) else {
            return false;
        };
        state.completed = true;
        state.ready_to_turn_in = false;
        info!("Quest {} turned in at npc {}", quest_id, npc_id);
        self.emit(QuestNotification::Rewarded { quest_id, reward });
        self.emit(QuestNotification::Completed { quest_id });
        true
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Progress counter for one objective. Unknown quests and out-of-range
    /// indices read as 0, never an error.
    pub fn objective_count(&self, quest_id: i32, index: usize) -> i32 {
        self.states.get(&quest_id).map(|s| s.count(index)).unwrap_or(0)
    }

    /// Quests currently offered (stage Available) by a specific NPC
    pub fn quests_offered_by(&self, npc_id: i32) -> Vec<&QuestDef> {
        self.catalog
            .all()
            .iter()
            .filter(|def| {
                def.start_npc_id == npc_id && self.stage(def.quest_id) == QuestStage::Available
            })
            .collect()
    }

    /// Quests that can be turned in at a specific NPC
    pub fn turn_ins_for(&self, npc_id: i32) -> Vec<&QuestDef> {
        self.catalog
            .all()
            .iter()
            .filter(|def| {
                def.end_npc_id == npc_id && self.stage(def.quest_id) == QuestStage::ReadyToTurnIn
            })
            .collect()
    }

    /// All quests that are in progress or ready to turn in
    pub fn active_quests(&self) -> Vec<&QuestDef> {
        self.catalog
            .all()
            .iter()
            .filter(|def| {
                matches!(
                    self.stage(def.quest_id),
                    QuestStage::InProgress | QuestStage::ReadyToTurnIn
                )
            })
            .collect()
    }

    /// Active quests that start or end at the given NPC
    pub fn active_for_npc(&self, npc_id: i32) -> Vec<&QuestDef> {
        self.active_quests()
            .into_iter()
            .filter(|def| def.start_npc_id == npc_id || def.end_npc_id == npc_id)
            .collect()
    }

    /// Narrative text matching the quest's current stage
    pub fn description(&self, quest_id: i32) -> Option<&str> {
        let def = self.catalog.get(quest_id)?;
        let text = match self.stage(quest_id) {
            QuestStage::Completed => &def.descriptions.finished,
            QuestStage::InProgress | QuestStage::ReadyToTurnIn => &def.descriptions.in_progress,
            QuestStage::Locked | QuestStage::Available => &def.descriptions.available,
        };
        Some(text.as_str())
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Capture all runtime state into a serializable snapshot. Counters are
    /// clamped to the definition's current objective shape first, so a save
    /// stays loadable after the catalog changes between versions.
    pub fn build_snapshot(&self) -> QuestSnapshot {
        let mut snapshot = QuestSnapshot::default();
        for def in self.catalog.all() {
            let Some(state) = self.states.get(&def.quest_id) else {
                continue;
            };
            if state.completed {
                snapshot.completed_quest_ids.push(def.quest_id);
            } else if state.is_active() {
                let mut fitted = state.clone();
                fitted.clamp_to(&def.objectives);
                snapshot.active_quests.push(ActiveQuestRecord {
                    quest_id: def.quest_id,
                    objective_progress: fitted.counts,
                });
            }
        }
        snapshot
    }

    /// Replace all runtime state with the snapshot's contents. Completed ids
    /// are applied first and win over active records for the same quest.
    /// Ids absent from the catalog are dropped silently. Readiness is
    /// recomputed from the restored counters; no notifications are raised.
    pub fn load_snapshot(&mut self, snapshot: &QuestSnapshot) {
        let catalog = Arc::clone(&self.catalog);
        self.states = catalog
            .all()
            .iter()
            .map(|def| (def.quest_id, QuestState::new(def.objectives.len())))
            .collect();

        let mut completed = 0usize;
        for quest_id in &snapshot.completed_quest_ids {
            match self.states.get_mut(quest_id) {
                Some(state) => {
                    state.completed = true;
                    completed += 1;
                }
                None => debug!("Dropping completed quest {}: not in catalog", quest_id),
            }
        }

        let mut active = 0usize;
        for record in &snapshot.active_quests {
            let Some(def) = catalog.get(record.quest_id) else {
                debug!("Dropping active quest {}: not in catalog", record.quest_id);
                continue;
            };
            let Some(state) = self.states.get_mut(&record.quest_id) else {
                continue;
            };
            if state.completed {
                continue;
            }
            state.accepted = true;
            state.counts = record.objective_progress.clone();
            state.clamp_to(&def.objectives);
            state.ready_to_turn_in = state.objectives_satisfied(&def.objectives);
            active += 1;
        }

        info!("Restored {} active and {} completed quests", active, completed);
    }

    // ========================================================================
    // Notification delivery
    // ========================================================================

    fn emit(&mut self, notification: QuestNotification) {
        self.dispatch(&notification);
    }

    fn dispatch(&mut self, notification: &QuestNotification) {
        for listener in &mut self.listeners {
            listener.on_quest_event(notification);
        }
    }
}
