//! Quest Progression Engine
//!
//! Embedded quest system: an immutable catalog of quest definitions, a
//! per-quest runtime state machine, event-driven objective progress with
//! NPC-gated accept/turn-in transactions, and a JSON save snapshot.
//!
//! A host loads definitions (its own way, or via [`loader`]), builds a
//! [`QuestCatalog`], and constructs a [`QuestEngine`] from it. Gameplay
//! systems feed [`ProgressEvent`]s in; UI and reward collaborators read the
//! query surface and subscribe for [`QuestNotification`]s.

pub mod catalog;
pub mod definition;
pub mod engine;
pub mod events;
pub mod loader;
pub mod snapshot;
pub mod state;

pub use catalog::QuestCatalog;
pub use definition::{ActionType, Objective, QuestDef, Reward, StageText};
pub use engine::QuestEngine;
pub use events::{ProgressEvent, QuestListener, QuestNotification};
pub use snapshot::{ActiveQuestRecord, QuestSnapshot};
pub use state::{QuestStage, QuestState};
