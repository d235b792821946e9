//! Quest Definition Loader
//!
//! Optional convenience for hosts that author quests as TOML files: walks a
//! data directory, parses each file, and hands the resolved definitions to
//! the catalog. Files that fail to read, parse, or resolve are skipped with
//! a diagnostic so one bad file never takes down the whole load.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::definition::{QuestDef, RawQuestFile};

/// Load all quest definitions under a directory (recursive). A missing
/// directory yields an empty list, not an error.
pub fn load_dir(dir: &Path) -> Result<Vec<QuestDef>, String> {
    if !dir.exists() {
        warn!("Quest directory does not exist: {:?}", dir);
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    collect_toml_files(dir, &mut paths)?;
    // Directory walk order is platform-dependent; sort for a stable catalog
    paths.sort();

    let mut defs = Vec::new();
    for path in paths {
        match load_file(&path) {
            Ok(def) => {
                info!("Loaded quest: {} ({})", def.title, def.quest_id);
                defs.push(def);
            }
            Err(e) => warn!("Failed to load quest {:?}: {}", path, e),
        }
    }

    info!("Loaded {} quest definitions", defs.len());
    Ok(defs)
}

/// Load a single quest definition file
pub fn load_file(path: &Path) -> Result<QuestDef, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {:?}: {}", path, e))?;

    let raw: RawQuestFile = toml::from_str(&content)
        .map_err(|e| format!("Failed to parse {:?}: {}", path, e))?;

    QuestDef::from_raw(&raw.quest)
}

fn collect_toml_files(dir: &Path, paths: &mut Vec<PathBuf>) -> Result<(), String> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read directory {:?}: {}", dir, e))?;

    for entry in entries {
        let entry = entry.map_err(|e| format!("Failed to read entry: {}", e))?;
        let path = entry.path();

        if path.is_dir() {
            collect_toml_files(&path, paths)?;
        } else if path.extension().map_or(false, |ext| ext == "toml") {
            paths.push(path);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::QuestCatalog;
    use crate::definition::ActionType;
    use tempfile::TempDir;

    fn create_test_quest_toml() -> &'static str {
        r#"
[quest]
id = 1
title = "First Hunt"
start_npc = 10
end_npc = 11

[quest.descriptions]
available = "The slimes are getting bold."
in_progress = "Keep at it."
finished = "Well done."

[[quest.objectives]]
type = "kill_monster"
target = 101
count = 3
text = "Kill 3 slimes"

[quest.reward]
tokens = 50
items = [5]
"#
    }

    #[test]
    fn test_load_quest_dir() {
        let temp_dir = TempDir::new().unwrap();
        let quest_dir = temp_dir.path().join("quests");
        std::fs::create_dir_all(&quest_dir).unwrap();
        std::fs::write(quest_dir.join("first_hunt.toml"), create_test_quest_toml()).unwrap();

        let defs = load_dir(temp_dir.path()).unwrap();
        assert_eq!(defs.len(), 1);

        let quest = &defs[0];
        assert_eq!(quest.quest_id, 1);
        assert_eq!(quest.title, "First Hunt");
        assert_eq!(quest.start_npc_id, 10);
        assert_eq!(quest.end_npc_id, 11);
        assert_eq!(quest.objectives.len(), 1);
        assert_eq!(quest.objectives[0].action, ActionType::KillMonster);
        assert_eq!(quest.objectives[0].target_id, 101);
        assert_eq!(quest.objectives[0].required_count, 3);
        assert_eq!(quest.reward.tokens, 50);
        assert_eq!(quest.reward.reward_item_ids, vec![5]);

        let catalog = QuestCatalog::build(defs);
        assert!(catalog.get(1).is_some());
    }

    #[test]
    fn test_bad_file_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("good.toml"), create_test_quest_toml()).unwrap();
        std::fs::write(temp_dir.path().join("bad.toml"), "this is not a quest").unwrap();

        let defs = load_dir(temp_dir.path()).unwrap();
        assert_eq!(defs.len(), 1);
    }

    #[test]
    fn test_missing_directory_yields_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let defs = load_dir(&temp_dir.path().join("nope")).unwrap();
        assert!(defs.is_empty());
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("minimal.toml"),
            r#"
[quest]
id = 2
title = "Errand"
start_npc = 1
end_npc = 1

[[quest.objectives]]
type = "talk_to"
target = 9
"#,
        )
        .unwrap();

        let defs = load_dir(temp_dir.path()).unwrap();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].objectives[0].required_count, 1);
        assert_eq!(defs[0].reward.tokens, 0);
        assert!(defs[0].prereq_quest_ids.is_empty());
    }
}
