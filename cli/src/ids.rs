use anyhow::{anyhow, Result};
use plandate_core::Task;
use uuid::Uuid;

/// Resolves a full id or a unique prefix of one (as printed by `list`).
pub fn resolve_id(key: &str, tasks: &[Task]) -> Result<Uuid> {
    let key = key.trim().to_lowercase().replace('-', "");
    if key.is_empty() {
        return Err(anyhow!("task id is required"));
    }

    let matches: Vec<Uuid> = tasks
        .iter()
        .map(|t| t.id)
        .filter(|id| id.simple().to_string().starts_with(&key))
        .collect();

    match matches.len() {
        1 => Ok(matches[0]),
        0 => Err(anyhow!("no task matches id '{}'", key)),
        n => Err(anyhow!("id '{}' is ambiguous ({} tasks match)", key, n)),
    }
}
