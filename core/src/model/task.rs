use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Chore,
    Scheduled,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Chore => write!(f, "chore"),
            Category::Scheduled => write!(f, "scheduled"),
        }
    }
}

impl FromStr for Category {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "c" | "chore" => Ok(Category::Chore),
            "s" | "sched" | "scheduled" => Ok(Category::Scheduled),
            other => Err(TaskError::invalid(format!("unknown category '{}'", other))),
        }
    }
}

/// Classified fields of a task before the store has given it an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub category: Category,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub original_text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: Uuid,
    pub category: Category,
    pub title: String,

    // Calendar day only. Chores never carry one.
    pub date: Option<NaiveDate>,

    pub original_text: String,
    #[serde(default)]
    pub done: bool,

    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn from_draft(id: Uuid, draft: TaskDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            category: draft.category,
            title: draft.title,
            date: draft.date,
            original_text: draft.original_text,
            done: false,
            created_at,
            updated_at: None,
        }
    }

    /// Replaces the derived fields with a fresh classification.
    /// `original_text` keeps the text the task was created from.
    pub fn reclassify(&mut self, draft: TaskDraft) {
        self.category = draft.category;
        self.title = draft.title;
        self.date = draft.date;
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }

    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }
}
