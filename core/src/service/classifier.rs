use chrono::{DateTime, FixedOffset};
use log::debug;

use crate::error::TaskError;
use crate::input::{require_text, strip_match, title_or_placeholder};
use crate::model::task::{Category, TaskDraft};
use crate::time::{now_reference, DateExtractor, DateOrder, NaturalDateExtractor};

/// Turns raw input into the classified fields of a task.
#[derive(Debug, Clone)]
pub struct TaskClassifier<E: DateExtractor = NaturalDateExtractor> {
    extractor: E,
    order: DateOrder,
}

impl TaskClassifier<NaturalDateExtractor> {
    pub fn new(order: DateOrder) -> Self {
        Self::with_extractor(NaturalDateExtractor, order)
    }
}

impl Default for TaskClassifier<NaturalDateExtractor> {
    fn default() -> Self {
        Self::new(DateOrder::default())
    }
}

impl<E: DateExtractor> TaskClassifier<E> {
    pub fn with_extractor(extractor: E, order: DateOrder) -> Self {
        Self { extractor, order }
    }

    /// Chores are taken verbatim. Scheduled text has its first date phrase
    /// pulled out; when none is found the task stays scheduled, undated.
    /// `reference` defaults to the current local instant.
    pub fn classify(
        &self,
        text: &str,
        category: Category,
        reference: Option<DateTime<FixedOffset>>,
    ) -> Result<TaskDraft, TaskError> {
        let text = require_text(text)?;
        let original_text = text.trim().to_string();

        let draft = match category {
            Category::Chore => TaskDraft {
                category,
                title: original_text.clone(),
                date: None,
                original_text,
            },
            Category::Scheduled => {
                let reference = reference.unwrap_or_else(now_reference);
                let found = self.extractor.extract(text, reference, self.order);
                TaskDraft {
                    category,
                    title: title_or_placeholder(strip_match(text, found.as_ref())),
                    date: found.map(|m| m.date),
                    original_text,
                }
            }
        };

        debug!(
            "classified {:?} as {} (date: {:?}, title: {:?})",
            draft.original_text, draft.category, draft.date, draft.title
        );
        Ok(draft)
    }
}
