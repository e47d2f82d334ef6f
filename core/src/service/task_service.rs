use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use log::{info, warn};
use uuid::Uuid;

use crate::error::TaskError;
use crate::input::require_text;
use crate::model::task::{Category, Task};
use crate::repository::TaskRepository;
use crate::service::calendar::build_month;
use crate::service::classifier::TaskClassifier;
use crate::service::dto::{MonthGrid, WeekGroup};
use crate::service::grouping::group_by_week;
use crate::service::ordering::{sort_chores, sort_tasks, ChoreSort};
use crate::time::{DateExtractor, NaturalDateExtractor};

/// Fields an edit may touch. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub text: Option<String>,
    pub category: Option<Category>,
    pub date: Option<NaiveDate>,
    pub done: Option<bool>,
}

pub struct TaskService<R: TaskRepository, E: DateExtractor = NaturalDateExtractor> {
    repo: R,
    classifier: TaskClassifier<E>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self::with_classifier(repo, TaskClassifier::default())
    }
}

impl<R: TaskRepository, E: DateExtractor> TaskService<R, E> {
    pub fn with_classifier(repo: R, classifier: TaskClassifier<E>) -> Self {
        Self { repo, classifier }
    }

    pub fn create_task(
        &self,
        text: &str,
        category: Category,
        reference: Option<DateTime<FixedOffset>>,
    ) -> Result<Task> {
        let draft = self.classifier.classify(text, category, reference)?;
        let created = self.repo.create(draft)?;
        info!("created {} task {}", created.category, created.id);
        Ok(created)
    }

    pub fn get_task(&self, id: &Uuid) -> Result<Task> {
        self.repo.get(id)
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = self.repo.list()?;
        sort_tasks(&mut tasks);
        Ok(tasks)
    }

    pub fn chores(&self, sort: ChoreSort) -> Result<Vec<Task>> {
        let mut chores: Vec<Task> = self
            .repo
            .list()?
            .into_iter()
            .filter(|t| t.category == Category::Chore)
            .collect();
        sort_chores(&mut chores, sort);
        Ok(chores)
    }

    pub fn remaining_chores(&self) -> Result<usize> {
        Ok(self
            .repo
            .list()?
            .iter()
            .filter(|t| t.category == Category::Chore && !t.done)
            .count())
    }

    pub fn scheduled(&self) -> Result<Vec<Task>> {
        Ok(self
            .list_tasks()?
            .into_iter()
            .filter(|t| t.category == Category::Scheduled)
            .collect())
    }

    /// Applies an edit.
    ///
    /// New text is classified again under the requested category, or the
    /// task's current one when none is given. An explicit date wins over
    /// extraction, and a chore can never take one.
    pub fn update_task(
        &self,
        id: &Uuid,
        update: TaskUpdate,
        reference: Option<DateTime<FixedOffset>>,
    ) -> Result<Task> {
        let mut task = self.repo.get(id)?;
        let category = update.category.unwrap_or(task.category);

        if category == Category::Chore && update.date.is_some() {
            warn!("rejected date on chore {}", id);
            return Err(TaskError::invalid("chores cannot carry a date").into());
        }

        match (update.text.as_deref(), update.date) {
            (Some(text), Some(date)) => {
                let text = require_text(text)?;
                task.category = category;
                task.title = text.trim().to_string();
                task.date = Some(date);
            }
            (Some(text), None) => {
                let draft = self.classifier.classify(text, category, reference)?;
                task.reclassify(draft);
            }
            (None, Some(date)) => {
                task.category = category;
                task.date = Some(date);
            }
            (None, None) if category != task.category => {
                let draft = self.classifier.classify(&task.title, category, reference)?;
                task.reclassify(draft);
            }
            (None, None) => {}
        }

        if let Some(done) = update.done {
            task.done = done;
        }
        task.touch();
        self.repo.update(&task)?;
        info!("updated task {}", task.id);
        Ok(task)
    }

    /// Attaches a picked date, as from a date picker.
    pub fn set_date(&self, id: &Uuid, date: NaiveDate) -> Result<Task> {
        let update = TaskUpdate {
            date: Some(date),
            ..TaskUpdate::default()
        };
        self.update_task(id, update, None)
    }

    pub fn toggle_done(&self, id: &Uuid) -> Result<Task> {
        let mut task = self.repo.get(id)?;
        task.done = !task.done;
        task.touch();
        self.repo.update(&task)?;
        Ok(task)
    }

    pub fn delete_task(&self, id: &Uuid) -> Result<()> {
        self.repo.delete(id)?;
        info!("deleted task {}", id);
        Ok(())
    }

    pub fn week_groups(&self, today: NaiveDate) -> Result<Vec<WeekGroup>> {
        let scheduled = self.scheduled()?;
        Ok(group_by_week(&scheduled, today))
    }

    pub fn month_grid(&self, year: i32, month: u32, today: NaiveDate) -> Result<MonthGrid> {
        let scheduled = self.scheduled()?;
        Ok(build_month(year, month, &scheduled, today)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::TaskDraft;
    use chrono::{TimeZone, Utc};
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockTaskRepo {
        tasks: RefCell<Vec<Task>>,
    }

    impl TaskRepository for MockTaskRepo {
        fn create(&self, draft: TaskDraft) -> Result<Task> {
            let task = Task::from_draft(Uuid::new_v4(), draft, Utc::now());
            self.tasks.borrow_mut().push(task.clone());
            Ok(task)
        }
        fn get(&self, id: &Uuid) -> Result<Task> {
            self.tasks
                .borrow()
                .iter()
                .find(|t| t.id == *id)
                .cloned()
                .ok_or_else(|| TaskError::NotFound(*id).into())
        }
        fn list(&self) -> Result<Vec<Task>> {
            Ok(self.tasks.borrow().clone())
        }
        fn update(&self, task: &Task) -> Result<()> {
            let mut tasks = self.tasks.borrow_mut();
            let pos = tasks
                .iter()
                .position(|t| t.id == task.id)
                .ok_or(TaskError::NotFound(task.id))?;
            tasks[pos] = task.clone();
            Ok(())
        }
        fn delete(&self, id: &Uuid) -> Result<()> {
            self.tasks.borrow_mut().retain(|t| t.id != *id);
            Ok(())
        }
    }

    fn wednesday() -> Option<DateTime<FixedOffset>> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2023, 10, 25, 10, 0, 0)
            .single()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service() -> TaskService<MockTaskRepo> {
        TaskService::new(MockTaskRepo::default())
    }

    fn invalid_input(err: &anyhow::Error) -> bool {
        matches!(err.downcast_ref::<TaskError>(), Some(TaskError::InvalidInput(_)))
    }

    #[test]
    fn test_create_rejects_blank_text() {
        let err = service().create_task("  ", Category::Chore, wednesday()).unwrap_err();
        assert!(invalid_input(&err));
    }

    #[test]
    fn test_text_edit_keeps_scheduled_category() {
        let svc = service();
        let task = svc
            .create_task("Dentist Friday", Category::Scheduled, wednesday())
            .unwrap();
        assert_eq!(task.date, Some(ymd(2023, 10, 27)));

        let update = TaskUpdate {
            text: Some("Dentist checkup 02/11/2023".to_string()),
            ..TaskUpdate::default()
        };
        let edited = svc.update_task(&task.id, update, wednesday()).unwrap();

        assert_eq!(edited.category, Category::Scheduled);
        assert_eq!(edited.title, "Dentist checkup");
        assert_eq!(edited.date, Some(ymd(2023, 11, 2)));
        assert_eq!(edited.original_text, "Dentist Friday");
        assert!(edited.updated_at.is_some());
    }

    #[test]
    fn test_text_edit_with_explicit_category() {
        let svc = service();
        let task = svc
            .create_task("Party tomorrow", Category::Scheduled, wednesday())
            .unwrap();
        let update = TaskUpdate {
            text: Some("Clean up tomorrow".to_string()),
            category: Some(Category::Chore),
            ..TaskUpdate::default()
        };
        let edited = svc.update_task(&task.id, update, wednesday()).unwrap();
        assert_eq!(edited.category, Category::Chore);
        assert_eq!(edited.date, None);
        assert_eq!(edited.title, "Clean up tomorrow");
    }

    #[test]
    fn test_explicit_date_skips_extraction() {
        let svc = service();
        let task = svc.create_task("Trip", Category::Scheduled, wednesday()).unwrap();
        let update = TaskUpdate {
            text: Some("Trip to Rome tomorrow".to_string()),
            date: Some(ymd(2024, 5, 1)),
            ..TaskUpdate::default()
        };
        let edited = svc.update_task(&task.id, update, wednesday()).unwrap();
        assert_eq!(edited.title, "Trip to Rome tomorrow");
        assert_eq!(edited.date, Some(ymd(2024, 5, 1)));
    }

    #[test]
    fn test_chore_refuses_date() {
        let svc = service();
        let chore = svc.create_task("Buy Milk", Category::Chore, wednesday()).unwrap();
        let err = svc.set_date(&chore.id, ymd(2023, 11, 1)).unwrap_err();
        assert!(invalid_input(&err));
        assert_eq!(svc.get_task(&chore.id).unwrap().date, None);
    }

    #[test]
    fn test_set_date_on_undated_scheduled_task() {
        let svc = service();
        let task = svc.create_task("Haircut", Category::Scheduled, wednesday()).unwrap();
        assert_eq!(task.date, None);
        let dated = svc.set_date(&task.id, ymd(2023, 11, 1)).unwrap();
        assert_eq!(dated.date, Some(ymd(2023, 11, 1)));
        assert_eq!(dated.title, "Haircut");
    }

    #[test]
    fn test_category_change_reclassifies_title() {
        let svc = service();
        let chore = svc
            .create_task("Call plumber friday", Category::Chore, wednesday())
            .unwrap();
        let update = TaskUpdate {
            category: Some(Category::Scheduled),
            ..TaskUpdate::default()
        };
        let moved = svc.update_task(&chore.id, update, wednesday()).unwrap();
        assert_eq!(moved.category, Category::Scheduled);
        assert_eq!(moved.date, Some(ymd(2023, 10, 27)));
        assert_eq!(moved.title, "Call plumber");
    }

    #[test]
    fn test_toggle_and_remaining_chores() {
        let svc = service();
        let a = svc.create_task("Dishes", Category::Chore, wednesday()).unwrap();
        svc.create_task("Laundry", Category::Chore, wednesday()).unwrap();
        svc.create_task("Gym tomorrow", Category::Scheduled, wednesday()).unwrap();
        assert_eq!(svc.remaining_chores().unwrap(), 2);

        assert!(svc.toggle_done(&a.id).unwrap().done);
        assert_eq!(svc.remaining_chores().unwrap(), 1);
        assert!(!svc.toggle_done(&a.id).unwrap().done);
    }

    #[test]
    fn test_views_split_by_category() {
        let svc = service();
        svc.create_task("Vacuum", Category::Chore, wednesday()).unwrap();
        svc.create_task("Standup tomorrow", Category::Scheduled, wednesday()).unwrap();
        svc.create_task("Review 8/11/2023", Category::Scheduled, wednesday()).unwrap();

        let chores = svc.chores(ChoreSort::Name).unwrap();
        assert_eq!(chores.len(), 1);

        let groups = svc.week_groups(ymd(2023, 10, 25)).unwrap();
        let labels: Vec<String> = groups.iter().map(|g| g.label.to_string()).collect();
        assert_eq!(labels, vec!["This Week", "Week of 6 Nov"]);

        let grid = svc.month_grid(2023, 10, ymd(2023, 10, 25)).unwrap();
        assert_eq!(grid.cell(ymd(2023, 10, 26)).unwrap().tasks.len(), 1);
        assert!(svc.month_grid(2023, 13, ymd(2023, 10, 25)).is_err());
    }

    #[test]
    fn test_update_missing_task() {
        let svc = service();
        let id = Uuid::new_v4();
        let err = svc.update_task(&id, TaskUpdate::default(), None).unwrap_err();
        assert_eq!(err.downcast_ref::<TaskError>(), Some(&TaskError::NotFound(id)));
    }
}
