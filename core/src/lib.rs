pub mod error;
pub mod model;
pub mod repository;
pub mod input;
pub mod time;
pub mod service;

pub use error::TaskError;
pub use model::task::{Category, Task, TaskDraft};
pub use repository::TaskRepository;
pub use input::UNTITLED_PLACEHOLDER;
pub use time::{parse_reference, DateExtractor, DateMatch, DateOrder, NaturalDateExtractor};
pub use service::calendar::{build_month, GRID_CELLS};
pub use service::classifier::TaskClassifier;
pub use service::dto::{CalendarCell, MonthGrid, WeekGroup, WeekLabel};
pub use service::grouping::group_by_week;
pub use service::ordering::{compare_tasks, sort_chores, sort_tasks, ChoreSort};
pub use service::task_service::{TaskService, TaskUpdate};
