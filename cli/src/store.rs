use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use plandate_core::{Task, TaskDraft, TaskError, TaskRepository};
use uuid::Uuid;

const DEFAULT_FILE_NAME: &str = "tasks.json";

/// Tasks kept as a pretty-printed JSON array in `<data_dir>/tasks.json`.
#[derive(Clone)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data dir '{}'", data_dir.display()))?;
        let file_path = data_dir.join(DEFAULT_FILE_NAME);

        let repo = FileTaskRepository { file_path };
        if !repo.file_path.exists() {
            repo.write_tasks(&[])?;
        }
        Ok(repo)
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        let file = File::open(&self.file_path)
            .with_context(|| format!("failed to open '{}'", self.file_path.display()))?;
        let tasks = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse '{}'", self.file_path.display()))?;
        Ok(tasks)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        let file = File::create(&self.file_path)
            .with_context(|| format!("failed to write '{}'", self.file_path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, tasks)?;
        writer.flush()?;
        Ok(())
    }
}

impl TaskRepository for FileTaskRepository {
    fn create(&self, draft: TaskDraft) -> Result<Task> {
        let mut tasks = self.read_tasks()?;
        let task = Task::from_draft(Uuid::new_v4(), draft, Utc::now());
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        Ok(task)
    }

    fn get(&self, id: &Uuid) -> Result<Task> {
        self.read_tasks()?
            .into_iter()
            .find(|t| t.id == *id)
            .ok_or_else(|| TaskError::NotFound(*id).into())
    }

    fn list(&self) -> Result<Vec<Task>> {
        self.read_tasks()
    }

    fn update(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let pos = tasks
            .iter()
            .position(|t| t.id == task.id)
            .ok_or(TaskError::NotFound(task.id))?;
        tasks[pos] = task.clone();
        self.write_tasks(&tasks)
    }

    fn delete(&self, id: &Uuid) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        let initial_len = tasks.len();
        tasks.retain(|t| t.id != *id);

        if tasks.len() == initial_len {
            return Err(TaskError::NotFound(*id).into());
        }
        self.write_tasks(&tasks)
    }
}
