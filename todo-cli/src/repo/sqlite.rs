use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{Result, TaskRepository};
use crate::domain::task::{Task, TaskId};
use crate::error::StoreError;

pub struct SqliteTaskRepo {
    conn: Connection,
}

impl SqliteTaskRepo {
    pub fn open_default() -> anyhow::Result<Self> {
        let path = default_db_path()?;
        Self::open(path)
    }

    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create db dir {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open db {}", path.display()))?;
        Ok(Self::new(conn)?)
    }

    /// Wrap an already-open connection. Ensures the schema exists, so any
    /// repository handed out is ready to use.
    pub fn new(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    fn fetch(&self, id: TaskId) -> Result<Task> {
        let raw = self
            .conn
            .query_row(
                "SELECT id, title, created_at, completed_at, is_deleted FROM tasks WHERE id = ?1",
                params![id],
                read_raw,
            )
            .optional()?;
        match raw {
            Some(raw) => parse_task(raw),
            None => Err(StoreError::NotFound(id)),
        }
    }

    fn select_many(&self, sql: &str) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], read_raw)?;
        let mut tasks = Vec::new();
        for raw in rows {
            tasks.push(parse_task(raw?)?);
        }
        Ok(tasks)
    }
}

impl TaskRepository for SqliteTaskRepo {
    fn add(&mut self, title: &str) -> Result<Task> {
        let created_at = Utc::now();
        self.conn.execute(
            "INSERT INTO tasks (title, created_at, completed_at) VALUES (?1, ?2, NULL)",
            params![title, created_at.to_rfc3339()],
        )?;
        Ok(Task {
            id: self.conn.last_insert_rowid(),
            title: title.to_string(),
            created_at,
            completed_at: None,
            is_deleted: false,
        })
    }

    fn get_by_id(&self, id: TaskId) -> Result<Task> {
        self.fetch(id)
    }

    fn show_all(&self) -> Result<Vec<Task>> {
        self.select_many(
            "SELECT id, title, created_at, completed_at, is_deleted FROM tasks \
             WHERE is_deleted = 0 ORDER BY id",
        )
    }

    fn show_pending(&self) -> Result<Vec<Task>> {
        self.select_many(
            "SELECT id, title, created_at, completed_at, is_deleted FROM tasks \
             WHERE completed_at IS NULL AND is_deleted = 0 ORDER BY id",
        )
    }

    fn toggle(&mut self, id: TaskId) -> Result<Task> {
        let mut task = self.fetch(id)?;
        task.completed_at = match task.completed_at {
            None => Some(Utc::now()),
            Some(_) => None,
        };
        self.conn.execute(
            "UPDATE tasks SET completed_at = ?1 WHERE id = ?2",
            params![task.completed_at.map(|t| t.to_rfc3339()), id],
        )?;
        Ok(task)
    }

    fn soft_delete(&mut self, id: TaskId) -> Result<Task> {
        let task = self.fetch(id)?;
        self.conn
            .execute("UPDATE tasks SET is_deleted = 1 WHERE id = ?1", params![id])?;
        Ok(task)
    }

    fn delete(&mut self, id: TaskId) -> Result<Task> {
        let task = self.fetch(id)?;
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(task)
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS tasks (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  title TEXT NOT NULL,
  created_at TEXT NOT NULL,
  completed_at TEXT,
  is_deleted INTEGER NOT NULL DEFAULT 0
);
"#,
    )?;
    Ok(())
}

struct RawTask {
    id: TaskId,
    title: String,
    created_at: String,
    completed_at: Option<String>,
    is_deleted: bool,
}

fn read_raw(row: &Row) -> rusqlite::Result<RawTask> {
    Ok(RawTask {
        id: row.get("id")?,
        title: row.get("title")?,
        created_at: row.get("created_at")?,
        completed_at: row.get("completed_at")?,
        is_deleted: row.get::<_, i64>("is_deleted")? != 0,
    })
}

fn parse_task(raw: RawTask) -> Result<Task> {
    let created_at = parse_timestamp(raw.id, &raw.created_at)?;
    let completed_at = raw
        .completed_at
        .as_deref()
        .map(|v| parse_timestamp(raw.id, v))
        .transpose()?;
    Ok(Task {
        id: raw.id,
        title: raw.title,
        created_at,
        completed_at,
        is_deleted: raw.is_deleted,
    })
}

fn parse_timestamp(id: TaskId, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Timestamp {
            id,
            value: value.to_string(),
        })
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir().context("failed to resolve data dir")?;
    Ok(base.join("todo").join("tasks.sqlite"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SqliteTaskRepo {
        SqliteTaskRepo::new(Connection::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn added_task_is_pending_and_visible() {
        let mut repo = repo();
        let task = repo.add("write report").unwrap();

        let fetched = repo.get_by_id(task.id).unwrap();
        assert_eq!(fetched.title, "write report");
        assert!(fetched.completed_at.is_none());
        assert!(!fetched.is_deleted);
        assert_eq!(repo.show_all().unwrap(), vec![fetched]);
    }

    #[test]
    fn ids_are_monotonic_and_listing_follows_insertion_order() {
        let mut repo = repo();
        let first = repo.add("first").unwrap();
        let second = repo.add("second").unwrap();
        assert!(second.id > first.id);

        let titles: Vec<_> = repo
            .show_all()
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut repo = repo();
        let task = repo.add("laundry").unwrap();

        let done = repo.toggle(task.id).unwrap();
        assert!(done.completed_at.is_some());

        let undone = repo.toggle(task.id).unwrap();
        assert!(undone.completed_at.is_none());
    }

    #[test]
    fn pending_listing_excludes_completed_and_deleted() {
        let mut repo = repo();
        let keep = repo.add("keep").unwrap();
        let done = repo.add("done").unwrap();
        let gone = repo.add("gone").unwrap();

        repo.toggle(done.id).unwrap();
        repo.soft_delete(gone.id).unwrap();

        let pending = repo.show_pending().unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, keep.id);

        // show_all keeps the completed one but not the soft-deleted one.
        let all: Vec<_> = repo.show_all().unwrap().into_iter().map(|t| t.id).collect();
        assert_eq!(all, vec![keep.id, done.id]);
    }

    #[test]
    fn soft_delete_hides_but_keeps_the_row() {
        let mut repo = repo();
        let task = repo.add("hide me").unwrap();

        let snapshot = repo.soft_delete(task.id).unwrap();
        assert!(!snapshot.is_deleted);

        assert!(repo.show_all().unwrap().is_empty());
        let fetched = repo.get_by_id(task.id).unwrap();
        assert!(fetched.is_deleted);
    }

    #[test]
    fn soft_deleted_task_is_still_toggleable() {
        let mut repo = repo();
        let task = repo.add("zombie").unwrap();
        repo.soft_delete(task.id).unwrap();

        let toggled = repo.toggle(task.id).unwrap();
        assert!(toggled.completed_at.is_some());
    }

    #[test]
    fn hard_delete_removes_the_row() {
        let mut repo = repo();
        let task = repo.add("drop me").unwrap();

        let snapshot = repo.delete(task.id).unwrap();
        assert_eq!(snapshot.id, task.id);

        let err = repo.get_by_id(task.id).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn missing_id_reports_not_found() {
        let mut repo = repo();
        assert!(matches!(
            repo.get_by_id(42).unwrap_err(),
            StoreError::NotFound(42)
        ));
        assert!(matches!(repo.toggle(42).unwrap_err(), StoreError::NotFound(42)));
        assert!(matches!(
            repo.soft_delete(42).unwrap_err(),
            StoreError::NotFound(42)
        ));
        assert!(matches!(repo.delete(42).unwrap_err(), StoreError::NotFound(42)));
    }

    #[test]
    fn malformed_stored_timestamp_is_a_storage_error() {
        let repo = repo();
        repo.conn
            .execute(
                "INSERT INTO tasks (title, created_at) VALUES ('bad', 'not-a-time')",
                [],
            )
            .unwrap();

        let err = repo.get_by_id(1).unwrap_err();
        assert!(matches!(err, StoreError::Timestamp { .. }));
    }

    #[test]
    fn reopening_the_file_keeps_tasks() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let id = {
            let mut repo = SqliteTaskRepo::open(tmp.path()).unwrap();
            repo.add("persisted").unwrap().id
        };

        let repo = SqliteTaskRepo::open(tmp.path()).unwrap();
        let task = repo.get_by_id(id).unwrap();
        assert_eq!(task.title, "persisted");
    }
}
