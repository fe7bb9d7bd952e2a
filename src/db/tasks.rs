//! Task CRUD and child-row operations.

use super::{Database, now_ms};
use crate::error::ApiError;
use crate::types::{NewTask, Priority, Subtask, SubtaskInput, Task, TaskUpdate};
use anyhow::Result;
use rusqlite::{Connection, Row, params};

fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    let priority: String = row.get("priority")?;
    let due_date: Option<String> = row.get("due_date")?;

    Ok(Task {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority: Priority::from_column(&priority),
        due_date: due_date.and_then(|d| d.parse().ok()),
        completed: row.get("completed")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
        tags: Vec::new(),
        subtasks: Vec::new(),
    })
}

/// Fetch the tag names for a task. No ordering contract.
fn load_tags(conn: &Connection, task_id: i64) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT tag_name FROM tags WHERE task_id = ?1")?;
    let tags = stmt
        .query_map(params![task_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(tags)
}

/// Fetch the subtasks for a task, ordered by id for display.
fn load_subtasks(conn: &Connection, task_id: i64) -> Result<Vec<Subtask>> {
    let mut stmt =
        conn.prepare("SELECT id, text, completed FROM subtasks WHERE task_id = ?1 ORDER BY id")?;
    let subtasks = stmt
        .query_map(params![task_id], |row| {
            Ok(Subtask {
                id: row.get(0)?,
                text: row.get(1)?,
                completed: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<Subtask>>>()?;
    Ok(subtasks)
}

/// Get an enriched task using an existing connection, so it also works
/// inside a transaction.
fn get_task_internal(conn: &Connection, task_id: i64) -> Result<Option<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE id = ?1")?;

    let result = stmt.query_row(params![task_id], parse_task_row);

    match result {
        Ok(mut task) => {
            task.tags = load_tags(conn, task_id)?;
            task.subtasks = load_subtasks(conn, task_id)?;
            Ok(Some(task))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolve a submitted priority: absent means medium, anything other than
/// the three known values is a validation error.
fn parse_priority_field(value: Option<&str>) -> Result<Priority> {
    match value {
        None => Ok(Priority::default()),
        Some(s) => Priority::parse(s).ok_or_else(|| {
            ApiError::invalid_value("priority", &format!("unknown priority: {}", s)).into()
        }),
    }
}

/// Insert one tag row per entry.
fn insert_tags(conn: &Connection, task_id: i64, tags: &[String]) -> Result<()> {
    for tag in tags {
        conn.execute(
            "INSERT INTO tags (task_id, tag_name) VALUES (?1, ?2)",
            params![task_id, tag],
        )?;
    }
    Ok(())
}

/// Insert one subtask row per entry. Entries without an explicit flag
/// start incomplete.
fn insert_subtasks(
    conn: &Connection,
    task_id: i64,
    subtasks: &[SubtaskInput],
    now: i64,
) -> Result<()> {
    for subtask in subtasks {
        conn.execute(
            "INSERT INTO subtasks (task_id, text, completed, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![task_id, subtask.text(), subtask.completed(), now],
        )?;
    }
    Ok(())
}

impl Database {
    /// List all tasks, newest first, each enriched with its tags and
    /// subtasks. Children are fetched with a separate query per task;
    /// tables are expected to stay small enough that this does not matter.
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM tasks ORDER BY created_at DESC, id DESC")?;
            let mut tasks = stmt
                .query_map([], parse_task_row)?
                .collect::<rusqlite::Result<Vec<Task>>>()?;

            for task in &mut tasks {
                task.tags = load_tags(conn, task.id)?;
                task.subtasks = load_subtasks(conn, task.id)?;
            }

            Ok(tasks)
        })
    }

    /// Get a single enriched task by id.
    pub fn get_task(&self, task_id: i64) -> Result<Option<Task>> {
        self.with_conn(|conn| get_task_internal(conn, task_id))
    }

    /// Create a task together with its tags and subtasks in one
    /// transaction. A missing or blank title and an unknown priority are
    /// rejected before the store is touched; any insert failure rolls
    /// back the whole creation.
    pub fn create_task(&self, draft: NewTask) -> Result<Task> {
        let title = draft.title.as_deref().unwrap_or("");
        if title.trim().is_empty() {
            return Err(ApiError::missing_field("title").into());
        }
        let priority = parse_priority_field(draft.priority.as_deref())?;

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let now = now_ms();

            tx.execute(
                "INSERT INTO tasks (title, description, priority, due_date, completed, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
                params![
                    title,
                    draft.description,
                    priority.as_str(),
                    draft.due_date.map(|d| d.to_string()),
                    now,
                ],
            )?;
            let task_id = tx.last_insert_rowid();

            if let Some(ref tags) = draft.tags {
                insert_tags(&tx, task_id, tags)?;
            }
            if let Some(ref subtasks) = draft.subtasks {
                insert_subtasks(&tx, task_id, subtasks, now)?;
            }

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            tx.commit()?;

            Ok(task)
        })
    }

    /// Rewrite a task's scalar columns and replace its full tag and
    /// subtask sets in one transaction. Nothing is merged: optionals
    /// absent from the update reset to their defaults, and omitting the
    /// tags or subtasks list clears that set. Title and priority are
    /// validated as on create. Commits only if every step succeeded; any
    /// failure leaves the task in its prior state.
    pub fn update_task(&self, task_id: i64, update: TaskUpdate) -> Result<Task> {
        let title = update.title.as_deref().unwrap_or("");
        if title.trim().is_empty() {
            return Err(ApiError::missing_field("title").into());
        }
        let priority = parse_priority_field(update.priority.as_deref())?;

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE id = ?1)",
                params![task_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(ApiError::task_not_found(task_id).into());
            }

            let now = now_ms();

            tx.execute(
                "UPDATE tasks SET
                    title = ?1, description = ?2, priority = ?3,
                    due_date = ?4, completed = ?5, updated_at = ?6
                 WHERE id = ?7",
                params![
                    title,
                    update.description,
                    priority.as_str(),
                    update.due_date.map(|d| d.to_string()),
                    update.completed,
                    now,
                    task_id,
                ],
            )?;

            tx.execute("DELETE FROM tags WHERE task_id = ?1", params![task_id])?;
            if let Some(ref tags) = update.tags {
                insert_tags(&tx, task_id, tags)?;
            }

            tx.execute("DELETE FROM subtasks WHERE task_id = ?1", params![task_id])?;
            if let Some(ref subtasks) = update.subtasks {
                insert_subtasks(&tx, task_id, subtasks, now)?;
            }

            let task = get_task_internal(&tx, task_id)?
                .ok_or_else(|| ApiError::task_not_found(task_id))?;

            tx.commit()?;

            Ok(task)
        })
    }

    /// Flip a task's completed flag and return the new value.
    ///
    /// Read-then-write with no atomic flip: two toggles racing on the same
    /// row interleave at the store and the last write wins.
    pub fn toggle_task(&self, task_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let completed: bool = match conn.query_row(
                "SELECT completed FROM tasks WHERE id = ?1",
                params![task_id],
                |row| row.get(0),
            ) {
                Ok(v) => v,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(ApiError::task_not_found(task_id).into());
                }
                Err(e) => return Err(e.into()),
            };

            conn.execute(
                "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE id = ?3",
                params![!completed, now_ms(), task_id],
            )?;

            Ok(!completed)
        })
    }

    /// Flip a subtask's completed flag and return the new value. Same
    /// read-then-write pattern as `toggle_task`.
    pub fn toggle_subtask(&self, subtask_id: i64) -> Result<bool> {
        self.with_conn(|conn| {
            let completed: bool = match conn.query_row(
                "SELECT completed FROM subtasks WHERE id = ?1",
                params![subtask_id],
                |row| row.get(0),
            ) {
                Ok(v) => v,
                Err(rusqlite::Error::QueryReturnedNoRows) => {
                    return Err(ApiError::subtask_not_found(subtask_id).into());
                }
                Err(e) => return Err(e.into()),
            };

            conn.execute(
                "UPDATE subtasks SET completed = ?1 WHERE id = ?2",
                params![!completed, subtask_id],
            )?;

            Ok(!completed)
        })
    }

    /// Delete a task. The cascade on the foreign keys removes its tags and
    /// subtasks with it.
    pub fn delete_task(&self, task_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            let affected = conn.execute("DELETE FROM tasks WHERE id = ?1", params![task_id])?;
            if affected == 0 {
                return Err(ApiError::task_not_found(task_id).into());
            }
            Ok(())
        })
    }
}
