//! Aggregation queries for task statistics.

use super::Database;
use crate::types::Stats;
use anyhow::Result;
use rusqlite::params;

impl Database {
    /// Count total, completed, active, and overdue tasks.
    ///
    /// Four independent queries with no shared snapshot: under concurrent
    /// writes the counts may disagree with each other within a single
    /// response. Overdue means not completed and strictly past due as of
    /// the current UTC date.
    pub fn get_stats(&self) -> Result<Stats> {
        let today = chrono::Utc::now().date_naive().to_string();

        self.with_conn(|conn| {
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM tasks", [], |row| row.get(0))?;

            let completed: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE completed = 1",
                [],
                |row| row.get(0),
            )?;

            let active: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tasks WHERE completed = 0",
                [],
                |row| row.get(0),
            )?;

            let overdue: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tasks
                 WHERE completed = 0 AND due_date IS NOT NULL AND due_date < ?1",
                params![today],
                |row| row.get(0),
            )?;

            Ok(Stats {
                total,
                completed,
                active,
                overdue,
            })
        })
    }
}
