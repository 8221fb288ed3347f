//! The `system_logs` table.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use trowel_core::model::SystemLogEntry;

use crate::{Result, Store};

#[derive(Debug, FromRow)]
struct LogRow {
    timestamp: DateTime<Utc>,
    level: String,
    component: Option<String>,
    message: String,
    request_id: Option<String>,
    endpoint: Option<String>,
    execution_time_ms: Option<i64>,
    context_data: Option<String>,
}

impl Store {
    /// Appends an entry stamped with the current time; returns the row id.
    pub async fn record_log(&self, entry: &SystemLogEntry) -> Result<i64> {
        let context = entry
            .context_data
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let result = sqlx::query(
            "INSERT INTO system_logs
                (timestamp, level, component, message, request_id, endpoint,
                 execution_time_ms, context_data)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Utc::now())
        .bind(&entry.level)
        .bind(entry.component.as_deref())
        .bind(&entry.message)
        .bind(entry.request_id.as_deref())
        .bind(entry.endpoint.as_deref())
        .bind(entry.execution_time_ms)
        .bind(context)
        .execute(self.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// The `limit` most recent entries, newest first, with their timestamps.
    pub async fn recent_logs(&self, limit: i64) -> Result<Vec<(DateTime<Utc>, SystemLogEntry)>> {
        let rows: Vec<LogRow> = sqlx::query_as(
            "SELECT timestamp, level, component, message, request_id, endpoint,
                    execution_time_ms, context_data
             FROM system_logs
             ORDER BY id DESC
             LIMIT ?",
        )
        .bind(limit)
        .fetch_all(self.pool())
        .await?;

        rows.into_iter()
            .map(|row| {
                let context_data = row
                    .context_data
                    .as_deref()
                    .map(serde_json::from_str)
                    .transpose()?;
                Ok((
                    row.timestamp,
                    SystemLogEntry {
                        level: row.level,
                        component: row.component,
                        message: row.message,
                        request_id: row.request_id,
                        endpoint: row.endpoint,
                        execution_time_ms: row.execution_time_ms,
                        context_data,
                    },
                ))
            })
            .collect()
    }
}
