//! Audit log recorder.
//!
//! Append-only `LogEntry` rows recording every mutation of records, links
//! and topic references. Appends always run on the caller's transaction so
//! the entry commits or rolls back with the mutation it documents.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use ev_core::entities::LogEntry;
use ev_core::enums::{EntityKind, TransactionKind};

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum, placeholders};
use crate::service::EvService;

const LOG_COLUMNS: &str = "id, timestamp, transaction_kind, entity_kind, entity_id, username";

/// Filter criteria for audit queries.
#[derive(Debug, Default)]
pub struct AuditFilter {
    pub entity_kind: Option<EntityKind>,
    pub entity_id: Option<i64>,
    pub transaction_kind: Option<TransactionKind>,
    pub user: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_log(row: &libsql::Row) -> Result<LogEntry, DatabaseError> {
    Ok(LogEntry {
        id: row.get::<i64>(0)?,
        timestamp: parse_datetime(&row.get::<String>(1)?)?,
        transaction_kind: parse_enum(&row.get::<String>(2)?)?,
        entity_kind: parse_enum(&row.get::<String>(3)?)?,
        entity_id: row.get::<i64>(4)?,
        user: row.get::<String>(5)?,
    })
}

/// Append one entry. Must run inside the mutation's transaction.
pub(crate) async fn append_log(
    conn: &libsql::Connection,
    timestamp: DateTime<Utc>,
    transaction_kind: TransactionKind,
    entity_kind: EntityKind,
    entity_id: i64,
    user: &str,
) -> Result<LogEntry, DatabaseError> {
    conn.execute(
        "INSERT INTO log_entries (timestamp, transaction_kind, entity_kind, entity_id, username)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        libsql::params![
            timestamp.to_rfc3339(),
            transaction_kind.as_str(),
            entity_kind.as_str(),
            entity_id,
            user
        ],
    )
    .await?;

    Ok(LogEntry {
        id: conn.last_insert_rowid(),
        timestamp,
        transaction_kind,
        entity_kind,
        entity_id,
        user: user.to_string(),
    })
}

/// Full log of one entity in insertion order.
pub(crate) async fn load_log(
    conn: &libsql::Connection,
    entity_kind: EntityKind,
    entity_id: i64,
) -> Result<Vec<LogEntry>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "SELECT {LOG_COLUMNS} FROM log_entries
                 WHERE entity_kind = ?1 AND entity_id = ?2 ORDER BY id"
            ),
            libsql::params![entity_kind.as_str(), entity_id],
        )
        .await?;

    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_log(&row)?);
    }
    Ok(entries)
}

/// Entity ids bound per log lookup statement.
const LOG_LOOKUP_CHUNK: usize = 500;

/// Logs of many entities of one kind, keyed by entity id.
///
/// Ids are looked up in chunks, so any number of entities can be served.
pub(crate) async fn load_logs(
    conn: &libsql::Connection,
    entity_kind: EntityKind,
    entity_ids: &[i64],
) -> Result<HashMap<i64, Vec<LogEntry>>, DatabaseError> {
    let mut logs: HashMap<i64, Vec<LogEntry>> = HashMap::new();
    for chunk in entity_ids.chunks(LOG_LOOKUP_CHUNK) {
        let mut params: Vec<libsql::Value> =
            vec![libsql::Value::Text(entity_kind.as_str().into())];
        params.extend(chunk.iter().map(|id| libsql::Value::Integer(*id)));

        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM log_entries
             WHERE entity_kind = ?1 AND entity_id IN ({}) ORDER BY id",
            placeholders(2, chunk.len())
        );
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        while let Some(row) = rows.next().await? {
            let entry = row_to_log(&row)?;
            logs.entry(entry.entity_id).or_default().push(entry);
        }
    }
    Ok(logs)
}

impl EvService {
    /// The audit log of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn entity_log(
        &self,
        entity_kind: EntityKind,
        entity_id: i64,
    ) -> Result<Vec<LogEntry>, DatabaseError> {
        let _gate = self.read_gate().await;
        load_log(self.db().conn(), entity_kind, entity_id).await
    }

    /// Query audit entries with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(&self, filter: &AuditFilter) -> Result<Vec<LogEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(kind) = filter.entity_kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("entity_kind = ?{}", params.len()));
        }
        if let Some(id) = filter.entity_id {
            params.push(libsql::Value::Integer(id));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }
        if let Some(tk) = filter.transaction_kind {
            params.push(libsql::Value::Text(tk.as_str().to_string()));
            conditions.push(format!("transaction_kind = ?{}", params.len()));
        }
        if let Some(ref user) = filter.user {
            params.push(libsql::Value::Text(user.clone()));
            conditions.push(format!("username = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {LOG_COLUMNS} FROM log_entries {where_clause} ORDER BY id DESC LIMIT {limit}"
        );

        let _gate = self.read_gate().await;
        let mut rows = self
            .db()
            .conn()
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(row_to_log(&row)?);
        }
        Ok(entries)
    }
}
