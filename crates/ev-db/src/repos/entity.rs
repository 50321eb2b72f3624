//! Record entity repository: the status lifecycle manager.
//!
//! Create, update, status change and soft delete of the eight record kinds.
//! Each mutation writes the row and appends its log entry in one transaction.

use chrono::{DateTime, Utc};
use ev_core::entities::{EntityData, TrackedEntity};
use ev_core::enums::{Authority, EntityKind, StatusKind, TransactionKind};
use ev_core::errors::CoreError;

use super::audit::{append_log, load_log};
use super::topic::check_parent;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::service::{EvService, finish};

pub(crate) const ENTITY_COLUMNS: &str =
    "id, kind, status, data, created_at, created_by, updated_at, updated_by";

/// Decode a row selected with `ENTITY_COLUMNS`. The log is left empty.
pub(crate) fn row_to_entity(row: &libsql::Row) -> Result<TrackedEntity, DatabaseError> {
    let id = row.get::<i64>(0)?;
    let kind: EntityKind = parse_enum(&row.get::<String>(1)?)?;
    let data: EntityData = serde_json::from_str(&row.get::<String>(3)?)?;
    if data.kind() != kind {
        return Err(DatabaseError::InvalidState(format!(
            "entity {id} is stored as {kind} but its payload is {}",
            data.kind()
        )));
    }
    Ok(TrackedEntity {
        id,
        status: parse_enum(&row.get::<String>(2)?)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        created_by: row.get::<String>(5)?,
        updated_at: parse_optional_datetime(get_opt_string(row, 6)?.as_deref())?,
        updated_by: get_opt_string(row, 7)?,
        log: Vec::new(),
        data,
    })
}

/// Fetch a record by id regardless of kind, without its log.
pub(crate) async fn fetch_entity(
    conn: &libsql::Connection,
    id: i64,
) -> Result<Option<TrackedEntity>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {ENTITY_COLUMNS} FROM entities WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_entity(&row)?)),
        None => Ok(None),
    }
}

/// Fetch a record of `kind`, failing with `NotFound` if absent or of another kind.
pub(crate) async fn require_entity(
    conn: &libsql::Connection,
    kind: EntityKind,
    id: i64,
) -> Result<TrackedEntity, DatabaseError> {
    match fetch_entity(conn, id).await? {
        Some(entity) if entity.kind() == kind => Ok(entity),
        _ => Err(CoreError::NotFound { kind, id }.into()),
    }
}

/// Fetch a record of `kind` that is not deleted.
///
/// `NotFound` when absent, `Validation` naming `role` when deleted.
pub(crate) async fn require_active(
    conn: &libsql::Connection,
    kind: EntityKind,
    id: i64,
    role: &str,
) -> Result<TrackedEntity, DatabaseError> {
    let entity = require_entity(conn, kind, id).await?;
    if entity.status.is_terminal() {
        return Err(CoreError::validation(format!("{role} {kind} {id} is deleted")).into());
    }
    Ok(entity)
}

async fn with_log(
    conn: &libsql::Connection,
    mut entity: TrackedEntity,
) -> Result<TrackedEntity, DatabaseError> {
    entity.log = load_log(conn, entity.kind(), entity.id).await?;
    Ok(entity)
}

/// Reject references to missing or wrongly-kinded records, and topic parents
/// that would close a cycle. A new or changed reference must also name a
/// record that is not deleted; one carried over from `previous` may not.
async fn check_references(
    conn: &libsql::Connection,
    self_id: Option<i64>,
    data: &EntityData,
    previous: Option<&EntityData>,
) -> Result<(), DatabaseError> {
    let kept = previous.map(EntityData::references).unwrap_or_default();
    for reference in data.references() {
        let (field, target_kind, target_id) = reference;
        let carried_over = kept.contains(&reference);
        let ok = matches!(
            fetch_entity(conn, target_id).await?,
            Some(target) if target.kind() == target_kind
                && (carried_over || !target.status.is_terminal())
        );
        if !ok {
            return Err(CoreError::validation(format!(
                "'{field}' {target_id} does not name an existing {}",
                target_kind.label()
            ))
            .into());
        }
    }
    if let Some(parent_id) = data.parent_id() {
        check_parent(conn, self_id, parent_id).await?;
    }
    Ok(())
}

fn invalid_transition(entity: &TrackedEntity, to: StatusKind) -> DatabaseError {
    tracing::warn!(
        kind = %entity.kind(),
        id = entity.id,
        from = %entity.status,
        to = %to,
        "rejected status transition"
    );
    CoreError::InvalidTransition {
        kind: entity.kind(),
        id: entity.id,
        from: entity.status,
        to,
    }
    .into()
}

async fn insert_entity(
    conn: &libsql::Connection,
    user: &str,
    now: DateTime<Utc>,
    data: &EntityData,
) -> Result<TrackedEntity, DatabaseError> {
    check_references(conn, None, data, None).await?;

    conn.execute(
        "INSERT INTO entities (kind, status, parent_id, data, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        libsql::params![
            data.kind().as_str(),
            StatusKind::Draft.as_str(),
            data.parent_id(),
            serde_json::to_string(data)?,
            now.to_rfc3339(),
            user
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();

    let entry = append_log(conn, now, TransactionKind::Created, data.kind(), id, user).await?;

    Ok(TrackedEntity {
        id,
        status: StatusKind::Draft,
        created_at: now,
        created_by: user.to_string(),
        updated_at: None,
        updated_by: None,
        log: vec![entry],
        data: data.clone(),
    })
}

async fn replace_entity(
    conn: &libsql::Connection,
    user: &str,
    now: DateTime<Utc>,
    id: i64,
    data: &EntityData,
) -> Result<TrackedEntity, DatabaseError> {
    let Some(current) = fetch_entity(conn, id).await? else {
        return Err(CoreError::NotFound {
            kind: data.kind(),
            id,
        }
        .into());
    };
    if current.kind() != data.kind() {
        return Err(CoreError::validation(format!(
            "entity {id} is a {}, not a {}",
            current.kind().label(),
            data.kind().label()
        ))
        .into());
    }
    if current.status.is_terminal() {
        return Err(invalid_transition(&current, current.status));
    }
    check_references(conn, Some(id), data, Some(&current.data)).await?;

    conn.execute(
        "UPDATE entities SET data = ?1, parent_id = ?2, updated_at = ?3, updated_by = ?4
         WHERE id = ?5",
        libsql::params![
            serde_json::to_string(data)?,
            data.parent_id(),
            now.to_rfc3339(),
            user,
            id
        ],
    )
    .await?;
    append_log(conn, now, TransactionKind::Updated, data.kind(), id, user).await?;

    with_log(conn, TrackedEntity {
        updated_at: Some(now),
        updated_by: Some(user.to_string()),
        data: data.clone(),
        ..current
    })
    .await
}

async fn write_status(
    conn: &libsql::Connection,
    user: &str,
    now: DateTime<Utc>,
    current: TrackedEntity,
    to: StatusKind,
) -> Result<TrackedEntity, DatabaseError> {
    if !current.status.can_transition_to(to) {
        return Err(invalid_transition(&current, to));
    }
    conn.execute(
        "UPDATE entities SET status = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
        libsql::params![to.as_str(), now.to_rfc3339(), user, current.id],
    )
    .await?;
    let tk = if to == StatusKind::Deleted {
        TransactionKind::Deleted
    } else {
        TransactionKind::Updated
    };
    append_log(conn, now, tk, current.kind(), current.id, user).await?;

    with_log(conn, TrackedEntity {
        status: to,
        updated_at: Some(now),
        updated_by: Some(user.to_string()),
        ..current
    })
    .await
}

impl EvService {
    /// Create a record in `DRA` with a single `CRE` log entry.
    ///
    /// # Errors
    ///
    /// `Authorization` without `CRE`; `Validation` for a malformed payload or
    /// a dangling reference; `Conflict` on write-gate timeout.
    pub async fn create_entity(
        &self,
        data: impl Into<EntityData>,
    ) -> Result<TrackedEntity, DatabaseError> {
        let data = data.into();
        let user = self.authorize(Authority::Create)?;
        data.validate()?;

        let _gate = self.write_gate("create entity").await?;
        let tx = self.begin().await?;
        let result = insert_entity(&tx, &user, Utc::now(), &data).await;
        let entity = finish(tx, result).await?;

        tracing::debug!(kind = %entity.kind(), id = entity.id, user, "created entity");
        Ok(entity)
    }

    /// Replace a record's payload wholesale and append an `UPD` entry.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `Validation` if the payload kind differs
    /// from the stored kind; `InvalidTransition` if the record is deleted.
    pub async fn update_entity(
        &self,
        id: i64,
        data: impl Into<EntityData>,
    ) -> Result<TrackedEntity, DatabaseError> {
        let data = data.into();
        let user = self.authorize(Authority::Update)?;
        data.validate()?;

        let _gate = self.write_gate("update entity").await?;
        let tx = self.begin().await?;
        let result = replace_entity(&tx, &user, Utc::now(), id, &data).await;
        let entity = finish(tx, result).await?;

        tracing::debug!(kind = %entity.kind(), id, user, "updated entity");
        Ok(entity)
    }

    /// Move a record along the lifecycle. Moving to `DEL` is a delete and
    /// appends a `DEL` entry; any other legal move appends `UPD`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `InvalidTransition` for a move outside
    /// the lifecycle (including to the current status).
    pub async fn set_status(
        &self,
        kind: EntityKind,
        id: i64,
        status: StatusKind,
    ) -> Result<TrackedEntity, DatabaseError> {
        if status == StatusKind::Deleted {
            return self.delete_entity(kind, id).await;
        }
        let user = self.authorize(Authority::Update)?;

        let _gate = self.write_gate("change status").await?;
        let tx = self.begin().await?;
        let result: Result<_, DatabaseError> = async {
            let current = require_entity(&tx, kind, id).await?;
            write_status(&tx, &user, Utc::now(), current, status).await
        }
        .await;
        let entity = finish(tx, result).await?;

        tracing::debug!(kind = %kind, id, status = %status, user, "changed status");
        Ok(entity)
    }

    /// Soft-delete a record: status becomes `DEL` and a final `DEL` entry is
    /// appended. Row and log are retained.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `InvalidTransition` if already deleted.
    pub async fn delete_entity(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<TrackedEntity, DatabaseError> {
        let user = self.authorize(Authority::Delete)?;

        let _gate = self.write_gate("delete entity").await?;
        let tx = self.begin().await?;
        let result: Result<_, DatabaseError> = async {
            let current = require_entity(&tx, kind, id).await?;
            write_status(&tx, &user, Utc::now(), current, StatusKind::Deleted).await
        }
        .await;
        let entity = finish(tx, result).await?;

        tracing::debug!(kind = %kind, id, user, "deleted entity");
        Ok(entity)
    }

    /// Read one record with its full log.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id or a record of another kind;
    /// `UnsupportedOperation` for `TopicRef`, which is only listed;
    /// `Validation` for `EntityLink` (see [`Self::get_link`]).
    pub async fn get_entity(
        &self,
        kind: EntityKind,
        id: i64,
    ) -> Result<TrackedEntity, DatabaseError> {
        match kind {
            EntityKind::TopicRef => {
                return Err(CoreError::UnsupportedOperation {
                    kind,
                    operation: "read by id",
                }
                .into());
            }
            EntityKind::EntityLink => {
                return Err(CoreError::validation("links are read with get_link").into());
            }
            _ => {}
        }
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        let entity = require_entity(conn, kind, id).await?;
        with_log(conn, entity).await
    }
}
