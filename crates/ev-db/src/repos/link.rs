//! Entity link repository: the tracked, soft-deletable edges of the
//! relationship graph.
//!
//! Pairings and cardinality come from the registry's adjacency table. At most
//! one active link may exist per directed `(from, to)` tuple; deleted links
//! stay in the table with their log.

use chrono::{DateTime, Utc};
use ev_core::entities::{EntityLink, NewLink};
use ev_core::enums::{Authority, EntityKind, StatusKind, TransactionKind};
use ev_core::errors::CoreError;
use ev_core::query::{FilterSpec, Page, PageSpec, SortPlan, SortSpec, paginate};
use ev_core::registry::{self, Cardinality, LINK_FIELDS, find_field};

use super::audit::{append_log, load_log, load_logs};
use super::entity::require_active;
use crate::error::DatabaseError;
use crate::helpers::{
    get_opt_string, non_empty, parse_datetime, parse_enum, parse_optional_datetime, placeholders,
};
use crate::service::{EvService, finish};

const LINK_COLUMNS: &str = "id, status, from_entity_kind, from_entity_id, to_entity_kind, \
     to_entity_id, from_entity_locations, to_entity_locations, created_at, created_by, \
     updated_at, updated_by";

fn row_to_link(row: &libsql::Row) -> Result<EntityLink, DatabaseError> {
    Ok(EntityLink {
        id: row.get::<i64>(0)?,
        status: parse_enum(&row.get::<String>(1)?)?,
        from_entity_kind: parse_enum(&row.get::<String>(2)?)?,
        from_entity_id: row.get::<i64>(3)?,
        to_entity_kind: parse_enum(&row.get::<String>(4)?)?,
        to_entity_id: row.get::<i64>(5)?,
        from_entity_locations: get_opt_string(row, 6)?,
        to_entity_locations: get_opt_string(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
        created_by: row.get::<String>(9)?,
        updated_at: parse_optional_datetime(get_opt_string(row, 10)?.as_deref())?,
        updated_by: get_opt_string(row, 11)?,
        log: Vec::new(),
    })
}

async fn fetch_link(conn: &libsql::Connection, id: i64) -> Result<EntityLink, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {LINK_COLUMNS} FROM entity_links WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_link(&row),
        None => Err(CoreError::NotFound {
            kind: EntityKind::EntityLink,
            id,
        }
        .into()),
    }
}

async fn with_log(
    conn: &libsql::Connection,
    mut link: EntityLink,
) -> Result<EntityLink, DatabaseError> {
    link.log = load_log(conn, EntityKind::EntityLink, link.id).await?;
    Ok(link)
}

async fn count_active(
    conn: &libsql::Connection,
    sql_filter: &str,
    params: Vec<libsql::Value>,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT COUNT(*) FROM entity_links WHERE status <> 'DEL' AND {sql_filter}"),
            libsql::params_from_iter(params),
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

/// Shape checks that need no store access.
fn validate_new_link(link: &NewLink) -> Result<Cardinality, DatabaseError> {
    if link.from_entity_kind == link.to_entity_kind && link.from_entity_id == link.to_entity_id {
        return Err(CoreError::validation(format!(
            "{} {} cannot be linked to itself",
            link.from_entity_kind.label(),
            link.from_entity_id
        ))
        .into());
    }
    Ok(registry::link_rule(link.from_entity_kind, link.to_entity_kind)?.cardinality)
}

async fn insert_link(
    conn: &libsql::Connection,
    user: &str,
    now: DateTime<Utc>,
    link: &NewLink,
    cardinality: Cardinality,
) -> Result<EntityLink, DatabaseError> {
    require_active(conn, link.from_entity_kind, link.from_entity_id, "source").await?;
    require_active(conn, link.to_entity_kind, link.to_entity_id, "target").await?;

    let duplicates = count_active(
        conn,
        "from_entity_kind = ?1 AND from_entity_id = ?2 AND to_entity_kind = ?3 AND to_entity_id = ?4",
        vec![
            libsql::Value::Text(link.from_entity_kind.as_str().into()),
            libsql::Value::Integer(link.from_entity_id),
            libsql::Value::Text(link.to_entity_kind.as_str().into()),
            libsql::Value::Integer(link.to_entity_id),
        ],
    )
    .await?;
    if duplicates > 0 {
        tracing::warn!(
            from = %link.from_entity_kind,
            from_id = link.from_entity_id,
            to = %link.to_entity_kind,
            to_id = link.to_entity_id,
            "duplicate active link"
        );
        return Err(CoreError::conflict(format!(
            "an active link {} {} -> {} {} already exists",
            link.from_entity_kind, link.from_entity_id, link.to_entity_kind, link.to_entity_id
        ))
        .into());
    }

    if cardinality == Cardinality::ManyToOne {
        let existing = count_active(
            conn,
            "from_entity_kind = ?1 AND from_entity_id = ?2 AND to_entity_kind = ?3",
            vec![
                libsql::Value::Text(link.from_entity_kind.as_str().into()),
                libsql::Value::Integer(link.from_entity_id),
                libsql::Value::Text(link.to_entity_kind.as_str().into()),
            ],
        )
        .await?;
        if existing > 0 {
            tracing::warn!(
                from = %link.from_entity_kind,
                from_id = link.from_entity_id,
                to = %link.to_entity_kind,
                "single-valued link already taken"
            );
            return Err(CoreError::conflict(format!(
                "{} {} already has an active link to a {}",
                link.from_entity_kind.label(),
                link.from_entity_id,
                link.to_entity_kind.label()
            ))
            .into());
        }
    }

    let from_entity_locations = non_empty(link.from_entity_locations.clone());
    let to_entity_locations = non_empty(link.to_entity_locations.clone());
    conn.execute(
        "INSERT INTO entity_links (status, from_entity_kind, from_entity_id, to_entity_kind,
             to_entity_id, from_entity_locations, to_entity_locations, created_at, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        libsql::params![
            StatusKind::Draft.as_str(),
            link.from_entity_kind.as_str(),
            link.from_entity_id,
            link.to_entity_kind.as_str(),
            link.to_entity_id,
            from_entity_locations.clone(),
            to_entity_locations.clone(),
            now.to_rfc3339(),
            user
        ],
    )
    .await?;
    let id = conn.last_insert_rowid();
    let entry = append_log(conn, now, TransactionKind::Created, EntityKind::EntityLink, id, user)
        .await?;

    Ok(EntityLink {
        id,
        status: StatusKind::Draft,
        from_entity_kind: link.from_entity_kind,
        from_entity_id: link.from_entity_id,
        to_entity_kind: link.to_entity_kind,
        to_entity_id: link.to_entity_id,
        from_entity_locations,
        to_entity_locations,
        created_at: now,
        created_by: user.to_string(),
        updated_at: None,
        updated_by: None,
        log: vec![entry],
    })
}

fn invalid_transition(link: &EntityLink, to: StatusKind) -> DatabaseError {
    tracing::warn!(id = link.id, from = %link.status, to = %to, "rejected link transition");
    CoreError::InvalidTransition {
        kind: EntityKind::EntityLink,
        id: link.id,
        from: link.status,
        to,
    }
    .into()
}

async fn write_link_status(
    conn: &libsql::Connection,
    user: &str,
    now: DateTime<Utc>,
    id: i64,
    to: StatusKind,
) -> Result<EntityLink, DatabaseError> {
    let current = fetch_link(conn, id).await?;
    if !current.status.can_transition_to(to) {
        return Err(invalid_transition(&current, to));
    }
    conn.execute(
        "UPDATE entity_links SET status = ?1, updated_at = ?2, updated_by = ?3 WHERE id = ?4",
        libsql::params![to.as_str(), now.to_rfc3339(), user, id],
    )
    .await?;
    let tk = if to == StatusKind::Deleted {
        TransactionKind::Deleted
    } else {
        TransactionKind::Updated
    };
    append_log(conn, now, tk, EntityKind::EntityLink, id, user).await?;

    with_log(conn, EntityLink {
        status: to,
        updated_at: Some(now),
        updated_by: Some(user.to_string()),
        ..current
    })
    .await
}

impl EvService {
    /// Create a link in `DRA` with a single `CRE` entry.
    ///
    /// # Errors
    ///
    /// `Validation` for a self-link or a pairing the adjacency table forbids,
    /// or a deleted endpoint; `NotFound` for a missing endpoint; `Conflict`
    /// for a duplicate active tuple or a taken single-valued slot.
    pub async fn create_link(&self, link: NewLink) -> Result<EntityLink, DatabaseError> {
        let user = self.authorize(Authority::Link)?;
        let cardinality = validate_new_link(&link)?;

        let _gate = self.write_gate("create link").await?;
        let tx = self.begin().await?;
        let result = insert_link(&tx, &user, Utc::now(), &link, cardinality).await;
        let created = finish(tx, result).await?;

        tracing::debug!(id = created.id, user, "created link");
        Ok(created)
    }

    /// Create every link in `links`, or none of them.
    ///
    /// # Errors
    ///
    /// The first failure of any element, after which nothing from the batch
    /// remains.
    pub async fn create_links(&self, links: Vec<NewLink>) -> Result<Vec<EntityLink>, DatabaseError> {
        let user = self.authorize(Authority::Link)?;
        let rules = links
            .iter()
            .map(validate_new_link)
            .collect::<Result<Vec<_>, _>>()?;

        let _gate = self.write_gate("create links").await?;
        let tx = self.begin().await?;
        let now = Utc::now();
        let result: Result<_, DatabaseError> = async {
            let mut created = Vec::with_capacity(links.len());
            for (link, cardinality) in links.iter().zip(rules) {
                created.push(insert_link(&tx, &user, now, link, cardinality).await?);
            }
            Ok(created)
        }
        .await;
        let created = finish(tx, result).await?;

        tracing::debug!(count = created.len(), user, "created link batch");
        Ok(created)
    }

    /// Replace a link's location notes and append an `UPD` entry.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `InvalidTransition` if the link is deleted.
    pub async fn update_link(
        &self,
        id: i64,
        from_entity_locations: Option<String>,
        to_entity_locations: Option<String>,
    ) -> Result<EntityLink, DatabaseError> {
        let user = self.authorize(Authority::Link)?;
        let from_entity_locations = non_empty(from_entity_locations);
        let to_entity_locations = non_empty(to_entity_locations);

        let _gate = self.write_gate("update link").await?;
        let tx = self.begin().await?;
        let now = Utc::now();
        let result: Result<_, DatabaseError> = async {
            let current = fetch_link(&tx, id).await?;
            if current.status.is_terminal() {
                return Err(invalid_transition(&current, current.status));
            }
            tx.execute(
                "UPDATE entity_links SET from_entity_locations = ?1, to_entity_locations = ?2,
                     updated_at = ?3, updated_by = ?4
                 WHERE id = ?5",
                libsql::params![
                    from_entity_locations.clone(),
                    to_entity_locations.clone(),
                    now.to_rfc3339(),
                    user.as_str(),
                    id
                ],
            )
            .await?;
            append_log(&tx, now, TransactionKind::Updated, EntityKind::EntityLink, id, &user)
                .await?;
            with_log(&tx, EntityLink {
                from_entity_locations,
                to_entity_locations,
                updated_at: Some(now),
                updated_by: Some(user.clone()),
                ..current
            })
            .await
        }
        .await;
        let link = finish(tx, result).await?;

        tracing::debug!(id, user, "updated link");
        Ok(link)
    }

    /// Move a link along the lifecycle; `DEL` routes to [`Self::delete_link`].
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `InvalidTransition` for an illegal move.
    pub async fn set_link_status(
        &self,
        id: i64,
        status: StatusKind,
    ) -> Result<EntityLink, DatabaseError> {
        if status == StatusKind::Deleted {
            return self.delete_link(id).await;
        }
        let user = self.authorize(Authority::Link)?;

        let _gate = self.write_gate("change link status").await?;
        let tx = self.begin().await?;
        let result = write_link_status(&tx, &user, Utc::now(), id, status).await;
        let link = finish(tx, result).await?;

        tracing::debug!(id, status = %status, user, "changed link status");
        Ok(link)
    }

    /// Soft-delete a link. It no longer counts as an active edge.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `InvalidTransition` if already deleted.
    pub async fn delete_link(&self, id: i64) -> Result<EntityLink, DatabaseError> {
        let user = self.authorize(Authority::Link)?;

        let _gate = self.write_gate("delete link").await?;
        let tx = self.begin().await?;
        let result = write_link_status(&tx, &user, Utc::now(), id, StatusKind::Deleted).await;
        let link = finish(tx, result).await?;

        tracing::debug!(id, user, "deleted link");
        Ok(link)
    }

    /// Read one link with its log.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub async fn get_link(&self, id: i64) -> Result<EntityLink, DatabaseError> {
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        let link = fetch_link(conn, id).await?;
        with_log(conn, link).await
    }

    /// Filtered, sorted, paginated link listing.
    ///
    /// `status` defaults to every non-deleted status; `from_*` and `to_*`
    /// constrain each end; a master anchor matches either end.
    ///
    /// # Errors
    ///
    /// `Validation` for record-only filter dimensions, an unknown sort
    /// property or a bad page request.
    pub async fn list_links(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: PageSpec,
    ) -> Result<Page<EntityLink>, DatabaseError> {
        filter.validate_for_links()?;
        page.validate(self.settings().max_page_size)?;
        let plan = SortPlan::compile(sort, |name| find_field(LINK_FIELDS, name))?;

        let statuses = filter.effective_statuses();
        let mut params: Vec<libsql::Value> = statuses
            .iter()
            .map(|s| libsql::Value::Text(s.as_str().into()))
            .collect();
        let mut conditions = vec![format!("status IN ({})", placeholders(1, statuses.len()))];

        let mut push = |column: &str, value: libsql::Value| {
            params.push(value);
            conditions.push(format!("{column} = ?{}", params.len()));
        };
        if let Some(kind) = filter.from_entity_kind {
            push("from_entity_kind", libsql::Value::Text(kind.as_str().into()));
        }
        if let Some(id) = filter.from_entity_id {
            push("from_entity_id", libsql::Value::Integer(id));
        }
        if let Some(kind) = filter.to_entity_kind {
            push("to_entity_kind", libsql::Value::Text(kind.as_str().into()));
        }
        if let Some(id) = filter.to_entity_id {
            push("to_entity_id", libsql::Value::Integer(id));
        }
        if let Some((kind, id)) = filter.master() {
            params.push(libsql::Value::Text(kind.as_str().into()));
            let k = params.len();
            params.push(libsql::Value::Integer(id));
            let i = params.len();
            conditions.push(format!(
                "((from_entity_kind = ?{k} AND from_entity_id = ?{i}) \
                 OR (to_entity_kind = ?{k} AND to_entity_id = ?{i}))"
            ));
        }

        let sql = format!(
            "SELECT {LINK_COLUMNS} FROM entity_links WHERE {}",
            conditions.join(" AND ")
        );

        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        let mut links = Vec::new();
        while let Some(row) = rows.next().await? {
            links.push(row_to_link(&row)?);
        }
        let scanned = links.len();

        let mut page = paginate(plan.sort(links), page);
        let ids: Vec<i64> = page.content.iter().map(|l| l.id).collect();
        let mut logs = load_logs(conn, EntityKind::EntityLink, &ids).await?;
        for link in page.content_mut() {
            link.log = logs.remove(&link.id).unwrap_or_default();
        }

        tracing::debug!(
            scanned,
            sort_keys = plan.len(),
            returned = page.number_of_elements,
            "listed links"
        );
        Ok(page)
    }
}
