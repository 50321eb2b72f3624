//! Topic reference repository: the narrow Topic → entity edge.
//!
//! Topic references carry no status and are hard-deleted; their create,
//! update and delete are still recorded in the audit log under `TRF`.

use chrono::Utc;
use ev_core::entities::{NewTopicRef, TopicRef};
use ev_core::enums::{Authority, EntityKind, TransactionKind};
use ev_core::errors::CoreError;
use ev_core::query::{FilterSpec, Page, PageSpec, SortPlan, SortSpec, paginate};
use ev_core::registry::{self, TOPIC_REF_FIELDS, find_field};

use super::audit::append_log;
use super::entity::{require_active, require_entity};
use super::topic::topic_scope_cte;
use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, non_empty, parse_enum};
use crate::service::{EvService, finish};

const TOPIC_REF_COLUMNS: &str = "id, topic_id, entity_kind, entity_id, locations";

fn row_to_topic_ref(row: &libsql::Row) -> Result<TopicRef, DatabaseError> {
    Ok(TopicRef {
        id: row.get::<i64>(0)?,
        topic_id: row.get::<i64>(1)?,
        entity_kind: parse_enum(&row.get::<String>(2)?)?,
        entity_id: row.get::<i64>(3)?,
        locations: get_opt_string(row, 4)?,
    })
}

async fn fetch_topic_ref(conn: &libsql::Connection, id: i64) -> Result<TopicRef, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {TOPIC_REF_COLUMNS} FROM topic_refs WHERE id = ?1"),
            [id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => row_to_topic_ref(&row),
        None => Err(CoreError::NotFound {
            kind: EntityKind::TopicRef,
            id,
        }
        .into()),
    }
}

impl EvService {
    /// Attach an entity to a topic.
    ///
    /// # Errors
    ///
    /// `NotFound` for a missing topic or entity; `Validation` for a target
    /// kind topics may not reference or a deleted endpoint; `Conflict` if the
    /// reference already exists.
    pub async fn create_topic_ref(&self, new: NewTopicRef) -> Result<TopicRef, DatabaseError> {
        let user = self.authorize(Authority::Link)?;
        registry::topic_ref_rule(new.entity_kind)?;

        let locations = non_empty(new.locations.clone());

        let _gate = self.write_gate("create topic reference").await?;
        let tx = self.begin().await?;
        let now = Utc::now();
        let result: Result<_, DatabaseError> = async {
            require_active(&tx, EntityKind::Topic, new.topic_id, "topic").await?;
            require_active(&tx, new.entity_kind, new.entity_id, "target").await?;

            let mut rows = tx
                .query(
                    "SELECT id FROM topic_refs
                     WHERE topic_id = ?1 AND entity_kind = ?2 AND entity_id = ?3",
                    libsql::params![new.topic_id, new.entity_kind.as_str(), new.entity_id],
                )
                .await?;
            if let Some(row) = rows.next().await? {
                let existing = row.get::<i64>(0)?;
                tracing::warn!(existing, topic_id = new.topic_id, "duplicate topic reference");
                return Err(CoreError::conflict(format!(
                    "topic {} already references {} {} (reference {existing})",
                    new.topic_id, new.entity_kind, new.entity_id
                ))
                .into());
            }

            tx.execute(
                "INSERT INTO topic_refs (topic_id, entity_kind, entity_id, locations)
                 VALUES (?1, ?2, ?3, ?4)",
                libsql::params![
                    new.topic_id,
                    new.entity_kind.as_str(),
                    new.entity_id,
                    locations.clone()
                ],
            )
            .await?;
            let id = tx.last_insert_rowid();
            append_log(&tx, now, TransactionKind::Created, EntityKind::TopicRef, id, &user).await?;
            Ok(TopicRef {
                id,
                topic_id: new.topic_id,
                entity_kind: new.entity_kind,
                entity_id: new.entity_id,
                locations,
            })
        }
        .await;
        let created = finish(tx, result).await?;

        tracing::debug!(id = created.id, topic_id = created.topic_id, user, "created topic reference");
        Ok(created)
    }

    /// Replace a topic reference's location note.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub async fn update_topic_ref(
        &self,
        id: i64,
        locations: Option<String>,
    ) -> Result<TopicRef, DatabaseError> {
        let user = self.authorize(Authority::Link)?;
        let locations = non_empty(locations);

        let _gate = self.write_gate("update topic reference").await?;
        let tx = self.begin().await?;
        let result: Result<_, DatabaseError> = async {
            let current = fetch_topic_ref(&tx, id).await?;
            tx.execute(
                "UPDATE topic_refs SET locations = ?1 WHERE id = ?2",
                libsql::params![locations.clone(), id],
            )
            .await?;
            append_log(&tx, Utc::now(), TransactionKind::Updated, EntityKind::TopicRef, id, &user)
                .await?;
            Ok(TopicRef {
                locations,
                ..current
            })
        }
        .await;
        let updated = finish(tx, result).await?;

        tracing::debug!(id, user, "updated topic reference");
        Ok(updated)
    }

    /// Remove a topic reference. The row is gone; its log entries remain.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id.
    pub async fn delete_topic_ref(&self, id: i64) -> Result<TopicRef, DatabaseError> {
        let user = self.authorize(Authority::Link)?;

        let _gate = self.write_gate("delete topic reference").await?;
        let tx = self.begin().await?;
        let result: Result<_, DatabaseError> = async {
            let current = fetch_topic_ref(&tx, id).await?;
            tx.execute("DELETE FROM topic_refs WHERE id = ?1", [id]).await?;
            append_log(&tx, Utc::now(), TransactionKind::Deleted, EntityKind::TopicRef, id, &user)
                .await?;
            Ok(current)
        }
        .await;
        let deleted = finish(tx, result).await?;

        tracing::debug!(id, user, "deleted topic reference");
        Ok(deleted)
    }

    /// Filtered, sorted, paginated topic reference listing.
    ///
    /// `topic_id` (with `recursive`, its whole subtree) selects the topics;
    /// `to_entity_kind` and `to_entity_id` select the referenced entity.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown `topic_id`; `Validation` for dimensions
    /// topic references do not carry, an unknown sort property or a bad page
    /// request.
    pub async fn list_topic_refs(
        &self,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: PageSpec,
    ) -> Result<Page<TopicRef>, DatabaseError> {
        filter.validate_for_topic_refs()?;
        page.validate(self.settings().max_page_size)?;
        let plan = SortPlan::compile(sort, |name| find_field(TOPIC_REF_FIELDS, name))?;

        let _gate = self.read_gate().await;
        let conn = self.db().conn();

        let mut params: Vec<libsql::Value> = Vec::new();
        let mut conditions: Vec<String> = Vec::new();
        let mut with = String::new();
        if let Some(topic_id) = filter.topic_id {
            require_entity(conn, EntityKind::Topic, topic_id).await?;
            params.push(libsql::Value::Integer(topic_id));
            with = format!(
                "WITH RECURSIVE {} ",
                topic_scope_cte(params.len(), filter.is_recursive())
            );
            conditions.push("topic_id IN (SELECT id FROM topic_scope)".to_string());
        }
        if let Some(kind) = filter.to_entity_kind {
            params.push(libsql::Value::Text(kind.as_str().into()));
            conditions.push(format!("entity_kind = ?{}", params.len()));
        }
        if let Some(id) = filter.to_entity_id {
            params.push(libsql::Value::Integer(id));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let mut rows = conn
            .query(
                &format!("{with}SELECT {TOPIC_REF_COLUMNS} FROM topic_refs {where_clause}"),
                libsql::params_from_iter(params),
            )
            .await?;
        let mut refs = Vec::new();
        while let Some(row) = rows.next().await? {
            refs.push(row_to_topic_ref(&row)?);
        }

        let scanned = refs.len();
        let page = paginate(plan.sort(refs), page);
        tracing::debug!(scanned, returned = page.number_of_elements, "listed topic references");
        Ok(page)
    }
}
