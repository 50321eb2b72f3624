//! Topic hierarchy: descendant resolution and parent validation.
//!
//! The forest is stored as `entities.parent_id` on topic rows; children are
//! never stored, only derived.

use ev_core::entities::TrackedEntity;
use ev_core::enums::EntityKind;
use ev_core::errors::CoreError;

use super::audit::load_logs;
use super::entity::{ENTITY_COLUMNS, require_entity, row_to_entity};
use crate::error::DatabaseError;
use crate::service::EvService;

/// Common table expression `topic_scope(id)`: the topic bound to `?{param}`
/// and, when `recursive`, every topic below it at any depth.
///
/// Status is ignored: a deleted topic still anchors its subtree. Callers
/// prefix the statement with `WITH RECURSIVE`.
pub(crate) fn topic_scope_cte(param: usize, recursive: bool) -> String {
    if recursive {
        format!(
            "topic_scope(id) AS (
                 SELECT ?{param}
                 UNION
                 SELECT e.id FROM entities e JOIN topic_scope s ON e.parent_id = s.id
                 WHERE e.kind = 'TOP'
             )"
        )
    } else {
        format!("topic_scope(id) AS (SELECT ?{param})")
    }
}

/// Whether `candidate` is `topic_id` itself or lies anywhere below it.
async fn in_subtree(
    conn: &libsql::Connection,
    topic_id: i64,
    candidate: i64,
) -> Result<bool, DatabaseError> {
    let mut rows = conn
        .query(
            &format!(
                "WITH RECURSIVE {} SELECT 1 FROM topic_scope WHERE id = ?2 LIMIT 1",
                topic_scope_cte(1, true)
            ),
            [topic_id, candidate],
        )
        .await?;
    Ok(rows.next().await?.is_some())
}

/// Reject a `parent_id` for topic `topic_id` (`None` when the topic is new)
/// that is the topic itself or lies in its subtree.
///
/// That the parent exists and is a topic is checked with the other payload
/// references.
pub(crate) async fn check_parent(
    conn: &libsql::Connection,
    topic_id: Option<i64>,
    parent_id: i64,
) -> Result<(), DatabaseError> {
    if let Some(topic_id) = topic_id
        && in_subtree(conn, topic_id, parent_id).await?
    {
        tracing::warn!(topic_id, parent_id, "rejected cyclic topic parent");
        return Err(CoreError::validation(format!(
            "making topic {parent_id} the parent of topic {topic_id} would create a cycle"
        ))
        .into());
    }
    Ok(())
}

async fn load_topics(
    conn: &libsql::Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<Vec<TrackedEntity>, DatabaseError> {
    let mut rows = conn.query(sql, libsql::params_from_iter(params)).await?;
    let mut topics = Vec::new();
    while let Some(row) = rows.next().await? {
        topics.push(row_to_entity(&row)?);
    }

    let ids: Vec<i64> = topics.iter().map(|t| t.id).collect();
    let mut logs = load_logs(conn, EntityKind::Topic, &ids).await?;
    for topic in &mut topics {
        topic.log = logs.remove(&topic.id).unwrap_or_default();
    }
    Ok(topics)
}

impl EvService {
    /// Every topic below `topic_id` (transitive closure over `parent_id`),
    /// ordered by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if `topic_id` is not a topic.
    pub async fn descendants_of(&self, topic_id: i64) -> Result<Vec<TrackedEntity>, DatabaseError> {
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        require_entity(conn, EntityKind::Topic, topic_id).await?;

        let sql = format!(
            "WITH RECURSIVE {}
             SELECT {ENTITY_COLUMNS} FROM entities
             WHERE id IN (SELECT id FROM topic_scope) AND id <> ?1 ORDER BY id",
            topic_scope_cte(1, true)
        );
        load_topics(conn, &sql, vec![libsql::Value::Integer(topic_id)]).await
    }

    /// Direct children of `topic_id`, ordered by id.
    ///
    /// # Errors
    ///
    /// `NotFound` if `topic_id` is not a topic.
    pub async fn topic_children(&self, topic_id: i64) -> Result<Vec<TrackedEntity>, DatabaseError> {
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        require_entity(conn, EntityKind::Topic, topic_id).await?;

        let sql = format!(
            "SELECT {ENTITY_COLUMNS} FROM entities
             WHERE kind = 'TOP' AND parent_id = ?1 ORDER BY id"
        );
        load_topics(conn, &sql, vec![libsql::Value::Integer(topic_id)]).await
    }
}
