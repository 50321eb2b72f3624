//! Relationship graph traversal.
//!
//! Links are stored directionally but traversed as undirected: an entity is
//! reachable from an anchor when an active link has the anchor at either end.

use std::collections::BTreeSet;

use ev_core::entities::EntityRef;
use ev_core::enums::EntityKind;

use super::entity::require_entity;
use super::topic::topic_scope_cte;
use crate::error::DatabaseError;
use crate::helpers::parse_enum;
use crate::service::EvService;

/// `(entity_kind, entity_id)` rows attached to any topic in `topic_scope`
/// (see [`topic_scope_cte`]) by a topic reference or an active link at
/// either end.
pub(crate) const TOPIC_NEIGHBOURS: &str = "
    SELECT entity_kind, entity_id FROM topic_refs
    WHERE topic_id IN (SELECT id FROM topic_scope)
    UNION
    SELECT to_entity_kind, to_entity_id FROM entity_links
    WHERE status <> 'DEL' AND from_entity_kind = 'TOP'
      AND from_entity_id IN (SELECT id FROM topic_scope)
    UNION
    SELECT from_entity_kind, from_entity_id FROM entity_links
    WHERE status <> 'DEL' AND to_entity_kind = 'TOP'
      AND to_entity_id IN (SELECT id FROM topic_scope)";

/// `(entity_kind, entity_id)` rows one active link hop from the entity bound
/// to `?{kind_param}` and `?{id_param}`, in either direction.
pub(crate) fn master_neighbours(kind_param: usize, id_param: usize) -> String {
    format!(
        "SELECT to_entity_kind AS entity_kind, to_entity_id AS entity_id FROM entity_links
         WHERE status <> 'DEL' AND from_entity_kind = ?{kind_param} AND from_entity_id = ?{id_param}
         UNION
         SELECT from_entity_kind, from_entity_id FROM entity_links
         WHERE status <> 'DEL' AND to_entity_kind = ?{kind_param} AND to_entity_id = ?{id_param}"
    )
}

async fn collect_refs(
    conn: &libsql::Connection,
    sql: &str,
    params: Vec<libsql::Value>,
) -> Result<BTreeSet<EntityRef>, DatabaseError> {
    let mut refs = BTreeSet::new();
    let mut rows = conn.query(sql, libsql::params_from_iter(params)).await?;
    while let Some(row) = rows.next().await? {
        refs.insert(EntityRef::new(
            parse_enum(&row.get::<String>(0)?)?,
            row.get::<i64>(1)?,
        ));
    }
    Ok(refs)
}

/// Entities one active link hop from `(kind, id)`, in either direction.
pub(crate) async fn linked_to_master(
    conn: &libsql::Connection,
    kind: EntityKind,
    id: i64,
) -> Result<BTreeSet<EntityRef>, DatabaseError> {
    collect_refs(
        conn,
        &master_neighbours(1, 2),
        vec![
            libsql::Value::Text(kind.as_str().into()),
            libsql::Value::Integer(id),
        ],
    )
    .await
}

/// Entities attached to `topic_id` (and, when `recursive`, to any of its
/// descendants) by a topic reference or an active link at either end.
pub(crate) async fn linked_to_topic(
    conn: &libsql::Connection,
    topic_id: i64,
    recursive: bool,
) -> Result<BTreeSet<EntityRef>, DatabaseError> {
    let sql = format!(
        "WITH RECURSIVE {} {TOPIC_NEIGHBOURS}",
        topic_scope_cte(1, recursive)
    );
    collect_refs(conn, &sql, vec![libsql::Value::Integer(topic_id)]).await
}

impl EvService {
    /// Entities linked to a topic, directly or (when `recursive`) through any
    /// descendant topic. Sorted by kind, then id.
    ///
    /// # Errors
    ///
    /// `NotFound` if `topic_id` is not a topic.
    pub async fn entities_linked_to_topic(
        &self,
        topic_id: i64,
        recursive: bool,
    ) -> Result<Vec<EntityRef>, DatabaseError> {
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        require_entity(conn, EntityKind::Topic, topic_id).await?;
        let refs = linked_to_topic(conn, topic_id, recursive).await?;
        tracing::debug!(topic_id, recursive, found = refs.len(), "resolved topic neighbours");
        Ok(refs.into_iter().collect())
    }

    /// Entities one active link away from the master entity, whichever end
    /// the master occupies. Sorted by kind, then id.
    ///
    /// # Errors
    ///
    /// `NotFound` if the master does not exist as `master_kind`; `Validation`
    /// if `master_kind` is an edge kind.
    pub async fn entities_linked_to_master(
        &self,
        master_kind: EntityKind,
        master_id: i64,
    ) -> Result<Vec<EntityRef>, DatabaseError> {
        ev_core::registry::record_descriptor(master_kind)?;
        let _gate = self.read_gate().await;
        let conn = self.db().conn();
        require_entity(conn, master_kind, master_id).await?;
        let refs = linked_to_master(conn, master_kind, master_id).await?;
        tracing::debug!(%master_kind, master_id, found = refs.len(), "resolved master neighbours");
        Ok(refs.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{LARGE_SCOPE, bulk_topics, claim, test_service, topic};
    use ev_core::entities::{NewLink, NewTopicRef};
    use ev_core::errors::CoreError;

    #[tokio::test]
    async fn master_lookup_is_direction_agnostic() {
        let svc = test_service().await;
        let a = svc.create_entity(claim("A")).await.unwrap();
        let b = svc.create_entity(claim("B")).await.unwrap();
        let c = svc.create_entity(claim("C")).await.unwrap();
        svc.create_link(NewLink::new(EntityKind::Claim, a.id, EntityKind::Claim, b.id))
            .await
            .unwrap();
        let bc = svc
            .create_link(NewLink::new(EntityKind::Claim, b.id, EntityKind::Claim, c.id))
            .await
            .unwrap();

        assert_eq!(
            svc.entities_linked_to_master(EntityKind::Claim, a.id)
                .await
                .unwrap(),
            vec![EntityRef::new(EntityKind::Claim, b.id)]
        );
        assert_eq!(
            svc.entities_linked_to_master(EntityKind::Claim, b.id)
                .await
                .unwrap(),
            vec![
                EntityRef::new(EntityKind::Claim, a.id),
                EntityRef::new(EntityKind::Claim, c.id)
            ]
        );

        svc.delete_link(bc.id).await.unwrap();
        assert!(
            svc.entities_linked_to_master(EntityKind::Claim, c.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn topic_lookup_unions_refs_and_links() {
        let svc = test_service().await;
        let root = svc.create_entity(topic("Root", None)).await.unwrap();
        let child = svc.create_entity(topic("Child", Some(root.id))).await.unwrap();
        let a = svc.create_entity(claim("A")).await.unwrap();
        let b = svc.create_entity(claim("B")).await.unwrap();

        svc.create_topic_ref(NewTopicRef {
            topic_id: root.id,
            entity_kind: EntityKind::Claim,
            entity_id: a.id,
            locations: None,
        })
        .await
        .unwrap();
        svc.create_link(NewLink::new(EntityKind::Topic, child.id, EntityKind::Claim, b.id))
            .await
            .unwrap();

        let direct = svc.entities_linked_to_topic(root.id, false).await.unwrap();
        assert_eq!(direct, vec![EntityRef::new(EntityKind::Claim, a.id)]);

        let deep = svc.entities_linked_to_topic(root.id, true).await.unwrap();
        assert_eq!(
            deep,
            vec![
                EntityRef::new(EntityKind::Claim, a.id),
                EntityRef::new(EntityKind::Claim, b.id)
            ]
        );
    }

    #[tokio::test]
    async fn recursive_lookup_spans_wide_subtrees() {
        let svc = test_service().await;
        let root = svc.create_entity(topic("Root", None)).await.unwrap();
        bulk_topics(&svc, root.id, LARGE_SCOPE).await;
        let last_child = svc.topic_children(root.id).await.unwrap().pop().unwrap();
        let a = svc.create_entity(claim("A")).await.unwrap();
        svc.create_link(NewLink::new(EntityKind::Topic, last_child.id, EntityKind::Claim, a.id))
            .await
            .unwrap();

        assert!(svc.entities_linked_to_topic(root.id, false).await.unwrap().is_empty());
        assert_eq!(
            svc.entities_linked_to_topic(root.id, true).await.unwrap(),
            vec![EntityRef::new(EntityKind::Claim, a.id)]
        );
    }

    #[tokio::test]
    async fn anchors_must_exist() {
        let svc = test_service().await;
        let err = svc.entities_linked_to_topic(1, false).await.unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::NotFound { .. })));
        let err = svc
            .entities_linked_to_master(EntityKind::EntityLink, 1)
            .await
            .unwrap_err();
        assert!(matches!(err.as_core(), Some(CoreError::Validation(_))));
    }
}
