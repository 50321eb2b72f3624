//! Shared test utilities for ev-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use ev_core::entities::{Claim, EntityData, TrackedEntity, Topic};
    use ev_core::enums::{Authority, EntityKind, TransactionKind};
    use ev_core::identity::AuthIdentity;

    use crate::service::EvService;

    /// Texts of the nine-claim fixture, in creation order.
    pub const NINE_CLAIMS: [&str; 9] = [
        "Claim one",
        "Claim two",
        "Claim three",
        "Claim four",
        "CLAIM FIVE",
        "CLAIM SIX",
        "Claim seven",
        "CLAIM EIGHT",
        "CLAIM NINE",
    ];

    pub fn admin() -> AuthIdentity {
        AuthIdentity::admin("admin")
    }

    pub fn reader() -> AuthIdentity {
        AuthIdentity::new("reader", [Authority::Read])
    }

    pub const fn anonymous() -> Option<AuthIdentity> {
        None
    }

    /// In-memory service acting as `admin`.
    pub async fn test_service() -> EvService {
        EvService::new_local(":memory:", Some(admin())).await.unwrap()
    }

    pub fn claim(text: &str) -> EntityData {
        Claim {
            date: None,
            text: text.into(),
            notes: None,
        }
        .into()
    }

    pub fn topic(label: &str, parent_id: Option<i64>) -> EntityData {
        Topic {
            label: label.into(),
            description: None,
            parent_id,
        }
        .into()
    }

    pub fn transaction_kinds(entity: &TrackedEntity) -> Vec<TransactionKind> {
        entity.log.iter().map(|e| e.transaction_kind).collect()
    }

    /// More rows than `SQLite` accepts bound variables in one statement.
    pub const LARGE_SCOPE: usize = 33_000;

    const BULK_CREATED_AT: &str = "2026-01-01T00:00:00+00:00";

    /// Give every entity without a log its `CRE` entry.
    async fn backfill_logs(svc: &EvService) {
        svc.db()
            .conn()
            .execute(
                "INSERT INTO log_entries (timestamp, transaction_kind, entity_kind, entity_id, username)
                 SELECT e.created_at, 'CRE', e.kind, e.id, e.created_by FROM entities e
                 WHERE NOT EXISTS (
                     SELECT 1 FROM log_entries l WHERE l.entity_kind = e.kind AND l.entity_id = e.id
                 )",
                (),
            )
            .await
            .unwrap();
    }

    /// Insert `count` draft claims in a single statement, bypassing the
    /// service so large fixtures stay fast.
    pub async fn bulk_claims(svc: &EvService, count: usize) {
        svc.db()
            .conn()
            .execute(
                "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?1)
                 INSERT INTO entities (kind, status, data, created_at, created_by)
                 SELECT 'CLA', 'DRA', json_object('entity_kind', 'CLA', 'text', 'Bulk claim ' || i),
                        ?2, 'admin'
                 FROM n",
                libsql::params![i64::try_from(count).unwrap(), BULK_CREATED_AT],
            )
            .await
            .unwrap();
        backfill_logs(svc).await;
    }

    /// Insert `count` draft topics directly below `parent_id`.
    pub async fn bulk_topics(svc: &EvService, parent_id: i64, count: usize) {
        svc.db()
            .conn()
            .execute(
                "WITH RECURSIVE n(i) AS (SELECT 1 UNION ALL SELECT i + 1 FROM n WHERE i < ?1)
                 INSERT INTO entities (kind, status, parent_id, data, created_at, created_by)
                 SELECT 'TOP', 'DRA', ?3,
                        json_object('entity_kind', 'TOP', 'label', 'Bulk topic ' || i, 'parent_id', ?3),
                        ?2, 'admin'
                 FROM n",
                libsql::params![i64::try_from(count).unwrap(), BULK_CREATED_AT, parent_id],
            )
            .await
            .unwrap();
        backfill_logs(svc).await;
    }

    /// Reference every claim from `topic_id`.
    pub async fn bulk_topic_refs(svc: &EvService, topic_id: i64) {
        svc.db()
            .conn()
            .execute(
                "INSERT INTO topic_refs (topic_id, entity_kind, entity_id)
                 SELECT ?1, kind, id FROM entities WHERE kind = 'CLA'",
                [topic_id],
            )
            .await
            .unwrap();
    }

    /// Link `(kind, id)` to every claim.
    pub async fn bulk_links_from(svc: &EvService, kind: EntityKind, id: i64) {
        svc.db()
            .conn()
            .execute(
                "INSERT INTO entity_links (status, from_entity_kind, from_entity_id,
                     to_entity_kind, to_entity_id, created_at, created_by)
                 SELECT 'DRA', ?1, ?2, kind, id, ?3, 'admin'
                 FROM entities WHERE kind = 'CLA' AND id <> ?2",
                libsql::params![kind.as_str(), id, BULK_CREATED_AT],
            )
            .await
            .unwrap();
    }

    /// Create the nine fixture claims and return them in creation order.
    pub async fn seed_nine_claims(svc: &EvService) -> Vec<TrackedEntity> {
        let mut claims = Vec::with_capacity(NINE_CLAIMS.len());
        for text in NINE_CLAIMS {
            claims.push(svc.create_entity(claim(text)).await.unwrap());
        }
        claims
    }
}
