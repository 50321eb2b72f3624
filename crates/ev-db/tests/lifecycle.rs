//! Status lifecycle and audit log integration tests.
//!
//! - Claim create/update/delete scenario
//! - Log shape `CRE, UPD*, DEL?` across mixed operation sequences
//! - Every status pair against the transition table
//! - Concurrent mutations of one record
//! - Persistence across reopen

use chrono::Utc;
use pretty_assertions::assert_eq;
use rstest::rstest;

use ev_core::entities::{Claim, EntityData, TrackedEntity};
use ev_core::enums::{EntityKind, StatusKind, TransactionKind};
use ev_core::errors::CoreError;
use ev_core::identity::AuthIdentity;
use ev_db::service::EvService;

async fn test_service() -> EvService {
    EvService::new_local(":memory:", Some(AuthIdentity::admin("tester")))
        .await
        .unwrap()
}

fn claim(text: &str) -> EntityData {
    Claim {
        date: None,
        text: text.into(),
        notes: None,
    }
    .into()
}

fn transaction_kinds(entity: &TrackedEntity) -> Vec<TransactionKind> {
    entity.log.iter().map(|e| e.transaction_kind).collect()
}

/// `CRE` exactly once and first, then `UPD*`, then optionally a final `DEL`.
fn assert_log_shape(kinds: &[TransactionKind]) {
    assert_eq!(kinds.first(), Some(&TransactionKind::Created), "{kinds:?}");
    let tail = &kinds[1..];
    let body = match tail.split_last() {
        Some((TransactionKind::Deleted, body)) => body,
        _ => tail,
    };
    assert!(
        body.iter().all(|k| *k == TransactionKind::Updated),
        "{kinds:?}"
    );
}

// ---------------------------------------------------------------------------
// Scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn claim_create_update_delete() {
    let svc = test_service().await;
    let today = Utc::now().date_naive();
    let before = Utc::now();

    let created = svc
        .create_entity(Claim {
            date: Some(today),
            text: "Test text".into(),
            notes: Some("Test notes".into()),
        })
        .await
        .unwrap();
    assert_eq!(created.status, StatusKind::Draft);
    assert_eq!(transaction_kinds(&created), vec![TransactionKind::Created]);
    assert!((created.created_at - before).num_seconds().abs() <= 1);
    assert_eq!(created.created_by, "tester");

    let updated = svc
        .update_entity(
            created.id,
            Claim {
                date: Some(today),
                text: "Updated text".into(),
                notes: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.updated_by.as_deref(), Some("tester"));

    let deleted = svc
        .delete_entity(EntityKind::Claim, created.id)
        .await
        .unwrap();
    assert_eq!(deleted.status, StatusKind::Deleted);
    assert_eq!(
        transaction_kinds(&deleted),
        vec![
            TransactionKind::Created,
            TransactionKind::Updated,
            TransactionKind::Deleted
        ]
    );
    assert_eq!(
        deleted.last_log().map(|e| e.user.as_str()),
        Some("tester")
    );
}

// ---------------------------------------------------------------------------
// Log shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Op {
    Update,
    Status(StatusKind),
    Delete,
}

#[rstest]
#[case(&[Op::Update, Op::Update, Op::Delete])]
#[case(&[Op::Delete, Op::Update, Op::Status(StatusKind::Published), Op::Delete])]
#[case(&[Op::Status(StatusKind::Published), Op::Status(StatusKind::Draft), Op::Update])]
#[case(&[Op::Status(StatusKind::Suspended), Op::Status(StatusKind::Suspended), Op::Status(StatusKind::Deleted)])]
#[case(&[Op::Status(StatusKind::Published), Op::Status(StatusKind::Suspended), Op::Update, Op::Delete, Op::Delete])]
#[tokio::test]
async fn log_keeps_its_shape(#[case] ops: &[Op]) {
    let svc = test_service().await;
    let entity = svc.create_entity(claim("x")).await.unwrap();
    let mut expected_len = 1;

    for op in ops {
        let result = match op {
            Op::Update => svc.update_entity(entity.id, claim("y")).await,
            Op::Status(s) => svc.set_status(EntityKind::Claim, entity.id, *s).await,
            Op::Delete => svc.delete_entity(EntityKind::Claim, entity.id).await,
        };
        if result.is_ok() {
            expected_len += 1;
        }
        let current = svc.get_entity(EntityKind::Claim, entity.id).await.unwrap();
        assert_eq!(current.log.len(), expected_len, "after {op:?}");
        assert_log_shape(&transaction_kinds(&current));
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

const LEGAL: [(StatusKind, StatusKind); 7] = [
    (StatusKind::Draft, StatusKind::Published),
    (StatusKind::Draft, StatusKind::Suspended),
    (StatusKind::Draft, StatusKind::Deleted),
    (StatusKind::Published, StatusKind::Suspended),
    (StatusKind::Published, StatusKind::Deleted),
    (StatusKind::Suspended, StatusKind::Published),
    (StatusKind::Suspended, StatusKind::Deleted),
];

async fn entity_in(svc: &EvService, status: StatusKind) -> TrackedEntity {
    let entity = svc.create_entity(claim("x")).await.unwrap();
    match status {
        StatusKind::Draft => entity,
        StatusKind::Deleted => svc
            .delete_entity(EntityKind::Claim, entity.id)
            .await
            .unwrap(),
        other => svc
            .set_status(EntityKind::Claim, entity.id, other)
            .await
            .unwrap(),
    }
}

#[tokio::test]
async fn every_status_pair_follows_the_table() {
    let svc = test_service().await;
    for from in StatusKind::ALL {
        for to in StatusKind::ALL {
            let entity = entity_in(&svc, from).await;
            let result = svc.set_status(EntityKind::Claim, entity.id, to).await;
            let legal = LEGAL.contains(&(from, to));
            assert_eq!(result.is_ok(), legal, "{from} -> {to}: {result:?}");

            let current = svc.get_entity(EntityKind::Claim, entity.id).await.unwrap();
            if legal {
                assert_eq!(current.status, to);
                let expected = if to == StatusKind::Deleted {
                    TransactionKind::Deleted
                } else {
                    TransactionKind::Updated
                };
                assert_eq!(current.last_log().map(|e| e.transaction_kind), Some(expected));
            } else {
                assert_eq!(current.status, from);
                let err = result.unwrap_err();
                assert!(matches!(
                    err.as_core(),
                    Some(CoreError::InvalidTransition { .. })
                ));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_updates_each_leave_one_entry() {
    let svc = test_service().await;
    let id = svc.create_entity(claim("start")).await.unwrap().id;

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let svc = svc.clone();
            tokio::spawn(async move {
                svc.update_entity(id, claim(&format!("edit {i}")))
                    .await
                    .map(|_| ())
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let current = svc.get_entity(EntityKind::Claim, id).await.unwrap();
    assert_eq!(current.log.len(), 17);
    assert_log_shape(&transaction_kinds(&current));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_deletes_succeed_once() {
    let svc = test_service().await;
    let id = svc.create_entity(claim("x")).await.unwrap().id;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let svc = svc.clone();
            tokio::spawn(async move { svc.delete_entity(EntityKind::Claim, id).await })
        })
        .collect();
    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let log = svc.entity_log(EntityKind::Claim, id).await.unwrap();
    assert_eq!(log.len(), 2);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn records_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evidence.db");
    let path = path.to_str().unwrap();

    let id = {
        let svc = EvService::new_local(path, Some(AuthIdentity::admin("tester")))
            .await
            .unwrap();
        let entity = svc.create_entity(claim("durable")).await.unwrap();
        svc.set_status(EntityKind::Claim, entity.id, StatusKind::Published)
            .await
            .unwrap();
        entity.id
    };

    let svc = EvService::new_local(path, None).await.unwrap();
    let entity = svc.get_entity(EntityKind::Claim, id).await.unwrap();
    assert_eq!(entity.status, StatusKind::Published);
    assert_eq!(
        transaction_kinds(&entity),
        vec![TransactionKind::Created, TransactionKind::Updated]
    );
}
