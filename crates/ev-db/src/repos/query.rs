//! Query engine over record entities.
//!
//! Status, topic and master dimensions become conjunctive SQL conditions on
//! one scan of the kind; the topic and master candidate sets stay inside the
//! statement as subqueries. Free text, sorting and pagination run in memory
//! through the registry, so every kind shares one code path.

use ev_core::entities::TrackedEntity;
use ev_core::enums::EntityKind;
use ev_core::query::{FilterSpec, Page, PageSpec, SortPlan, SortSpec, paginate};
use ev_core::registry;

use super::audit::load_logs;
use super::entity::{ENTITY_COLUMNS, require_entity, row_to_entity};
use super::graph::{TOPIC_NEIGHBOURS, master_neighbours};
use super::topic::topic_scope_cte;
use crate::error::DatabaseError;
use crate::helpers::placeholders;
use crate::service::EvService;

impl EvService {
    /// Filter, sort and paginate records of one kind.
    ///
    /// Filter dimensions combine conjunctively. Sorting applies the given
    /// keys in order and always breaks ties by ascending id, so repeated
    /// queries over an unchanged store return identical pages. Only the
    /// returned page's rows carry their logs.
    ///
    /// # Errors
    ///
    /// `Validation` for an edge kind, a malformed filter, an unknown sort
    /// property or a bad page request; `NotFound` for a missing topic or
    /// master anchor.
    pub async fn query(
        &self,
        kind: EntityKind,
        filter: &FilterSpec,
        sort: &SortSpec,
        page: PageSpec,
    ) -> Result<Page<TrackedEntity>, DatabaseError> {
        let descriptor = registry::record_descriptor(kind)?;
        filter.validate_for_records()?;
        page.validate(self.settings().max_page_size)?;
        let plan = SortPlan::compile(sort, |name| descriptor.field(name))?;
        if let Some((master_kind, _)) = filter.master() {
            registry::record_descriptor(master_kind)?;
        }

        let _gate = self.read_gate().await;
        let conn = self.db().conn();

        let statuses = filter.effective_statuses();
        let mut params: Vec<libsql::Value> = vec![libsql::Value::Text(kind.as_str().into())];
        params.extend(
            statuses
                .iter()
                .map(|s| libsql::Value::Text(s.as_str().into())),
        );
        let mut conditions = vec![
            "kind = ?1".to_string(),
            format!("status IN ({})", placeholders(2, statuses.len())),
        ];
        let mut scope_cte = None;
        if let Some(topic_id) = filter.topic_id {
            require_entity(conn, EntityKind::Topic, topic_id).await?;
            params.push(libsql::Value::Integer(topic_id));
            scope_cte = Some(topic_scope_cte(params.len(), filter.is_recursive()));
            conditions.push(format!(
                "id IN (SELECT entity_id FROM ({TOPIC_NEIGHBOURS}) WHERE entity_kind = ?1)"
            ));
        }
        if let Some((master_kind, master_id)) = filter.master() {
            require_entity(conn, master_kind, master_id).await?;
            params.push(libsql::Value::Text(master_kind.as_str().into()));
            params.push(libsql::Value::Integer(master_id));
            conditions.push(format!(
                "id IN (SELECT entity_id FROM ({}) WHERE entity_kind = ?1)",
                master_neighbours(params.len() - 1, params.len())
            ));
        }

        let with = scope_cte.map_or_else(String::new, |cte| format!("WITH RECURSIVE {cte} "));
        let sql = format!(
            "{with}SELECT {ENTITY_COLUMNS} FROM entities WHERE {}",
            conditions.join(" AND ")
        );
        let mut rows_scanned = Vec::new();
        let mut rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        while let Some(row) = rows.next().await? {
            rows_scanned.push(row_to_entity(&row)?);
        }
        let scanned = rows_scanned.len();

        let matched = match filter.text_needle() {
            Some(needle) => rows_scanned
                .into_iter()
                .filter(|e| descriptor.matches_text(e, &needle))
                .collect(),
            None => rows_scanned,
        };

        let mut page = paginate(plan.sort(matched), page);
        let ids: Vec<i64> = page.content.iter().map(|e| e.id).collect();
        let mut logs = load_logs(conn, kind, &ids).await?;
        for entity in page.content_mut() {
            entity.log = logs.remove(&entity.id).unwrap_or_default();
        }

        tracing::debug!(
            %kind,
            scanned,
            topic_id = filter.topic_id,
            anchored_to_master = filter.master().is_some(),
            sort_keys = plan.len(),
            total = page.total_elements,
            returned = page.number_of_elements,
            "query"
        );
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::helpers::{
        LARGE_SCOPE, bulk_claims, bulk_links_from, bulk_topic_refs, claim, seed_nine_claims,
        test_service, topic,
    };
    use ev_core::enums::{NullHandling, StatusKind};
    use ev_core::errors::CoreError;
    use ev_core::query::OrderSpec;

    fn texts(page: &Page<TrackedEntity>) -> Vec<String> {
        page.content
            .iter()
            .map(|e| match &e.data {
                ev_core::entities::EntityData::Claim(c) => c.text.clone(),
                other => panic!("unexpected payload {other:?}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn case_sensitive_sort_puts_uppercase_first() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;

        let page = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default(),
                &SortSpec::by([OrderSpec::asc("text")]),
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert_eq!(
            texts(&page),
            vec![
                "CLAIM EIGHT",
                "CLAIM FIVE",
                "CLAIM NINE",
                "CLAIM SIX",
                "Claim four",
                "Claim one",
                "Claim seven",
                "Claim three",
                "Claim two",
            ]
        );
        assert!(page.content.iter().all(|e| e.log.len() == 1));
    }

    #[tokio::test]
    async fn case_insensitive_sort_interleaves() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;

        let page = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default(),
                &SortSpec::by([OrderSpec::asc("text").ignoring_case()]),
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert_eq!(
            texts(&page),
            vec![
                "CLAIM EIGHT",
                "CLAIM FIVE",
                "Claim four",
                "CLAIM NINE",
                "Claim one",
                "Claim seven",
                "CLAIM SIX",
                "Claim three",
                "Claim two",
            ]
        );
    }

    #[tokio::test]
    async fn deleted_rows_need_explicit_status() {
        let svc = test_service().await;
        let claims = seed_nine_claims(&svc).await;
        svc.delete_entity(EntityKind::Claim, claims[3].id)
            .await
            .unwrap();

        let unsorted = SortSpec::default();
        let live = svc
            .query(EntityKind::Claim, &FilterSpec::default(), &unsorted, PageSpec::unpaged())
            .await
            .unwrap();
        assert_eq!(live.total_elements, 8);

        let deleted = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default().with_status([StatusKind::Deleted]),
                &unsorted,
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert_eq!(deleted.total_elements, 1);
        assert_eq!(deleted.content[0].id, claims[3].id);
    }

    #[tokio::test]
    async fn text_filter_is_case_insensitive() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;
        let page = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default().with_text("claim s"),
                &SortSpec::default(),
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert_eq!(texts(&page), vec!["CLAIM SIX", "Claim seven"]);
    }

    #[tokio::test]
    async fn text_filter_keeps_whitespace_literal() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;
        let run = |text: &'static str| {
            let svc = svc.clone();
            async move {
                svc.query(
                    EntityKind::Claim,
                    &FilterSpec::default().with_text(text),
                    &SortSpec::default(),
                    PageSpec::unpaged(),
                )
                .await
                .unwrap()
            }
        };

        assert!(run("one ").await.is_empty);
        assert_eq!(texts(&run(" one").await), vec!["Claim one"]);
        assert_eq!(run("   ").await.total_elements, 9);
    }

    #[tokio::test]
    async fn nulls_follow_requested_handling() {
        let svc = test_service().await;
        let dated = svc
            .create_entity(ev_core::entities::Claim {
                date: chrono::NaiveDate::from_ymd_opt(2020, 1, 1),
                text: "dated".into(),
                notes: None,
            })
            .await
            .unwrap();
        let undated = svc.create_entity(claim("undated")).await.unwrap();

        let ids = |page: Page<TrackedEntity>| page.content.iter().map(|e| e.id).collect::<Vec<_>>();
        let run = |order: OrderSpec| {
            let svc = svc.clone();
            async move {
                svc.query(
                    EntityKind::Claim,
                    &FilterSpec::default(),
                    &SortSpec::by([order]),
                    PageSpec::unpaged(),
                )
                .await
                .unwrap()
            }
        };

        assert_eq!(ids(run(OrderSpec::asc("date")).await), vec![undated.id, dated.id]);
        assert_eq!(ids(run(OrderSpec::desc("date")).await), vec![dated.id, undated.id]);
        assert_eq!(
            ids(run(OrderSpec::asc("date").nulls(NullHandling::NullsLast)).await),
            vec![dated.id, undated.id]
        );
    }

    #[tokio::test]
    async fn topic_and_master_dimensions_intersect() {
        let svc = test_service().await;
        let t = svc.create_entity(topic("T", None)).await.unwrap();
        let a = svc.create_entity(claim("A")).await.unwrap();
        let b = svc.create_entity(claim("B")).await.unwrap();
        let m = svc.create_entity(claim("M")).await.unwrap();
        for id in [a.id, b.id] {
            svc.create_topic_ref(ev_core::entities::NewTopicRef {
                topic_id: t.id,
                entity_kind: EntityKind::Claim,
                entity_id: id,
                locations: None,
            })
            .await
            .unwrap();
        }
        svc.create_link(ev_core::entities::NewLink::new(
            EntityKind::Claim,
            m.id,
            EntityKind::Claim,
            b.id,
        ))
        .await
        .unwrap();

        let page = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default()
                    .with_topic(t.id, false)
                    .with_master(EntityKind::Claim, m.id),
                &SortSpec::default(),
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert_eq!(page.content.iter().map(|e| e.id).collect::<Vec<_>>(), vec![b.id]);

        let none = svc
            .query(
                EntityKind::Person,
                &FilterSpec::default().with_topic(t.id, false),
                &SortSpec::default(),
                PageSpec::unpaged(),
            )
            .await
            .unwrap();
        assert!(none.is_empty);
        assert_eq!(none.total_pages, 1);
    }

    #[tokio::test]
    async fn malformed_requests_are_validation_errors() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;
        let cases = [
            (
                EntityKind::Claim,
                FilterSpec::default(),
                SortSpec::by([OrderSpec::asc("last_name")]),
                PageSpec::unpaged(),
            ),
            (
                EntityKind::TopicRef,
                FilterSpec::default(),
                SortSpec::default(),
                PageSpec::unpaged(),
            ),
            (
                EntityKind::Claim,
                FilterSpec {
                    master_entity_kind: Some(EntityKind::Claim),
                    ..FilterSpec::default()
                },
                SortSpec::default(),
                PageSpec::unpaged(),
            ),
            (
                EntityKind::Claim,
                FilterSpec::default(),
                SortSpec::default(),
                PageSpec::of(-1, 5),
            ),
            (
                EntityKind::Claim,
                FilterSpec::default(),
                SortSpec::default(),
                PageSpec::of(0, 1_000_000),
            ),
        ];
        for (kind, filter, sort, page) in cases {
            let err = svc.query(kind, &filter, &sort, page).await.unwrap_err();
            assert!(
                matches!(err.as_core(), Some(CoreError::Validation(_))),
                "{kind} {filter:?} {sort:?} {page:?}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn unpaged_and_anchored_queries_cover_large_stores() {
        let svc = test_service().await;
        bulk_claims(&svc, LARGE_SCOPE).await;
        let t = svc.create_entity(topic("T", None)).await.unwrap();
        let master = svc.create_entity(claim("Master")).await.unwrap();
        bulk_topic_refs(&svc, t.id).await;
        bulk_links_from(&svc, EntityKind::Claim, master.id).await;

        let run = |filter: FilterSpec| {
            let svc = svc.clone();
            async move {
                svc.query(
                    EntityKind::Claim,
                    &filter,
                    &SortSpec::default(),
                    PageSpec::unpaged(),
                )
                .await
                .unwrap()
            }
        };

        let all = run(FilterSpec::default()).await;
        assert_eq!(all.content.len(), LARGE_SCOPE + 1);
        assert_eq!(all.total_pages, 1);
        assert!(all.content.iter().all(|e| e.log.len() == 1));

        let by_topic = run(FilterSpec::default().with_topic(t.id, true)).await;
        assert_eq!(by_topic.content.len(), LARGE_SCOPE + 1);

        let by_master = run(FilterSpec::default().with_master(EntityKind::Claim, master.id)).await;
        assert_eq!(by_master.content.len(), LARGE_SCOPE);
        assert!(by_master.content.iter().all(|e| e.id != master.id));

        let both = run(
            FilterSpec::default()
                .with_topic(t.id, false)
                .with_master(EntityKind::Claim, master.id),
        )
        .await;
        assert_eq!(both.content.len(), LARGE_SCOPE);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty() {
        let svc = test_service().await;
        seed_nine_claims(&svc).await;
        let page = svc
            .query(
                EntityKind::Claim,
                &FilterSpec::default(),
                &SortSpec::default(),
                PageSpec::of(5, 4),
            )
            .await
            .unwrap();
        assert!(page.is_empty);
        assert_eq!(page.total_elements, 9);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_next);
    }
}
