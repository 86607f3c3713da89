//! Macro-generated repository contract suite, run against any store.
//!
//! The `store_contract_tests!` macro generates a test module that drives a
//! `Repository` over the given store and checks the full contract: CRUD,
//! null-tolerant criteria, ordering, paging, counting and guarded deletes.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod storage_harness;
//!
//! use storage_harness::*;
//! use dao::storage::InMemoryStore;
//!
//! store_contract_tests!(InMemoryStore::new(test_registry()));
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_get_all_empty` — empty store returns an empty list
//! - `test_persist_and_find` — persist assigns an id, find returns the record
//! - `test_find_missing` — unknown id returns None
//! - `test_persist_duplicate_id` — second insert with the same id fails
//! - `test_merge_updates_in_place` — merge overwrites without duplicating
//! - `test_delete_by_id` / `test_delete_missing_id` — delete is a no-op when absent
//! - `test_delete_entity_detached` — stale instance is merged then removed
//!
//! ## Filters
//! - `test_greater_than_scenario` — A/B/C catalogue, `price > 15`
//! - `test_null_criteria_are_unconstrained` — unset values add no condition
//! - `test_and_or_composition`, `test_in_and_any_equals`, `test_text_matching`
//! - `test_nested_path` / `test_missing_relation` — dotted paths through a relation
//! - `test_filter_and_order_by_id` — the primary key, directly and through a relation
//! - `test_related_record_is_read_live` — paths see updates to the related record
//! - `test_unsaved_related_record_is_rejected` — relations need a persisted target
//! - `test_text_order_and_like_are_byte_wise` — byte order, literal backslash
//! - `test_invalid_paths` / `test_type_mismatch` — schema errors
//!
//! ## Ordering & Paging
//! - `test_order_directives_keep_order` — `["-price", "name"]`
//! - `test_pagination_window` — 5 items, limit 2, offset 2
//! - `test_page_and_first`, `test_count_ignores_paging`, `test_default_limit`
//!
//! ## Deletes & Registration
//! - `test_bulk_delete_*` — counts, refused without criteria (skip / reject)
//! - `test_unregistered_kind` — repository for an unknown kind is refused
//! - `test_concurrent_persist` — parallel persists from spawned tasks

/// Generate a full repository conformance test suite.
///
/// `$factory` must be an expression that evaluates to a fresh, empty store
/// managing `test_registry()`. It is re-evaluated for each test to ensure
/// isolation. The store must be `Clone + 'static` (shared state).
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr) => {
        mod store_contract_tests {
            use super::*;
            use dao::config::{BulkDeletePolicy, DaoConfig, EntityConfig};
            use dao::core::entity::Entity;
            use dao::core::error::DaoError;
            use dao::core::filter::{DEFAULT_LIMIT, Filter, FilterOptions, QueryFilter};
            use dao::core::repository::Repository;
            use uuid::Uuid;

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_get_all_empty() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                assert!(items.get_all().await.unwrap().is_empty());
                assert_eq!(items.count(None).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_persist_and_find() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                let stored = items.persist(item("bolt", 1.5)).await.unwrap();
                let id = stored.id().expect("persist should assign an id");

                let found = items.find(&id).await.unwrap().expect("record should exist");
                assert_eq!(found, stored);
                assert_eq!(found.name, "bolt");
                assert!((found.price - 1.5).abs() < f64::EPSILON);
            }

            #[tokio::test]
            async fn test_find_missing() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                items.persist(item("bolt", 1.5)).await.unwrap();
                assert!(items.find(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_persist_duplicate_id() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                let stored = items.persist(item("bolt", 1.5)).await.unwrap();

                let err = items.persist(stored).await.unwrap_err();
                assert_eq!(err.error_code(), "STORAGE_INTEGRITY_ERROR");
                assert_eq!(items.count(None).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_merge_updates_in_place() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                let mut stored = items.persist(item("bolt", 1.5)).await.unwrap();

                stored.price = 2.0;
                let merged = items.merge(stored.clone()).await.unwrap();
                assert_eq!(merged, stored);
                assert_eq!(items.count(None).await.unwrap(), 1);

                let found = items.find(&stored.id().unwrap()).await.unwrap().unwrap();
                assert!((found.price - 2.0).abs() < f64::EPSILON);

                // merge of an unknown record inserts it
                let fresh = items.update(item("nut", 0.5)).await.unwrap();
                assert!(fresh.id().is_some());
                assert_eq!(items.count(None).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_delete_by_id() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                let stored = seed(&items, abc()).await;
                let id = stored[1].id().unwrap();

                items.delete(&id).await.unwrap();
                assert!(items.find(&id).await.unwrap().is_none());
                assert_eq!(sorted_item_names(&items.get_all().await.unwrap()), vec!["A", "C"]);
            }

            #[tokio::test]
            async fn test_delete_missing_id() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                items.delete(&Uuid::new_v4()).await.unwrap();
                assert_eq!(items.count(None).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_delete_entity_detached() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                let stored = seed(&items, abc()).await;

                // Tracked state
                items.delete_entity(&stored[0]).await.unwrap();

                // Stale state is merged first, then removed
                let mut stale = stored[1].clone();
                stale.price = 99.0;
                items.delete_entity(&stale).await.unwrap();

                // Never persisted
                items.delete_entity(&item("D", 40.0)).await.unwrap();

                assert_eq!(item_names(&items.get_all().await.unwrap()), vec!["C"]);
            }

            // ==================================================================
            // Filters
            // ==================================================================

            #[tokio::test]
            async fn test_greater_than_scenario() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                let expensive = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "price", Some(15)));
                let found = items.get(Some(&expensive)).await.unwrap();
                assert_eq!(sorted_item_names(&found), vec!["B", "C"]);
                assert_eq!(items.count(Some(&expensive)).await.unwrap(), 2);

                let ordered = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "price", Some(15)))
                    .order_by("-price");
                let found = items.get(Some(&ordered)).await.unwrap();
                assert_eq!(item_names(&found), vec!["C", "B"]);
            }

            #[tokio::test]
            async fn test_null_criteria_are_unconstrained() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                let unset: Option<f64> = None;
                let filter = QueryFilter::<Item>::new().matching(move |cb, root| {
                    Ok(cb.and([
                        cb.equals(root, "name", None::<&str>)?,
                        cb.less_than(root, "price", unset)?,
                        cb.like(root, "name", None)?,
                    ]))
                });
                assert_eq!(items.get(Some(&filter)).await.unwrap().len(), 3);
                assert_eq!(items.count(Some(&filter)).await.unwrap(), 3);

                // One set criterion among unset ones
                let filter = QueryFilter::<Item>::new().matching(move |cb, root| {
                    Ok(cb.and([
                        cb.equals(root, "name", Some("A"))?,
                        cb.greater_than(root, "price", unset)?,
                    ]))
                });
                assert_eq!(item_names(&items.get(Some(&filter)).await.unwrap()), vec!["A"]);
            }

            #[tokio::test]
            async fn test_and_or_composition() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                let middle = QueryFilter::<Item>::new().matching(|cb, root| {
                    Ok(cb.and([
                        cb.greater_than_or_equal(root, "price", Some(15))?,
                        cb.less_than_or_equal(root, "price", Some(25))?,
                    ]))
                });
                assert_eq!(item_names(&items.get(Some(&middle)).await.unwrap()), vec!["B"]);

                let ends = QueryFilter::<Item>::new().matching(|cb, root| {
                    Ok(cb.or([
                        cb.less_than(root, "price", Some(15))?,
                        cb.greater_than(root, "price", Some(25))?,
                    ]))
                });
                assert_eq!(
                    sorted_item_names(&items.get(Some(&ends)).await.unwrap()),
                    vec!["A", "C"]
                );

                let not_b = QueryFilter::<Item>::new().matching(|cb, root| {
                    Ok(cb.not(cb.equals(root, "name", Some("B"))?))
                });
                assert_eq!(items.count(Some(&not_b)).await.unwrap(), 2);

                let excluded = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.not_equals(root, "name", Some("B")));
                assert_eq!(items.count(Some(&excluded)).await.unwrap(), 2);
            }

            #[tokio::test]
            async fn test_in_and_any_equals() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                let empty = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.in_(root, "name", Vec::<String>::new()));
                assert_eq!(items.count(Some(&empty)).await.unwrap(), 3);

                let listed = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.in_(root, "name", ["A", "C", "Z"]));
                assert_eq!(
                    sorted_item_names(&items.get(Some(&listed)).await.unwrap()),
                    vec!["A", "C"]
                );

                let any = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.any_equals(root, "price", [10, 30]));
                assert_eq!(items.count(Some(&any)).await.unwrap(), 2);

                let none = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.any_equals(root, "price", Vec::<f64>::new()));
                assert_eq!(items.count(Some(&none)).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_text_matching() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(
                    &items,
                    vec![item("Hex Bolt", 1.0), item("Wing nut", 0.5), item("bolt cutter", 40.0)],
                )
                .await;

                let like = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.like(root, "name", Some("Bolt")));
                assert_eq!(item_names(&items.get(Some(&like)).await.unwrap()), vec!["Hex Bolt"]);

                let like_any_case = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.like_ignore_case(root, "name", Some("bolt")));
                assert_eq!(items.count(Some(&like_any_case)).await.unwrap(), 2);

                let exact_any_case = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals_ignore_case(root, "name", Some("WING NUT")));
                assert_eq!(
                    item_names(&items.get(Some(&exact_any_case)).await.unwrap()),
                    vec!["Wing nut"]
                );
            }

            #[tokio::test]
            async fn test_nested_path() {
                let store = $factory;
                let suppliers = Repository::<Supplier, _>::new(store.clone()).unwrap();
                let items = Repository::<Item, _>::new(store).unwrap();

                let acme = suppliers.persist(supplier("Acme", "FR")).await.unwrap();
                let globex = suppliers.persist(supplier("Globex", "US")).await.unwrap();
                seed(
                    &items,
                    vec![
                        supplied_item("A", 10.0, &acme),
                        supplied_item("B", 20.0, &globex),
                        supplied_item("C", 30.0, &acme),
                    ],
                )
                .await;

                let french = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "supplier.country", Some("FR")))
                    .order_by("-supplier.name")
                    .order_by("-price");
                assert_eq!(item_names(&items.get(Some(&french)).await.unwrap()), vec!["C", "A"]);

                let by_supplier = QueryFilter::<Item>::new()
                    .order_by("supplier.name")
                    .order_by("name");
                assert_eq!(
                    item_names(&items.get(Some(&by_supplier)).await.unwrap()),
                    vec!["A", "C", "B"]
                );
            }

            #[tokio::test]
            async fn test_missing_relation() {
                let store = $factory;
                let suppliers = Repository::<Supplier, _>::new(store.clone()).unwrap();
                let items = Repository::<Item, _>::new(store).unwrap();

                let acme = suppliers.persist(supplier("Acme", "FR")).await.unwrap();
                seed(&items, vec![supplied_item("A", 10.0, &acme), item("B", 20.0)]).await;

                let elsewhere = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.not_equals(root, "supplier.country", Some("FR")));
                assert_eq!(items.count(Some(&elsewhere)).await.unwrap(), 0);

                let unsupplied = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.is_null(root, "supplier.country"));
                assert_eq!(item_names(&items.get(Some(&unsupplied)).await.unwrap()), vec!["B"]);

                let supplied = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.is_not_null(root, "supplier.name"));
                assert_eq!(item_names(&items.get(Some(&supplied)).await.unwrap()), vec!["A"]);
            }

            #[tokio::test]
            async fn test_filter_and_order_by_id() {
                let store = $factory;
                let suppliers = Repository::<Supplier, _>::new(store.clone()).unwrap();
                let items = Repository::<Item, _>::new(store).unwrap();

                let acme = suppliers.persist(supplier("Acme", "FR")).await.unwrap();
                let stored = seed(
                    &items,
                    vec![supplied_item("A", 10.0, &acme), item("B", 20.0), item("C", 30.0)],
                )
                .await;

                let b_id = stored[1].id;
                let by_id = QueryFilter::<Item>::new()
                    .matching(move |cb, root| cb.equals(root, "id", b_id));
                assert_eq!(item_names(&items.get(Some(&by_id)).await.unwrap()), vec!["B"]);

                let acme_id = acme.id;
                let by_supplier_id = QueryFilter::<Item>::new()
                    .matching(move |cb, root| cb.equals(root, "supplier.id", acme_id));
                assert_eq!(
                    item_names(&items.get(Some(&by_supplier_id)).await.unwrap()),
                    vec!["A"]
                );

                let mut expected = stored.clone();
                expected.sort_by_key(|item| item.id);
                let by_id_order = QueryFilter::<Item>::new().order_by("id");
                assert_eq!(
                    item_names(&items.get(Some(&by_id_order)).await.unwrap()),
                    item_names(&expected)
                );
            }

            #[tokio::test]
            async fn test_related_record_is_read_live() {
                let store = $factory;
                let suppliers = Repository::<Supplier, _>::new(store.clone()).unwrap();
                let items = Repository::<Item, _>::new(store).unwrap();

                let acme = suppliers.persist(supplier("Acme", "FR")).await.unwrap();
                let bolt = items.persist(supplied_item("bolt", 1.0, &acme)).await.unwrap();

                let mut renamed = acme.clone();
                renamed.name = "Globex".to_string();
                suppliers.merge(renamed).await.unwrap();

                let named = |name: &'static str| {
                    QueryFilter::<Item>::new()
                        .matching(move |cb, root| cb.equals(root, "supplier.name", Some(name)))
                };
                assert_eq!(items.count(Some(&named("Globex"))).await.unwrap(), 1);
                assert_eq!(items.count(Some(&named("Acme"))).await.unwrap(), 0);

                let found = items.find(&bolt.id.unwrap()).await.unwrap().unwrap();
                assert_eq!(found.supplier.map(|s| s.name), Some("Globex".to_string()));

                // A removed supplier reads as no supplier
                suppliers.delete(&acme.id.unwrap()).await.unwrap();
                let found = items.find(&bolt.id.unwrap()).await.unwrap().unwrap();
                assert!(found.supplier.is_none());
                let unsupplied = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.is_null(root, "supplier.name"));
                assert_eq!(items.count(Some(&unsupplied)).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_unsaved_related_record_is_rejected() {
                let items = Repository::<Item, _>::new($factory).unwrap();

                let err = items
                    .persist(supplied_item("bolt", 1.0, &supplier("Acme", "FR")))
                    .await
                    .unwrap_err();
                assert_eq!(err.error_code(), "STORAGE_INTEGRITY_ERROR");
                assert_eq!(items.count(None).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_text_order_and_like_are_byte_wise() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(
                    &items,
                    vec![item("a", 1.0), item("B", 2.0), item("_", 3.0), item("C:\\temp", 4.0)],
                )
                .await;

                let by_name = QueryFilter::<Item>::new().order_by("name");
                assert_eq!(
                    item_names(&items.get(Some(&by_name)).await.unwrap()),
                    vec!["B", "C:\\temp", "_", "a"]
                );

                let below_a = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.less_than(root, "name", Some("a")));
                assert_eq!(items.count(Some(&below_a)).await.unwrap(), 3);

                // Backslash is an ordinary character, `_` still a wildcard
                let backslash = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.like(root, "name", Some(":\\t")));
                assert_eq!(
                    item_names(&items.get(Some(&backslash)).await.unwrap()),
                    vec!["C:\\temp"]
                );
            }

            #[tokio::test]
            async fn test_invalid_paths() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                // Validated even when the value is unset
                let unknown = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "colour", None::<&str>));
                let err = items.get(Some(&unknown)).await.unwrap_err();
                assert!(matches!(err, DaoError::InvalidFieldPath { .. }), "{:?}", err);

                let through_scalar = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "price.amount", Some(1)));
                let err = items.count(Some(&through_scalar)).await.unwrap_err();
                assert!(matches!(err, DaoError::InvalidFieldPath { .. }), "{:?}", err);

                let on_relation = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "supplier", Some("Acme")));
                let err = items.delete_where(Some(&on_relation)).await.unwrap_err();
                assert!(matches!(err, DaoError::InvalidFieldPath { .. }), "{:?}", err);

                let bad_order = QueryFilter::<Item>::new().order_by("-colour");
                let err = items.get(Some(&bad_order)).await.unwrap_err();
                assert_eq!(err.error_code(), "INVALID_FIELD_PATH");

                // Nothing was deleted by the failed call
                assert_eq!(items.count(None).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_type_mismatch() {
                let items = Repository::<Item, _>::new($factory).unwrap();

                let ordered_bool = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "active", Some(true)));
                let err = items.get(Some(&ordered_bool)).await.unwrap_err();
                assert!(matches!(err, DaoError::UnsupportedOperation { .. }), "{:?}", err);

                let text_for_number = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "price", Some("ten")));
                let err = items.count(Some(&text_for_number)).await.unwrap_err();
                assert_eq!(err.error_code(), "UNSUPPORTED_OPERATION");
            }

            // ==================================================================
            // Ordering & Paging
            // ==================================================================

            #[tokio::test]
            async fn test_order_directives_keep_order() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(
                    &items,
                    vec![item("b", 20.0), item("a", 20.0), item("c", 30.0), item("d", 10.0)],
                )
                .await;

                let mut options = FilterOptions::new();
                options.order_by("-price").order_by("name");
                let filter = QueryFilter::<Item>::new().order_by("-price").order_by("name");
                assert_eq!(filter.options(), &options);

                assert_eq!(
                    item_names(&items.get(Some(&filter)).await.unwrap()),
                    vec!["c", "a", "b", "d"]
                );

                let reversed = QueryFilter::<Item>::new().order_by("name").order_by("-price");
                assert_eq!(
                    item_names(&items.get(Some(&reversed)).await.unwrap()),
                    vec!["a", "b", "c", "d"]
                );
            }

            #[tokio::test]
            async fn test_pagination_window() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, numbered(5)).await;

                // Insertion order without directives
                let window = QueryFilter::<Item>::new().with_limit(2).with_offset(2);
                assert_eq!(
                    item_names(&items.get(Some(&window)).await.unwrap()),
                    vec!["item-3", "item-4"]
                );

                let ordered = QueryFilter::<Item>::new()
                    .order_by("-price")
                    .with_limit(2)
                    .with_offset(2);
                assert_eq!(
                    item_names(&items.get(Some(&ordered)).await.unwrap()),
                    vec!["item-3", "item-2"]
                );

                let past_end = QueryFilter::<Item>::new().with_offset(10);
                assert!(items.get(Some(&past_end)).await.unwrap().is_empty());

                let zero = QueryFilter::<Item>::new().with_limit(0);
                assert!(items.get(Some(&zero)).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_page_and_first() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, numbered(5)).await;

                let filter = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "price", Some(1)))
                    .order_by("price")
                    .with_limit(3);
                let page = items.page(Some(&filter)).await.unwrap();
                assert_eq!(item_names(&page.data), vec!["item-2", "item-3", "item-4"]);
                assert_eq!(page.pagination.total, 4);
                assert!(page.pagination.has_next);
                assert!(!page.pagination.has_prev);

                let first = items.first(Some(&filter)).await.unwrap().unwrap();
                assert_eq!(first.name, "item-2");

                let nothing = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "price", Some(100)));
                assert!(items.first(Some(&nothing)).await.unwrap().is_none());
                assert_eq!(items.page(Some(&nothing)).await.unwrap().pagination.total, 0);
            }

            #[tokio::test]
            async fn test_count_ignores_paging() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, numbered(5)).await;

                let filter = QueryFilter::<Item>::new()
                    .order_by("-name")
                    .with_limit(1)
                    .with_offset(3);
                assert_eq!(items.count(Some(&filter)).await.unwrap(), 5);
            }

            #[tokio::test]
            async fn test_default_limit() {
                let config = DaoConfig {
                    default_limit: 4,
                    entities: vec![EntityConfig {
                        name: "item".to_string(),
                        default_limit: Some(2),
                    }],
                    ..Default::default()
                };
                let items = Repository::<Item, _>::with_config($factory, config).unwrap();
                seed(&items, numbered(5)).await;

                assert_eq!(items.get_all().await.unwrap().len(), 2);
                assert_eq!(items.count(None).await.unwrap(), 5);

                // An explicit filter carries its own limit
                let filter = QueryFilter::<Item>::new();
                assert_eq!(filter.limit(), DEFAULT_LIMIT);
                assert_eq!(items.get(Some(&filter)).await.unwrap().len(), 5);
            }

            // ==================================================================
            // Deletes & Registration
            // ==================================================================

            #[tokio::test]
            async fn test_bulk_delete_counts() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                let expensive = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.greater_than(root, "price", Some(15)));
                assert_eq!(items.delete_where(Some(&expensive)).await.unwrap(), 2);
                assert_eq!(item_names(&items.get_all().await.unwrap()), vec!["A"]);

                assert_eq!(items.delete_where(Some(&expensive)).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_bulk_delete_without_criteria_is_skipped() {
                let items = Repository::<Item, _>::new($factory).unwrap();
                seed(&items, abc()).await;

                assert_eq!(items.delete_where(None).await.unwrap(), 0);

                // A filter whose criteria are all unset is no criteria at all
                let unset = QueryFilter::<Item>::new()
                    .matching(|cb, root| cb.equals(root, "name", None::<&str>));
                assert_eq!(items.delete_where(Some(&unset)).await.unwrap(), 0);

                assert_eq!(items.count(None).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_bulk_delete_without_criteria_is_rejected() {
                let config = DaoConfig {
                    bulk_delete: BulkDeletePolicy::Reject,
                    ..Default::default()
                };
                let items = Repository::<Item, _>::with_config($factory, config).unwrap();
                seed(&items, abc()).await;

                let err = items.delete_where(None).await.unwrap_err();
                assert!(matches!(err, DaoError::UnconditionalDelete { .. }), "{:?}", err);
                assert_eq!(items.count(None).await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_unregistered_kind() {
                let err = Repository::<Unregistered, _>::new($factory).err().unwrap();
                assert!(matches!(
                    err,
                    DaoError::InvalidEntityKind { ref kind } if kind == "unregistered"
                ));

                // A config allow-list can hide a registered kind too
                let config = DaoConfig {
                    entities: vec![EntityConfig {
                        name: "supplier".to_string(),
                        default_limit: None,
                    }],
                    ..Default::default()
                };
                let err = Repository::<Item, _>::with_config($factory, config).err().unwrap();
                assert_eq!(err.error_code(), "INVALID_ENTITY_KIND");
            }

            #[tokio::test]
            async fn test_concurrent_persist() {
                let store = $factory;
                let mut handles = Vec::new();

                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        let items = Repository::<Item, _>::new(store).unwrap();
                        items.persist(item(&format!("item-{}", i), i as f64)).await.unwrap()
                    }));
                }

                for handle in handles {
                    handle.await.unwrap();
                }

                let items = Repository::<Item, _>::new(store).unwrap();
                assert_eq!(items.count(None).await.unwrap(), 10);
            }
        }
    };
}
