//! Query building and validation through the public API.

mod common;

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use common::inline_firestore;
use firestore_query_core::firestore::{DocumentKey, FieldPath};
use firestore_query_core::{Direction, FilterOperator, Value};
use tokio_test::{assert_err, assert_ok};

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn filters_commute_when_valid() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    let a = rooms
        .where_equal_to("owner", "ana")
        .unwrap()
        .where_greater_than("score", 10)
        .unwrap();
    let b = rooms
        .where_greater_than("score", 10)
        .unwrap()
        .where_equal_to("owner", "ana")
        .unwrap();

    assert_eq!(a.core_query().filters().len(), b.core_query().filters().len());
    for filter in a.core_query().filters() {
        assert!(b.core_query().filters().contains(filter));
    }
    // Equality is structural over the clause lists, so filter order counts.
    assert_ne!(a, b);
}

#[test]
fn second_inequality_field_rejected() {
    let (_client, firestore) = inline_firestore();
    let scored = firestore
        .collection("rooms")
        .unwrap()
        .where_greater_than("score", 10)
        .unwrap();

    let err = assert_err!(scored.where_less_than("age", 3));
    assert!(err.is_invalid_argument());
    assert!(err.to_string().contains("'score' and 'age'"));

    // Same field is fine
    assert_ok!(scored.where_less_than("score", 100));
    assert_eq!(scored.core_query().filters().len(), 1);
}

#[test]
fn order_by_must_match_inequality() {
    let (_client, firestore) = inline_firestore();
    let scored = firestore
        .collection("rooms")
        .unwrap()
        .where_greater_than("score", 10)
        .unwrap();

    assert_ok!(scored.order_by("score", Direction::Ascending));

    let err = assert_err!(scored.order_by("name", Direction::Ascending));
    assert!(err.to_string().contains("score"));
    assert!(err.to_string().contains("name"));
}

#[test]
fn inequality_must_match_first_order_by() {
    let (_client, firestore) = inline_firestore();
    let ordered = firestore
        .collection("rooms")
        .unwrap()
        .order_by("name", Direction::Descending)
        .unwrap();

    assert_err!(ordered.where_greater_than("score", 10));
    assert_ok!(ordered.where_greater_than("name", "m"));
}

#[test]
fn order_by_after_bound_rejected() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    let started = rooms.start_at(vec![Value::from(5)]);
    let err = assert_err!(started.order_by("score", Direction::Ascending));
    assert!(err.to_string().contains("starting point"));

    let ended = rooms.end_before(vec![Value::from(5)]);
    let err = assert_err!(ended.order_by("score", Direction::Ascending));
    assert!(err.to_string().contains("ending point"));

    let ordered = assert_ok!(rooms.order_by("score", Direction::Ascending));
    let bounded = ordered.start_after(vec![Value::from(5)]).end_at(vec![Value::from(50)]);
    assert!(bounded.core_query().start_bound().is_some());
    assert!(bounded.core_query().end_bound().is_some());
}

#[test]
fn limit_must_be_positive() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    assert_err!(rooms.limit(0));
    assert_err!(rooms.limit(-5));
    let limited = assert_ok!(rooms.limit(1));
    assert_eq!(limited.core_query().limit_value(), Some(1));
}

#[test]
fn single_array_contains_style_filter() {
    let (_client, firestore) = inline_firestore();
    let tagged = firestore
        .collection("rooms")
        .unwrap()
        .where_array_contains("tags", "rust")
        .unwrap();

    let err = assert_err!(tagged.where_array_contains_any("tags", vec![Value::from("go")]));
    assert!(err.to_string().contains("single arrayContains-style filter"));
}

#[test]
fn disjunctive_filters_need_non_empty_arrays() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    assert_err!(rooms.where_in("owner", vec![]));
    assert_err!(rooms.filter("owner", FilterOperator::NotIn, "ana"));
    let too_many: Vec<Value> = (0..11).map(Value::from).collect();
    assert_err!(rooms.where_in("owner", too_many));
    assert_ok!(rooms.where_in("owner", vec![Value::from("ana"), Value::from("bo")]));
}

#[test]
fn null_and_nan_only_support_equality() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    assert_ok!(rooms.where_equal_to("owner", Value::Null));
    assert_err!(rooms.where_greater_than("owner", Value::Null));
    assert_ok!(rooms.where_not_equal_to("score", f64::NAN));
    assert_err!(rooms.where_less_than("score", f64::NAN));
}

#[test]
fn document_id_filters() {
    let (_client, firestore) = inline_firestore();
    let rooms = firestore.collection("rooms").unwrap();

    let err = assert_err!(rooms.where_equal_to(FieldPath::document_id(), ""));
    assert!(err.to_string().contains("empty string"));

    let by_id = assert_ok!(rooms.where_equal_to(FieldPath::document_id(), "abc"));
    assert_eq!(
        *by_id.core_query().filters()[0].value(),
        Value::Reference(DocumentKey::from_string("rooms/abc").unwrap())
    );

    let err = assert_err!(rooms.where_equal_to(FieldPath::document_id(), "a/b"));
    assert!(err.to_string().contains("'/' character"));

    let err = assert_err!(rooms.where_equal_to(FieldPath::document_id(), 42));
    assert!(err.to_string().contains("of type: integer"));

    let err = assert_err!(rooms.where_array_contains(FieldPath::document_id(), "abc"));
    assert!(err.to_string().contains("not arrays"));
}

#[test]
fn document_id_filters_on_collection_group() {
    let (_client, firestore) = inline_firestore();
    let messages = firestore.collection_group("messages").unwrap();

    let by_path = assert_ok!(messages.where_equal_to(FieldPath::document_id(), "a/b"));
    assert_eq!(
        *by_path.core_query().filters()[0].value(),
        Value::Reference(DocumentKey::from_string("a/b").unwrap())
    );

    let err = assert_err!(messages.where_equal_to(FieldPath::document_id(), "a/b/c"));
    assert!(err.to_string().contains("odd number of segments"));
}

#[test]
fn collection_paths_validated() {
    let (_client, firestore) = inline_firestore();

    assert_ok!(firestore.collection("rooms/eros/messages"));
    assert_err!(firestore.collection("rooms/eros"));
    assert_err!(firestore.collection_group("rooms/messages"));
    assert_err!(firestore.collection_group(""));
}

#[test]
fn equal_queries_hash_equally() {
    let (_client, firestore) = inline_firestore();
    let build = || {
        firestore
            .collection("rooms")
            .unwrap()
            .where_greater_than("score", 10)
            .unwrap()
            .order_by("score", Direction::Descending)
            .unwrap()
            .limit(5)
            .unwrap()
    };

    let a = build();
    let b = build();
    assert_eq!(a, b);
    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(a.core_query().canonical_id(), b.core_query().canonical_id());

    let c = assert_ok!(a.limit(6));
    assert_ne!(a, c);
    assert_ne!(hash_of(&a), hash_of(&c));
}

#[test]
fn builders_never_contact_the_client() {
    let (client, firestore) = inline_firestore();
    let _ = firestore
        .collection("rooms")
        .unwrap()
        .where_equal_to("owner", "ana")
        .unwrap();

    assert_eq!(client.listen_count(), 0);
    assert_eq!(client.cache_reads(), 0);
}
