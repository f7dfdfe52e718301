mod common;

use boilerwork_criteria::{FilterCriteria, FilterSpec, PagingError, SortSpec};
use common::{ids, numbered, people};
use serde_json::{Value, json};

fn values(records: &[Value]) -> Vec<i64> {
    records.iter().map(|r| r["value"].as_i64().unwrap()).collect()
}

fn value_data(items: &[i64]) -> Vec<Value> {
    items.iter().map(|v| json!({"value": v})).collect()
}

fn spec(filters: &Value) -> FilterSpec {
    FilterSpec::from_json(filters).unwrap()
}

#[test]
fn test_post_filter_sequence_field_is_membership() {
    let results = FilterCriteria::new()
        .set_data(people())
        .post_filter(&spec(&json!({"tags": {"external": "tags", "value": "sports"}})))
        .into_results();

    assert_eq!(ids(&results), vec![1, 3]);
}

#[test]
fn test_post_filter_nested_path() {
    let results = FilterCriteria::new()
        .set_data(people())
        .post_filter(&spec(&json!({
            "details.address.country": {"external": "details.address.country", "value": "USA"}
        })))
        .into_results();

    assert_eq!(ids(&results), vec![1, 2]);
}

#[test]
fn test_post_filter_nested_path_is_accent_insensitive() {
    let results = FilterCriteria::new()
        .set_data(people())
        .post_filter(&spec(&json!({"details.address.city": "lóndon"})))
        .into_results();

    assert_eq!(ids(&results), vec![3]);
}

#[test]
fn test_empty_data() {
    let results = FilterCriteria::new()
        .set_data(Vec::new())
        .post_filter(&spec(&json!({"value": {"external": "value", "value": 10}})))
        .into_results();

    assert!(results.is_empty());
}

#[test]
fn test_filter_by_non_existent_key() {
    let results = FilterCriteria::new()
        .set_data(numbered(3))
        .post_filter(&spec(&json!({"nonExistentKey": {"external": "nonExistentKey", "value": "Bob"}})))
        .into_results();

    assert!(results.is_empty());
}

#[test]
fn test_equal_operator() {
    let results = FilterCriteria::new()
        .set_data(value_data(&[5, 10, 15]))
        .post_filter(&spec(&json!({"value": {"external": "value", "value": 10}})))
        .into_results();

    assert_eq!(values(&results), vec![10]);
}

#[test]
fn test_greater_than_or_equal_operator() {
    let results = FilterCriteria::new()
        .set_data(value_data(&[0, 5, 10, 15]))
        .post_filter(&spec(&json!({"value": {"external": "value", "value": "≥10"}})))
        .into_results();

    assert_eq!(values(&results), vec![10, 15]);
}

#[test]
fn test_less_than_or_equal_operator() {
    let results = FilterCriteria::new()
        .set_data(value_data(&[5, 10, 15]))
        .post_filter(&spec(&json!({"value": {"external": "value", "value": "≤10"}})))
        .into_results();

    assert_eq!(values(&results), vec![5, 10]);
}

#[test]
fn test_ascii_comparison_operators() {
    let data = value_data(&[5, 10, 15]);
    let at_least = FilterCriteria::new()
        .set_data(data.clone())
        .post_filter(&spec(&json!({"value": ">=10"})))
        .into_results();
    let at_most = FilterCriteria::new()
        .set_data(data)
        .post_filter(&spec(&json!({"value": "<=10"})))
        .into_results();

    assert_eq!(values(&at_least), vec![10, 15]);
    assert_eq!(values(&at_most), vec![5, 10]);
}

#[test]
fn test_range_post_filter_is_inclusive() {
    let data: Vec<Value> = (1..=5).map(|id| json!({"id": id, "value": id * 10})).collect();
    let results = FilterCriteria::new()
        .set_data(data)
        .post_filter(&spec(&json!({"value": {"external": "value", "value": "20-40"}})))
        .into_results();

    assert_eq!(results.len(), 3);
    assert_eq!(ids(&results), vec![2, 3, 4]);
}

#[test]
fn test_multiple_values() {
    let results = FilterCriteria::new()
        .set_data(value_data(&[5, 10, 15]))
        .post_filter(&spec(&json!({"value": {"external": "value", "value": [5, 15]}})))
        .into_results();

    assert_eq!(values(&results), vec![5, 15]);
}

#[test]
fn test_filters_are_conjunctive() {
    let results = FilterCriteria::new()
        .set_data(people())
        .post_filter(&spec(&json!({"tags": "sports", "details.address.country": "USA"})))
        .into_results();

    assert_eq!(ids(&results), vec![1]);
}

#[test]
fn test_filtering_twice_is_idempotent() {
    let filter = spec(&json!({"details.age": "≥30"}));
    let once = FilterCriteria::new().set_data(people()).post_filter(&filter);
    let twice = once.clone().post_filter(&filter);

    assert_eq!(once.get_results(), twice.get_results());
    assert_eq!(ids(once.get_results()), vec![2, 3]);
}

#[test]
fn test_input_is_not_mutated() {
    let data = people();
    let _ = FilterCriteria::new()
        .set_data(data.clone())
        .post_filter(&spec(&json!({"name": "Jane"})))
        .order_by(&SortSpec::parse("name", "desc").unwrap());

    assert_eq!(data, people());
}

#[test]
fn test_order_by_non_existent_key() {
    let data = numbered(3);
    let sort = SortSpec::from_json(&json!({"sort": "nonExistentKey", "operator": "asc"})).unwrap();
    let results = FilterCriteria::new().set_data(data.clone()).order_by(&sort).into_results();

    assert_eq!(results, data);
}

fn ages() -> Vec<Value> {
    vec![
        json!({"id": 3, "name": "John", "age": 30}),
        json!({"id": 1, "name": "Alice", "age": 25}),
        json!({"id": 2, "name": "Bob", "age": 35}),
    ]
}

#[test]
fn test_order_by_desc() {
    let sort = SortSpec::from_json(&json!({"sort": "age", "operator": "desc"})).unwrap();
    let results = FilterCriteria::new().set_data(ages()).order_by(&sort).into_results();

    assert_eq!(
        results,
        vec![
            json!({"id": 2, "name": "Bob", "age": 35}),
            json!({"id": 3, "name": "John", "age": 30}),
            json!({"id": 1, "name": "Alice", "age": 25}),
        ]
    );
}

#[test]
fn test_order_by_asc() {
    let sort = SortSpec::from_json(&json!({"sort": "age", "operator": "ASC"})).unwrap();
    let results = FilterCriteria::new().set_data(ages()).order_by(&sort).into_results();

    assert_eq!(
        results,
        vec![
            json!({"id": 1, "name": "Alice", "age": 25}),
            json!({"id": 3, "name": "John", "age": 30}),
            json!({"id": 2, "name": "Bob", "age": 35}),
        ]
    );
}

#[test]
fn test_paginate_with_invalid_parameters() {
    let err = FilterCriteria::new().set_data(numbered(5)).paginate(-1, -1).unwrap_err();
    assert_eq!(err, PagingError::InvalidPage(-1));
}

#[test]
fn test_paginate_with_zero_limit() {
    let err = FilterCriteria::new().set_data(numbered(5)).paginate(1, 0).unwrap_err();
    assert_eq!(err, PagingError::InvalidPerPage(0));
}

#[test]
fn test_paginate() {
    let second = FilterCriteria::new().set_data(numbered(10)).paginate(2, 3).unwrap();
    assert_eq!(ids(second.get_results()), vec![4, 5, 6]);

    let first = FilterCriteria::new().set_data(numbered(10)).paginate(1, 5).unwrap();
    assert_eq!(ids(first.get_results()), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_paginate_short_last_page_and_beyond() {
    let last = FilterCriteria::new().set_data(numbered(10)).paginate(4, 3).unwrap();
    assert_eq!(ids(last.get_results()), vec![10]);

    let beyond = FilterCriteria::new().set_data(numbered(10)).paginate(5, 3).unwrap();
    assert!(beyond.get_results().is_empty());
    assert_eq!(beyond.page_info().unwrap().total_pages, 4);
}

#[test]
fn test_full_pipeline_filter_sort_paginate() {
    let data: Vec<Value> = (1..=12)
        .map(|id| json!({"id": id, "score": (id * 7) % 13, "active": id % 3 != 0}))
        .collect();

    let criteria = FilterCriteria::new()
        .set_data(data)
        .post_filter(&spec(&json!({"active": true})))
        .order_by(&SortSpec::parse("score", "desc").unwrap())
        .paginate(1, 3)
        .unwrap();

    // active ids: 1 2 4 5 7 8 10 11 with scores 7 1 2 9 10 4 5 12
    assert_eq!(ids(criteria.get_results()), vec![11, 7, 5]);
    let info = criteria.page_info().unwrap();
    assert_eq!(info.total_count, 8);
    assert_eq!(info.total_pages, 3);
}
