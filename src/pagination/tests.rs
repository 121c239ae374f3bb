//! Tests for pagination module

use super::*;
use crate::json_path::JsonPath;
use pretty_assertions::assert_eq;
use serde_json::json;

fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

// ============================================================================
// NextPage Tests
// ============================================================================

#[test]
fn test_next_page_with_param() {
    let next = NextPage::with_param("cursor", "abc");
    assert!(next.is_continue());
    assert!(!next.is_done());
    assert_eq!(
        next,
        NextPage::Continue {
            query_params: params(&[("cursor", "abc")])
        }
    );
}

#[test]
fn test_next_page_done() {
    let next = NextPage::Done;
    assert!(next.is_done());
    assert!(!next.is_continue());
}

// ============================================================================
// PaginationConfig Tests
// ============================================================================

#[test]
fn test_pagination_config_default() {
    let config = PaginationConfig::default();
    assert_eq!(config.strategy, PaginationStrategy::None);
    assert_eq!(config.cursor_param, "cursor");
    assert_eq!(config.next_cursor_path, "nextCursor");
    assert_eq!(config.limit_param, "limit");
    assert_eq!(config.offset_param, "offset");
    assert_eq!(config.page_size, 100);
    assert_eq!(config.items_path, "items");
    assert!(config.validate().is_ok());
}

#[test]
fn test_pagination_strategy_from_str() {
    assert_eq!(
        "CURSOR".parse::<PaginationStrategy>().unwrap(),
        PaginationStrategy::Cursor
    );
    assert_eq!(
        " offset ".parse::<PaginationStrategy>().unwrap(),
        PaginationStrategy::Offset
    );
    let err = "page".parse::<PaginationStrategy>().unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("Unsupported pagination strategy"));
}

#[test]
fn test_pagination_config_deserialize_rejects_unknown_strategy() {
    let result: std::result::Result<PaginationConfig, _> =
        serde_yaml::from_str("strategy: link_header");
    assert!(result.is_err());

    let config: PaginationConfig =
        serde_yaml::from_str("strategy: offset\npage_size: 25").unwrap();
    assert_eq!(config.strategy, PaginationStrategy::Offset);
    assert_eq!(config.page_size, 25);
    assert_eq!(config.items_path, "items");
}

#[test]
fn test_pagination_config_validate() {
    assert!(PaginationConfig::offset("limit", "offset", 0)
        .validate()
        .unwrap_err()
        .is_config());
    assert!(PaginationConfig::cursor("", "next").validate().is_err());
    assert!(PaginationConfig::cursor("cursor", "").validate().is_err());
    assert!(PaginationConfig::cursor("cursor", "meta.next")
        .validate()
        .is_ok());
}

// ============================================================================
// Item Extraction Tests
// ============================================================================

#[test]
fn test_extract_items_top_level_array() {
    let items = extract_items(&json!([{"id": 1}, {"id": 2}]), &JsonPath::parse("items")).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn test_extract_items_nested_path() {
    let body = json!({"data": {"users": [{"id": "a"}]}});
    let items = extract_items(&body, &JsonPath::parse("data.users")).unwrap();
    assert_eq!(items, vec![json!({"id": "a"})]);
}

#[test]
fn test_extract_items_not_an_array_is_malformed() {
    let body = json!({"items": {"id": 1}});
    let err = extract_items(&body, &JsonPath::parse("items")).unwrap_err();
    assert!(matches!(err, crate::Error::MalformedResponse { .. }));

    let err = extract_items(&json!({"users": []}), &JsonPath::parse("items")).unwrap_err();
    assert!(err.to_string().contains("no items found at 'items'"));
}

// ============================================================================
// CursorPaginator Tests
// ============================================================================

#[test]
fn test_cursor_paginator_initial_params() {
    let paginator = CursorPaginator::new("cursor", "nextCursor");
    let state = PaginationState::new();
    assert!(paginator.initial_params(&state).is_empty());
}

#[test]
fn test_cursor_paginator_continues_with_cursor() {
    let paginator = CursorPaginator::new("cursor", "meta.next");
    let mut state = PaginationState::new();

    let body = json!({"items": [1, 2], "meta": {"next": "c2"}});
    let next = paginator.process_response(&body, 2, &mut state);

    assert_eq!(next, NextPage::with_param("cursor", "c2"));
    assert_eq!(state.cursor.as_deref(), Some("c2"));
    assert_eq!(state.total_fetched, 2);
    assert!(!state.done);
}

#[test]
fn test_cursor_paginator_stops_without_cursor() {
    let paginator = CursorPaginator::new("cursor", "nextCursor");

    for body in [
        json!({"items": [1]}),
        json!({"items": [1], "nextCursor": null}),
        json!({"items": [1], "nextCursor": ""}),
    ] {
        let mut state = PaginationState::new();
        let next = paginator.process_response(&body, 1, &mut state);
        assert!(next.is_done());
        assert!(state.done);
        assert_eq!(state.total_fetched, 1);
    }
}

// ============================================================================
// OffsetPaginator Tests
// ============================================================================

#[test]
fn test_offset_paginator_initial_params() {
    let paginator = OffsetPaginator::new("limit", "offset", 50);
    let state = PaginationState::new();
    assert_eq!(
        paginator.initial_params(&state),
        params(&[("limit", "50"), ("offset", "0")])
    );
}

#[test]
fn test_offset_paginator_advances_by_records_returned() {
    let paginator = OffsetPaginator::new("limit", "offset", 2);
    let mut state = PaginationState::new();

    let next = paginator.process_response(&json!([1, 2]), 2, &mut state);
    assert_eq!(next, NextPage::with_params(params(&[("limit", "2"), ("offset", "2")])));

    let next = paginator.process_response(&json!([3, 4]), 2, &mut state);
    assert_eq!(next, NextPage::with_params(params(&[("limit", "2"), ("offset", "4")])));
    assert_eq!(state.offset, 4);
}

#[test]
fn test_offset_paginator_stops_on_short_or_empty_page() {
    let paginator = OffsetPaginator::new("limit", "offset", 10);

    let mut state = PaginationState::new();
    assert!(paginator.process_response(&json!([]), 9, &mut state).is_done());
    assert_eq!(state.total_fetched, 9);

    let mut state = PaginationState::new();
    assert!(paginator.process_response(&json!([]), 0, &mut state).is_done());
    assert!(state.done);
}

// ============================================================================
// NoPaginator Tests
// ============================================================================

#[test]
fn test_no_paginator_single_page() {
    let paginator = NoPaginator;
    let mut state = PaginationState::new();
    assert!(paginator.initial_params(&state).is_empty());
    assert!(paginator
        .process_response(&json!([1, 2, 3]), 3, &mut state)
        .is_done());
    assert_eq!(state.total_fetched, 3);
    assert_eq!(state.page, 1);
}

#[test]
fn test_config_builds_matching_paginator() {
    let paginator = PaginationConfig::offset("take", "skip", 5).paginator();
    let state = PaginationState::new();
    assert_eq!(
        paginator.initial_params(&state),
        params(&[("take", "5"), ("skip", "0")])
    );

    let paginator = PaginationConfig::cursor("page_token", "next").paginator();
    let mut state = PaginationState::new();
    let next = paginator.process_response(&json!({"next": "t1"}), 0, &mut state);
    assert_eq!(next, NextPage::with_param("page_token", "t1"));
}
