// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! End-to-end scenarios: extension handlers registered through the SDK and
//! driven by the engine double through the native vtables.

use std::{cmp::Ordering, sync::Arc};

use granite_sdk::{
	CompactionDecision, CompactionFilter, Comparator, MergeOperator, SliceTransform, create_compaction_filter,
	create_comparator, create_merge_operator, create_slice_transform, register_compaction_filter,
	register_comparator, register_merge_operator, register_slice_transform,
};
use granite_testing::{EngineError, StoreOptions, TestStore, init_tracing};

struct ReverseOrder;

impl Comparator for ReverseOrder {
	fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
		b.cmp(a)
	}

	fn name(&self) -> &str {
		"reverse-lexicographic"
	}
}

struct LexicographicOrder;

impl Comparator for LexicographicOrder {
	fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
		a.cmp(b)
	}

	fn name(&self) -> &str {
		"lexicographic"
	}
}

/// Joins base value and operands with `+`.
struct PlusConcat;

impl MergeOperator for PlusConcat {
	fn full_merge(&self, _key: &[u8], existing: Option<&[u8]>, operands: &[&[u8]]) -> Option<Vec<u8>> {
		let mut parts: Vec<&[u8]> = Vec::new();
		parts.extend(existing);
		parts.extend_from_slice(operands);
		Some(parts.join(&b"+"[..]))
	}

	fn partial_merge(&self, _key: &[u8], operands: &[&[u8]]) -> Option<Vec<u8>> {
		Some(operands.join(&b"+"[..]))
	}

	fn name(&self) -> &str {
		"plus-concat"
	}
}

/// Same merge semantics, but never combines operands ahead of time.
struct DecliningConcat;

impl MergeOperator for DecliningConcat {
	fn full_merge(&self, key: &[u8], existing: Option<&[u8]>, operands: &[&[u8]]) -> Option<Vec<u8>> {
		PlusConcat.full_merge(key, existing, operands)
	}

	fn name(&self) -> &str {
		"declining-concat"
	}
}

/// Drops every key carrying the `session:` prefix.
struct DropSessions;

impl CompactionFilter for DropSessions {
	fn filter(&self, _level: i32, key: &[u8], _value: &[u8]) -> CompactionDecision {
		if key.starts_with(b"session:") { CompactionDecision::Remove } else { CompactionDecision::Keep }
	}

	fn name(&self) -> &str {
		"drop-sessions"
	}
}

/// Replaces stale values during compaction instead of dropping the key.
struct RedactValues;

impl CompactionFilter for RedactValues {
	fn filter(&self, _level: i32, _key: &[u8], value: &[u8]) -> CompactionDecision {
		if value.starts_with(b"secret") {
			CompactionDecision::Change(b"<redacted>".to_vec())
		} else {
			CompactionDecision::Keep
		}
	}

	fn name(&self) -> &str {
		"redact-values"
	}
}

struct FixedPrefix(usize);

impl SliceTransform for FixedPrefix {
	fn transform(&self, key: &[u8]) -> Vec<u8> {
		key[..self.0].to_vec()
	}

	fn in_domain(&self, key: &[u8]) -> bool {
		key.len() >= self.0
	}

	fn in_range(&self, prefix: &[u8]) -> bool {
		prefix.len() == self.0
	}

	fn name(&self) -> &str {
		"fixed-prefix"
	}
}

#[test]
fn test_reverse_comparator_iteration_order() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(ReverseOrder)));
	let mut store = TestStore::open(StoreOptions::new(comparator));

	store.put(b"a", b"1");
	store.put(b"b", b"2");
	store.put(b"c", b"3");

	let keys = store.keys();
	assert_eq!(keys, vec![b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);
}

#[test]
fn test_merge_concatenates_operands() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let merge = create_merge_operator(register_merge_operator(Arc::new(PlusConcat)));
	let mut store = TestStore::open(StoreOptions::new(comparator).merge_operator(merge));

	store.put(b"k", b"x");
	store.merge(b"k", b"y").unwrap();
	store.merge(b"k", b"z").unwrap();

	assert_eq!(store.get(b"k").unwrap(), b"x+y+z");

	// Compaction folds the operands; the resolved value is unchanged.
	store.compact().unwrap();
	assert_eq!(store.get(b"k").unwrap(), b"x+y+z");
}

#[test]
fn test_merge_without_base_value() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let merge = create_merge_operator(register_merge_operator(Arc::new(PlusConcat)));
	let mut store = TestStore::open(StoreOptions::new(comparator).merge_operator(merge));

	store.merge(b"k", b"y").unwrap();
	store.merge(b"k", b"z").unwrap();

	assert_eq!(store.get(b"k").unwrap(), b"y+z");
}

#[test]
fn test_merge_decline_falls_back_to_full_merge() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let merge = create_merge_operator(register_merge_operator(Arc::new(DecliningConcat)));
	let mut store = TestStore::open(StoreOptions::new(comparator).merge_operator(merge));

	store.put(b"k", b"x");
	store.merge(b"k", b"y").unwrap();
	store.merge(b"k", b"z").unwrap();
	store.compact().unwrap();

	// partial_merge declined every combination, yet the result matches
	// the combining operator's.
	assert_eq!(store.get(b"k").unwrap(), b"x+y+z");
}

#[test]
fn test_merge_requires_operator() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let mut store = TestStore::open(StoreOptions::new(comparator));

	assert_eq!(store.merge(b"k", b"y"), Err(EngineError::MergeOperatorRequired));
}

#[test]
fn test_compaction_filter_drops_prefixed_keys() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let filter = create_compaction_filter(register_compaction_filter(Arc::new(DropSessions)));
	let mut store = TestStore::open(StoreOptions::new(comparator).compaction_filter(filter).compaction_level(1));

	store.put(b"session:1", b"ephemeral");
	store.put(b"session:2", b"ephemeral");
	store.put(b"user:1", b"durable");

	// Nothing is dropped before compaction runs.
	assert!(store.get(b"session:1").is_ok());

	store.compact().unwrap();

	assert_eq!(store.get(b"session:1"), Err(EngineError::NotFound));
	assert_eq!(store.get(b"session:2"), Err(EngineError::NotFound));
	assert_eq!(store.get(b"user:1").unwrap(), b"durable");
}

#[test]
fn test_compaction_filter_rewrites_values() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let filter = create_compaction_filter(register_compaction_filter(Arc::new(RedactValues)));
	let mut store = TestStore::open(StoreOptions::new(comparator).compaction_filter(filter));

	store.put(b"a", b"secret token");
	store.put(b"b", b"public");
	store.compact().unwrap();

	assert_eq!(store.get(b"a").unwrap(), b"<redacted>");
	assert_eq!(store.get(b"b").unwrap(), b"public");
}

#[test]
fn test_prefix_scan_honors_domain_gate() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let transform = create_slice_transform(register_slice_transform(Arc::new(FixedPrefix(5))));
	let mut store = TestStore::open(StoreOptions::new(comparator).prefix_extractor(transform));

	store.put(b"user:1", b"alice");
	store.put(b"user:2", b"bob");
	store.put(b"usr", b"too short for the extractor");
	store.put(b"item:1", b"chair");

	let matched = store.prefix_scan(b"user:").unwrap();
	assert_eq!(matched, vec![(b"user:1".to_vec(), b"alice".to_vec()), (b"user:2".to_vec(), b"bob".to_vec())]);

	// A prefix outside the extractor's range can match nothing.
	assert_eq!(store.prefix_scan(b"user").unwrap(), Vec::new());
}

#[test]
fn test_prefix_scan_requires_extractor() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let store = TestStore::open(StoreOptions::new(comparator));

	assert_eq!(store.prefix_scan(b"user:"), Err(EngineError::PrefixExtractorRequired));
}

#[test]
fn test_scan_resolves_merges_in_order() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(ReverseOrder)));
	let merge = create_merge_operator(register_merge_operator(Arc::new(PlusConcat)));
	let mut store = TestStore::open(StoreOptions::new(comparator).merge_operator(merge));

	store.put(b"a", b"1");
	store.merge(b"b", b"2").unwrap();
	store.merge(b"b", b"3").unwrap();

	let pairs = store.scan().unwrap();
	assert_eq!(pairs, vec![(b"b".to_vec(), b"2+3".to_vec()), (b"a".to_vec(), b"1".to_vec())]);
}

#[test]
fn test_delete_then_get() {
	init_tracing();
	let comparator = create_comparator(register_comparator(Arc::new(LexicographicOrder)));
	let mut store = TestStore::open(StoreOptions::new(comparator));

	store.put(b"k", b"v");
	store.delete(b"k");
	assert_eq!(store.get(b"k"), Err(EngineError::NotFound));
}
