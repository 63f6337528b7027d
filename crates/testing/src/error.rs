// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use thiserror::Error;

/// Store-level errors surfaced by the engine double.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
	/// The key does not exist (or was dropped by compaction).
	#[error("not found")]
	NotFound,

	/// A merge was issued against a store with no merge operator.
	#[error("merge operator required but not configured")]
	MergeOperatorRequired,

	/// A prefix scan was issued against a store with no prefix extractor.
	#[error("prefix extractor required but not configured")]
	PrefixExtractorRequired,

	/// The merge operator reported failure from `full_merge`; the engine
	/// treats this as corruption of the merge chain.
	#[error("merge operator failed to produce a value")]
	MergeFailure,
}
