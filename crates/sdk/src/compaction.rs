// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Compaction-filter extension point

use core::ffi::{c_char, c_void};
use std::{ffi::CString, sync::Arc};

use granite_abi::{
	CompactionFilterFFI, CompactionFilterVTableFFI, HandleFFI,
	constants::{BOOL_FALSE, BOOL_TRUE, COMPACTION_KEEP, COMPACTION_REMOVE},
	data::BufferFFI,
};

use crate::{marshal, registry::Registry};

/// Outcome of filtering one key-value pair during compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompactionDecision {
	/// Keep the pair unchanged.
	Keep,
	/// Drop the pair from the compaction output.
	Remove,
	/// Keep the key but rewrite its value.
	Change(Vec<u8>),
}

/// A compaction filter decides, per key-value pair visited by a background
/// compaction, whether the pair is kept, dropped, or rewritten.
///
/// It runs inline on the engine's compaction threads, never on the thread
/// that issued a write. The decision must be a pure function of
/// (level, key, value) and must not block or perform unbounded work: a
/// slow filter stalls all compaction progress.
pub trait CompactionFilter: Send + Sync + 'static {
	fn filter(&self, level: i32, key: &[u8], value: &[u8]) -> CompactionDecision;

	/// Identifier for configuration-mismatch detection.
	fn name(&self) -> &str;
}

static COMPACTION_FILTERS: Registry<dyn CompactionFilter> = Registry::new();

/// Register a compaction-filter handler and hand out its opaque handle.
pub fn register_compaction_filter(handler: Arc<dyn CompactionFilter>) -> HandleFFI {
	let name = CString::new(handler.name()).expect("compaction filter name must not contain NUL bytes");
	COMPACTION_FILTERS.register(name, handler)
}

/// Build the engine-native compaction-filter object for a registered
/// handle.
pub fn create_compaction_filter(handle: HandleFFI) -> CompactionFilterFFI {
	CompactionFilterFFI {
		state: handle.into_state(),
		vtable: CompactionFilterVTableFFI {
			filter: compaction_filter_filter,
			name: compaction_filter_name,
			destroy: marshal::destroy_noop,
		},
	}
}

extern "C" fn compaction_filter_filter(
	state: *mut c_void,
	level: i32,
	key: *const u8,
	key_len: usize,
	value: *const u8,
	value_len: usize,
	new_value: *mut *mut u8,
	new_value_len: *mut usize,
	value_changed: *mut u8,
) -> u8 {
	marshal::dispatch("compaction_filter::filter", || {
		let handler = COMPACTION_FILTERS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		let value = unsafe { marshal::bytes(value, value_len) };
		match handler.filter(level, key, value) {
			CompactionDecision::Keep => {
				unsafe { *value_changed = BOOL_FALSE };
				COMPACTION_KEEP
			}
			CompactionDecision::Remove => {
				unsafe { *value_changed = BOOL_FALSE };
				COMPACTION_REMOVE
			}
			CompactionDecision::Change(replacement) => {
				let buffer = BufferFFI::from_vec(replacement);
				unsafe {
					*new_value = buffer.data;
					*new_value_len = buffer.len;
					*value_changed = BOOL_TRUE;
				}
				COMPACTION_KEEP
			}
		}
	})
}

extern "C" fn compaction_filter_name(state: *mut c_void) -> *const c_char {
	marshal::dispatch("compaction_filter::name", || COMPACTION_FILTERS.name_ptr(HandleFFI::from_state(state)))
}
