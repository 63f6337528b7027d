// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Filter-policy extension point

use core::ffi::{c_char, c_void};
use std::{ffi::CString, sync::Arc};

use granite_abi::{FilterPolicyFFI, FilterPolicyVTableFFI, HandleFFI, data::BufferFFI};

use crate::{marshal, registry::Registry};

/// A filter policy builds a compact probabilistic membership structure per
/// table block at write time, and probes it at read time to skip blocks
/// that cannot contain a key.
///
/// `key_may_match` must never return false for a key that was in the
/// creation set (no false negatives); false positives merely cost an
/// unnecessary read.
pub trait FilterPolicy: Send + Sync + 'static {
	/// Encode a filter block from the block's key set.
	fn create_filter(&self, keys: &[&[u8]]) -> Vec<u8>;

	/// Probe a previously created filter block.
	fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool;

	/// Identifier for configuration-mismatch detection.
	fn name(&self) -> &str;
}

static FILTER_POLICIES: Registry<dyn FilterPolicy> = Registry::new();

/// Register a filter-policy handler and hand out its opaque handle.
pub fn register_filter_policy(handler: Arc<dyn FilterPolicy>) -> HandleFFI {
	let name = CString::new(handler.name()).expect("filter policy name must not contain NUL bytes");
	FILTER_POLICIES.register(name, handler)
}

/// Build the engine-native filter-policy object for a registered handle.
pub fn create_filter_policy(handle: HandleFFI) -> FilterPolicyFFI {
	FilterPolicyFFI {
		state: handle.into_state(),
		vtable: FilterPolicyVTableFFI {
			create_filter: filter_policy_create_filter,
			key_may_match: filter_policy_key_may_match,
			delete_filter: filter_policy_delete_filter,
			name: filter_policy_name,
			destroy: marshal::destroy_noop,
		},
	}
}

extern "C" fn filter_policy_create_filter(
	state: *mut c_void,
	keys: *const *const u8,
	key_lens: *const usize,
	key_count: usize,
	filter_len: *mut usize,
) -> *mut u8 {
	marshal::dispatch("filter_policy::create_filter", || {
		let handler = FILTER_POLICIES.resolve(HandleFFI::from_state(state));
		let keys = unsafe { marshal::byte_lists(keys, key_lens, key_count) };
		let buffer = BufferFFI::from_vec(handler.create_filter(&keys));
		unsafe { *filter_len = buffer.len };
		buffer.data
	})
}

extern "C" fn filter_policy_key_may_match(
	state: *mut c_void,
	key: *const u8,
	key_len: usize,
	filter: *const u8,
	filter_len: usize,
) -> u8 {
	marshal::dispatch("filter_policy::key_may_match", || {
		let handler = FILTER_POLICIES.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		let filter = unsafe { marshal::bytes(filter, filter_len) };
		marshal::bool_byte(handler.key_may_match(key, filter))
	})
}

extern "C" fn filter_policy_delete_filter(_state: *mut c_void, filter: *mut u8, filter_len: usize) {
	marshal::dispatch("filter_policy::delete_filter", || {
		// Only blocks produced by create_filter of this kind reach here.
		unsafe { BufferFFI::release_raw(filter, filter_len) };
	})
}

extern "C" fn filter_policy_name(state: *mut c_void) -> *const c_char {
	marshal::dispatch("filter_policy::name", || FILTER_POLICIES.name_ptr(HandleFFI::from_state(state)))
}
