// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::{c_char, c_void};

/// Virtual function table for filter policies
///
/// A filter policy builds a compact probabilistic membership structure per
/// table block at write time and probes it at read time to skip blocks
/// that cannot contain a key. False positives are acceptable, false
/// negatives are not.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FilterPolicyVTableFFI {
	/// Build a filter block from the key set of one table block
	///
	/// # Parameters
	/// - `state`: opaque handler handle
	/// - `keys`, `key_lens`, `key_count`: parallel key arrays, borrowed for
	///   the call
	/// - `filter_len`: out, length of the returned filter block
	///
	/// # Returns
	/// - owned filter block, released later through `delete_filter`
	pub create_filter: extern "C" fn(
		state: *mut c_void,
		keys: *const *const u8,
		key_lens: *const usize,
		key_count: usize,
		filter_len: *mut usize,
	) -> *mut u8,

	/// Probe a filter block for a key
	///
	/// Must return true for every key that was in the block's creation set;
	/// may return true for keys that were not.
	pub key_may_match: extern "C" fn(
		state: *mut c_void,
		key: *const u8,
		key_len: usize,
		filter: *const u8,
		filter_len: usize,
	) -> u8,

	/// Release a filter block previously returned by `create_filter` of
	/// this same object.
	pub delete_filter: extern "C" fn(state: *mut c_void, filter: *mut u8, filter_len: usize),

	/// Stable identifier for configuration-mismatch detection.
	pub name: extern "C" fn(state: *mut c_void) -> *const c_char,

	/// No-op destroy hook.
	pub destroy: extern "C" fn(state: *mut c_void),
}

/// Engine-native filter-policy object.
#[repr(C)]
pub struct FilterPolicyFFI {
	pub state: *mut c_void,
	pub vtable: FilterPolicyVTableFFI,
}

// SAFETY: `state` is an integer handle, never dereferenced as memory.
unsafe impl Send for FilterPolicyFFI {}
unsafe impl Sync for FilterPolicyFFI {}
