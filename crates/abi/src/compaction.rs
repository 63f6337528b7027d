// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::{c_char, c_void};

/// Virtual function table for compaction filters
#[repr(C)]
#[derive(Clone, Copy)]
pub struct CompactionFilterVTableFFI {
	/// Decide the fate of one key-value pair during background compaction
	///
	/// Invoked once per pair visited, inline on a compaction thread. The
	/// outcome is three-way:
	/// - return [`COMPACTION_REMOVE`]: drop the pair
	/// - return [`COMPACTION_KEEP`] with `value_changed` false: keep as is
	/// - return [`COMPACTION_KEEP`] with `value_changed` true: keep with
	///   the replacement written to `new_value`/`new_value_len`
	///
	/// The replacement buffer is owned by the callback's side and released
	/// by the engine through `BufferFFI::release_raw`. The decision must be
	/// a pure function of (level, key, value) and must not block: a slow
	/// filter stalls all compaction progress.
	///
	/// [`COMPACTION_KEEP`]: crate::constants::COMPACTION_KEEP
	/// [`COMPACTION_REMOVE`]: crate::constants::COMPACTION_REMOVE
	pub filter: extern "C" fn(
		state: *mut c_void,
		level: i32,
		key: *const u8,
		key_len: usize,
		value: *const u8,
		value_len: usize,
		new_value: *mut *mut u8,
		new_value_len: *mut usize,
		value_changed: *mut u8,
	) -> u8,

	/// Stable identifier for configuration-mismatch detection.
	pub name: extern "C" fn(state: *mut c_void) -> *const c_char,

	/// No-op destroy hook.
	pub destroy: extern "C" fn(state: *mut c_void),
}

/// Engine-native compaction-filter object.
#[repr(C)]
pub struct CompactionFilterFFI {
	pub state: *mut c_void,
	pub vtable: CompactionFilterVTableFFI,
}

// SAFETY: `state` is an integer handle, never dereferenced as memory.
unsafe impl Send for CompactionFilterFFI {}
unsafe impl Sync for CompactionFilterFFI {}
