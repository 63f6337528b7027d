// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::{c_char, c_void};

/// Virtual function table for merge operators
///
/// Operand lists are passed as parallel (pointer, length) arrays with an
/// explicit count; nothing is null-terminated. Result buffers are owned by
/// the callback's side of the boundary and handed to the engine, which
/// releases them later through `delete_value`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct MergeOperatorVTableFFI {
	/// Combine an existing value (or absence) with a list of operands
	///
	/// # Parameters
	/// - `state`: opaque handler handle
	/// - `key`, `key_len`: key being merged, borrowed for the call
	/// - `existing`, `existing_len`: current base value; `existing` is null
	///   when the key has no base value
	/// - `operands`, `operand_lens`, `operand_count`: parallel operand
	///   arrays, borrowed for the call
	/// - `success`: out, byte flag; the engine treats failure here as a
	///   store-level error
	/// - `result_len`: out, length of the returned buffer
	///
	/// # Returns
	/// - owned result buffer on success, null on failure
	pub full_merge: extern "C" fn(
		state: *mut c_void,
		key: *const u8,
		key_len: usize,
		existing: *const u8,
		existing_len: usize,
		operands: *const *const u8,
		operand_lens: *const usize,
		operand_count: usize,
		success: *mut u8,
		result_len: *mut usize,
	) -> *mut u8,

	/// Combine several operands into one without the base value
	///
	/// May decline by returning null with `success` set to false; the
	/// engine then falls back to sequential full-merge application.
	/// Declining is always safe, this path is purely an optimization.
	pub partial_merge: extern "C" fn(
		state: *mut c_void,
		key: *const u8,
		key_len: usize,
		operands: *const *const u8,
		operand_lens: *const usize,
		operand_count: usize,
		success: *mut u8,
		result_len: *mut usize,
	) -> *mut u8,

	/// Release a result buffer previously returned by `full_merge` or
	/// `partial_merge` of this same object. Must never be handed
	/// engine-owned memory.
	pub delete_value: extern "C" fn(state: *mut c_void, value: *mut u8, value_len: usize),

	/// Stable identifier for configuration-mismatch detection.
	pub name: extern "C" fn(state: *mut c_void) -> *const c_char,

	/// No-op destroy hook, see `ComparatorVTableFFI::destroy`.
	pub destroy: extern "C" fn(state: *mut c_void),
}

/// Engine-native merge-operator object.
#[repr(C)]
pub struct MergeOperatorFFI {
	pub state: *mut c_void,
	pub vtable: MergeOperatorVTableFFI,
}

// SAFETY: `state` is an integer handle, never dereferenced as memory.
unsafe impl Send for MergeOperatorFFI {}
unsafe impl Sync for MergeOperatorFFI {}
