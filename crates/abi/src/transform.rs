// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::{c_char, c_void};

/// Virtual function table for slice transforms
///
/// A slice transform derives a prefix (or another deterministic projection)
/// from a key for prefix-based indexing and iteration. The engine caches
/// and compares derived keys across calls, so `transform` must be a pure
/// function of its input.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct SliceTransformVTableFFI {
	/// Derive a key projection
	///
	/// # Parameters
	/// - `state`: opaque handler handle
	/// - `key`, `key_len`: source key, borrowed for the call; only keys for
	///   which `in_domain` holds are passed here
	/// - `out_len`: out, length of the returned buffer
	///
	/// # Returns
	/// - owned derived-key buffer, released by the engine through
	///   `BufferFFI::release_raw`
	pub transform: extern "C" fn(state: *mut c_void, key: *const u8, key_len: usize, out_len: *mut usize) -> *mut u8,

	/// Whether a key participates in prefix extraction at all. Evaluated by
	/// the engine before (and independently of) `transform`.
	pub in_domain: extern "C" fn(state: *mut c_void, key: *const u8, key_len: usize) -> u8,

	/// Whether a derived key is itself a valid output of `transform`.
	pub in_range: extern "C" fn(state: *mut c_void, key: *const u8, key_len: usize) -> u8,

	/// Stable identifier for configuration-mismatch detection.
	pub name: extern "C" fn(state: *mut c_void) -> *const c_char,

	/// No-op destroy hook.
	pub destroy: extern "C" fn(state: *mut c_void),
}

/// Engine-native slice-transform object.
#[repr(C)]
pub struct SliceTransformFFI {
	pub state: *mut c_void,
	pub vtable: SliceTransformVTableFFI,
}

// SAFETY: `state` is an integer handle, never dereferenced as memory.
unsafe impl Send for SliceTransformFFI {}
unsafe impl Sync for SliceTransformFFI {}
