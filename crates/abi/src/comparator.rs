// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::{c_char, c_void};

/// Virtual function table for key comparators
///
/// The engine consults the comparator for every ordering-dependent
/// structure it maintains (sorted tables, iteration, seeks). All entries
/// are infallible and must be valid (non-null).
#[repr(C)]
#[derive(Clone, Copy)]
pub struct ComparatorVTableFFI {
	/// Three-way comparison over two keys
	///
	/// # Parameters
	/// - `state`: opaque handler handle
	/// - `a`, `a_len`: first key, borrowed for the call
	/// - `b`, `b_len`: second key, borrowed for the call
	///
	/// # Returns
	/// - negative if `a < b`, zero if equal, positive if `a > b`
	///
	/// The order must be total, consistent across calls and with the
	/// ordering the store was created under. Changing it once data exists
	/// silently corrupts logical ordering; the engine does not detect this.
	pub compare: extern "C" fn(state: *mut c_void, a: *const u8, a_len: usize, b: *const u8, b_len: usize) -> i32,

	/// Stable identifier used to detect configuration mismatches across
	/// store opens. The returned pointer must stay valid for the lifetime
	/// of the extension-point object.
	pub name: extern "C" fn(state: *mut c_void) -> *const c_char,

	/// Destroy hook invoked when the engine drops the comparator object.
	/// No host-side state is owned besides the handle, so this is a no-op.
	pub destroy: extern "C" fn(state: *mut c_void),
}

/// Engine-native comparator object: the opaque handler handle plus its
/// callback table. Constructed once per store configuration and owned by
/// the engine for the life of the store.
#[repr(C)]
pub struct ComparatorFFI {
	pub state: *mut c_void,
	pub vtable: ComparatorVTableFFI,
}

// SAFETY: `state` is an integer handle, never dereferenced as memory, and
// the callbacks are required to be callable from any engine thread.
unsafe impl Send for ComparatorFFI {}
unsafe impl Sync for ComparatorFFI {}
