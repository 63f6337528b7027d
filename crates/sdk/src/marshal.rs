// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Borrowed-view marshalling helpers and the callback panic guard

use core::{ffi::c_void, slice};
use std::{
	panic::{AssertUnwindSafe, catch_unwind},
	process::abort,
};

use granite_abi::constants::{BOOL_FALSE, BOOL_TRUE};
use tracing::error;

/// View an engine-owned (pointer, length) pair as a borrowed slice.
///
/// The view is only valid for the duration of the callback invocation and
/// must never be retained past return.
///
/// # Safety
/// - `data` must point to `len` readable bytes, or be null with the pair
///   denoting the empty buffer.
pub(crate) unsafe fn bytes<'a>(data: *const u8, len: usize) -> &'a [u8] {
	if data.is_null() || len == 0 {
		return &[];
	}
	unsafe { slice::from_raw_parts(data, len) }
}

/// View parallel (pointer, length) arrays as a list of borrowed slices.
/// The arrays carry an explicit count; nothing is null-terminated.
///
/// # Safety
/// - `items` and `lens` must each point to `count` readable elements, and
///   every element pair must satisfy the contract of [`bytes`].
pub(crate) unsafe fn byte_lists<'a>(items: *const *const u8, lens: *const usize, count: usize) -> Vec<&'a [u8]> {
	if items.is_null() || lens.is_null() || count == 0 {
		return Vec::new();
	}
	let items = unsafe { slice::from_raw_parts(items, count) };
	let lens = unsafe { slice::from_raw_parts(lens, count) };
	items.iter().zip(lens).map(|(&data, &len)| unsafe { bytes(data, len) }).collect()
}

pub(crate) fn bool_byte(value: bool) -> u8 {
	if value { BOOL_TRUE } else { BOOL_FALSE }
}

/// Run a dispatch adapter body under a panic guard.
///
/// Unwinding into the engine is undefined behavior, so a panic inside a
/// handler is fatal: log and abort.
pub(crate) fn dispatch<R>(callback: &'static str, body: impl FnOnce() -> R) -> R {
	match catch_unwind(AssertUnwindSafe(body)) {
		Ok(value) => value,
		Err(_) => {
			error!(callback, "panic crossed the engine callback boundary, aborting");
			abort();
		}
	}
}

/// Shared destructor for every extension-point object. No host-side state
/// is owned besides the handle, so there is nothing to free.
pub(crate) extern "C" fn destroy_noop(_state: *mut c_void) {}
