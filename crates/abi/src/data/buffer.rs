// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::slice;

/// Owned output buffer crossing the extension boundary.
///
/// Every buffer a callback hands to the engine is produced by [`from_vec`]
/// and released exactly once, either through the extension kind's delete
/// entry (merge results, filter blocks) or directly through
/// [`release_raw`] (replacement values, transformed keys). The pair is
/// always (pointer, explicit length); nothing on this boundary is
/// terminator-sized.
///
/// [`from_vec`]: BufferFFI::from_vec
/// [`release_raw`]: BufferFFI::release_raw
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct BufferFFI {
	/// Buffer start, allocated by the host allocator. Null only for the
	/// empty buffer.
	pub data: *mut u8,
	/// Length in bytes.
	pub len: usize,
}

impl BufferFFI {
	/// Create an empty buffer.
	pub const fn empty() -> Self {
		Self {
			data: core::ptr::null_mut(),
			len: 0,
		}
	}

	pub fn is_empty(&self) -> bool {
		self.data.is_null() || self.len == 0
	}

	/// Transfer a `Vec<u8>` across the boundary.
	///
	/// The vector is shrunk to a boxed slice first so that length and
	/// capacity coincide; [`release_raw`] relies on this.
	///
	/// [`release_raw`]: BufferFFI::release_raw
	pub fn from_vec(bytes: Vec<u8>) -> Self {
		let boxed = bytes.into_boxed_slice();
		let len = boxed.len();
		let data = Box::into_raw(boxed) as *mut u8;
		Self {
			data,
			len,
		}
	}

	/// Take ownership of the bytes back onto the Rust side.
	///
	/// # Safety
	/// - `self` must have been produced by [`BufferFFI::from_vec`] and not
	///   released yet.
	pub unsafe fn into_vec(self) -> Vec<u8> {
		if self.data.is_null() {
			return Vec::new();
		}
		unsafe { Box::from_raw(slice::from_raw_parts_mut(self.data, self.len)).into_vec() }
	}

	/// Borrow the buffer contents.
	///
	/// # Safety
	/// - `self` must not have been released.
	pub unsafe fn as_bytes(&self) -> &[u8] {
		if self.data.is_null() {
			return &[];
		}
		unsafe { slice::from_raw_parts(self.data, self.len) }
	}

	/// Release a raw (pointer, length) pair previously produced by
	/// [`BufferFFI::from_vec`].
	///
	/// # Safety
	/// - `(data, len)` must come from a single `from_vec` call and must not
	///   be released twice.
	/// - Must never be called on engine-owned memory.
	pub unsafe fn release_raw(data: *mut u8, len: usize) {
		if data.is_null() {
			return;
		}
		drop(unsafe { Box::from_raw(slice::from_raw_parts_mut(data, len)) });
	}
}
