// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Slice-transform extension point

use core::ffi::{c_char, c_void};
use std::{ffi::CString, sync::Arc};

use granite_abi::{HandleFFI, SliceTransformFFI, SliceTransformVTableFFI, data::BufferFFI};

use crate::{marshal, registry::Registry};

/// A slice transform derives a prefix (or other deterministic projection)
/// from a key for prefix-based indexing and iteration.
///
/// `transform` must be a pure function of its input with no side effects:
/// the engine caches and compares derived keys across calls. `in_domain`
/// gates which keys participate in prefix extraction; the engine evaluates
/// it before (and independently of) `transform`, so `transform` may assume
/// its argument is in domain.
pub trait SliceTransform: Send + Sync + 'static {
	fn transform(&self, key: &[u8]) -> Vec<u8>;

	fn in_domain(&self, _key: &[u8]) -> bool {
		true
	}

	/// Whether a derived key is itself a valid transform output.
	fn in_range(&self, _prefix: &[u8]) -> bool {
		true
	}

	/// Identifier for configuration-mismatch detection.
	fn name(&self) -> &str;
}

static SLICE_TRANSFORMS: Registry<dyn SliceTransform> = Registry::new();

/// Register a slice-transform handler and hand out its opaque handle.
pub fn register_slice_transform(handler: Arc<dyn SliceTransform>) -> HandleFFI {
	let name = CString::new(handler.name()).expect("slice transform name must not contain NUL bytes");
	SLICE_TRANSFORMS.register(name, handler)
}

/// Build the engine-native slice-transform object for a registered handle.
pub fn create_slice_transform(handle: HandleFFI) -> SliceTransformFFI {
	SliceTransformFFI {
		state: handle.into_state(),
		vtable: SliceTransformVTableFFI {
			transform: slice_transform_transform,
			in_domain: slice_transform_in_domain,
			in_range: slice_transform_in_range,
			name: slice_transform_name,
			destroy: marshal::destroy_noop,
		},
	}
}

extern "C" fn slice_transform_transform(
	state: *mut c_void,
	key: *const u8,
	key_len: usize,
	out_len: *mut usize,
) -> *mut u8 {
	marshal::dispatch("slice_transform::transform", || {
		let handler = SLICE_TRANSFORMS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		let buffer = BufferFFI::from_vec(handler.transform(key));
		unsafe { *out_len = buffer.len };
		buffer.data
	})
}

extern "C" fn slice_transform_in_domain(state: *mut c_void, key: *const u8, key_len: usize) -> u8 {
	marshal::dispatch("slice_transform::in_domain", || {
		let handler = SLICE_TRANSFORMS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		marshal::bool_byte(handler.in_domain(key))
	})
}

extern "C" fn slice_transform_in_range(state: *mut c_void, key: *const u8, key_len: usize) -> u8 {
	marshal::dispatch("slice_transform::in_range", || {
		let handler = SLICE_TRANSFORMS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		marshal::bool_byte(handler.in_range(key))
	})
}

extern "C" fn slice_transform_name(state: *mut c_void) -> *const c_char {
	marshal::dispatch("slice_transform::name", || SLICE_TRANSFORMS.name_ptr(HandleFFI::from_state(state)))
}
