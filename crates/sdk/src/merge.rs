// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Merge-operator extension point

use core::ffi::{c_char, c_void};
use std::{ffi::CString, ptr, sync::Arc};

use granite_abi::{
	HandleFFI, MergeOperatorFFI, MergeOperatorVTableFFI,
	constants::{BOOL_FALSE, BOOL_TRUE},
	data::BufferFFI,
};

use crate::{marshal, registry::Registry};

/// A merge operator folds accumulated merge operands into a value.
///
/// `full_merge` runs on read paths, flushes and compactions; the engine
/// treats a `None` result as a store-level error. `partial_merge` is an
/// optimization that may combine operands ahead of time; declining (the
/// default) is always safe and makes the engine fall back to sequential
/// full-merge application.
pub trait MergeOperator: Send + Sync + 'static {
	/// Combine the existing value (absent for keys with no base value)
	/// with the operand list, oldest operand first.
	fn full_merge(&self, key: &[u8], existing: Option<&[u8]>, operands: &[&[u8]]) -> Option<Vec<u8>>;

	/// Combine several operands into a single replacement operand.
	fn partial_merge(&self, _key: &[u8], _operands: &[&[u8]]) -> Option<Vec<u8>> {
		None
	}

	/// Identifier for configuration-mismatch detection.
	fn name(&self) -> &str;
}

static MERGE_OPERATORS: Registry<dyn MergeOperator> = Registry::new();

/// Register a merge-operator handler and hand out its opaque handle.
pub fn register_merge_operator(handler: Arc<dyn MergeOperator>) -> HandleFFI {
	let name = CString::new(handler.name()).expect("merge operator name must not contain NUL bytes");
	MERGE_OPERATORS.register(name, handler)
}

/// Build the engine-native merge-operator object for a registered handle.
pub fn create_merge_operator(handle: HandleFFI) -> MergeOperatorFFI {
	MergeOperatorFFI {
		state: handle.into_state(),
		vtable: MergeOperatorVTableFFI {
			full_merge: merge_full_merge,
			partial_merge: merge_partial_merge,
			delete_value: merge_delete_value,
			name: merge_name,
			destroy: marshal::destroy_noop,
		},
	}
}

/// Translate a handler result into the engine's output convention: an
/// owned buffer with its length and success flag written through the out
/// parameters, or a null buffer on decline/failure.
fn marshal_result(result: Option<Vec<u8>>, success: *mut u8, result_len: *mut usize) -> *mut u8 {
	match result {
		Some(value) => {
			let buffer = BufferFFI::from_vec(value);
			unsafe {
				*success = BOOL_TRUE;
				*result_len = buffer.len;
			}
			buffer.data
		}
		None => {
			unsafe {
				*success = BOOL_FALSE;
				*result_len = 0;
			}
			ptr::null_mut()
		}
	}
}

extern "C" fn merge_full_merge(
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
) -> *mut u8 {
	marshal::dispatch("merge_operator::full_merge", || {
		let handler = MERGE_OPERATORS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		// A null existing pointer means the key has no base value; an empty
		// non-null buffer is a present, empty value.
		let existing = (!existing.is_null()).then(|| unsafe { marshal::bytes(existing, existing_len) });
		let operands = unsafe { marshal::byte_lists(operands, operand_lens, operand_count) };
		marshal_result(handler.full_merge(key, existing, &operands), success, result_len)
	})
}

extern "C" fn merge_partial_merge(
	state: *mut c_void,
	key: *const u8,
	key_len: usize,
	operands: *const *const u8,
	operand_lens: *const usize,
	operand_count: usize,
	success: *mut u8,
	result_len: *mut usize,
) -> *mut u8 {
	marshal::dispatch("merge_operator::partial_merge", || {
		let handler = MERGE_OPERATORS.resolve(HandleFFI::from_state(state));
		let key = unsafe { marshal::bytes(key, key_len) };
		let operands = unsafe { marshal::byte_lists(operands, operand_lens, operand_count) };
		marshal_result(handler.partial_merge(key, &operands), success, result_len)
	})
}

extern "C" fn merge_delete_value(_state: *mut c_void, value: *mut u8, value_len: usize) {
	marshal::dispatch("merge_operator::delete_value", || {
		// Only buffers produced by full_merge/partial_merge of this kind
		// ever reach this entry; they all come from BufferFFI::from_vec.
		unsafe { BufferFFI::release_raw(value, value_len) };
	})
}

extern "C" fn merge_name(state: *mut c_void) -> *const c_char {
	marshal::dispatch("merge_operator::name", || MERGE_OPERATORS.name_ptr(HandleFFI::from_state(state)))
}

#[cfg(test)]
mod tests {
	use std::{ptr, sync::Arc};

	use granite_abi::{
		MergeOperatorFFI,
		constants::{BOOL_FALSE, BOOL_TRUE},
	};

	use super::{MergeOperator, create_merge_operator, register_merge_operator};

	/// Concatenates base value and operands with `+`.
	struct Concat;

	impl MergeOperator for Concat {
		fn full_merge(&self, _key: &[u8], existing: Option<&[u8]>, operands: &[&[u8]]) -> Option<Vec<u8>> {
			let mut parts: Vec<&[u8]> = Vec::new();
			parts.extend(existing);
			parts.extend_from_slice(operands);
			Some(parts.join(&b"+"[..]))
		}

		fn partial_merge(&self, _key: &[u8], operands: &[&[u8]]) -> Option<Vec<u8>> {
			Some(operands.join(&b"+"[..]))
		}

		fn name(&self) -> &str {
			"concat"
		}
	}

	/// Declines partial merges; fails full merges on a marker key.
	struct Picky;

	impl MergeOperator for Picky {
		fn full_merge(&self, key: &[u8], _existing: Option<&[u8]>, operands: &[&[u8]]) -> Option<Vec<u8>> {
			if key == b"poison" {
				return None;
			}
			Some(operands.concat())
		}

		fn name(&self) -> &str {
			"picky"
		}
	}

	fn call_full(
		object: &MergeOperatorFFI,
		key: &[u8],
		existing: Option<&[u8]>,
		operands: &[&[u8]],
	) -> (*mut u8, usize, u8) {
		let ptrs: Vec<*const u8> = operands.iter().map(|op| op.as_ptr()).collect();
		let lens: Vec<usize> = operands.iter().map(|op| op.len()).collect();
		let (existing_ptr, existing_len) = match existing {
			Some(value) => (value.as_ptr(), value.len()),
			None => (ptr::null(), 0),
		};
		let mut success = 0u8;
		let mut result_len = 0usize;
		let data = (object.vtable.full_merge)(
			object.state,
			key.as_ptr(),
			key.len(),
			existing_ptr,
			existing_len,
			ptrs.as_ptr(),
			lens.as_ptr(),
			operands.len(),
			&mut success,
			&mut result_len,
		);
		(data, result_len, success)
	}

	fn call_partial(object: &MergeOperatorFFI, key: &[u8], operands: &[&[u8]]) -> (*mut u8, usize, u8) {
		let ptrs: Vec<*const u8> = operands.iter().map(|op| op.as_ptr()).collect();
		let lens: Vec<usize> = operands.iter().map(|op| op.len()).collect();
		let mut success = 0u8;
		let mut result_len = 0usize;
		let data = (object.vtable.partial_merge)(
			object.state,
			key.as_ptr(),
			key.len(),
			ptrs.as_ptr(),
			lens.as_ptr(),
			operands.len(),
			&mut success,
			&mut result_len,
		);
		(data, result_len, success)
	}

	fn take(object: &MergeOperatorFFI, data: *mut u8, len: usize) -> Vec<u8> {
		let value = unsafe { core::slice::from_raw_parts(data, len) }.to_vec();
		(object.vtable.delete_value)(object.state, data, len);
		value
	}

	#[test]
	fn test_full_merge_with_base() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Concat)));

		let (data, len, success) = call_full(&object, b"k", Some(b"x"), &[b"y", b"z"]);
		assert_eq!(success, BOOL_TRUE);
		assert_eq!(take(&object, data, len), b"x+y+z");
	}

	#[test]
	fn test_full_merge_absent_base() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Concat)));

		let (data, len, success) = call_full(&object, b"k", None, &[b"y", b"z"]);
		assert_eq!(success, BOOL_TRUE);
		assert_eq!(take(&object, data, len), b"y+z");
	}

	#[test]
	fn test_full_merge_failure() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Picky)));

		let (data, len, success) = call_full(&object, b"poison", None, &[b"y"]);
		assert_eq!(success, BOOL_FALSE);
		assert_eq!(len, 0);
		assert!(data.is_null());
	}

	#[test]
	fn test_partial_merge_combines() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Concat)));

		let (data, len, success) = call_partial(&object, b"k", &[b"y", b"z"]);
		assert_eq!(success, BOOL_TRUE);
		assert_eq!(take(&object, data, len), b"y+z");
	}

	#[test]
	fn test_partial_merge_decline_is_default() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Picky)));

		let (data, len, success) = call_partial(&object, b"k", &[b"y", b"z"]);
		assert_eq!(success, BOOL_FALSE);
		assert_eq!(len, 0);
		assert!(data.is_null());
	}

	#[test]
	fn test_partial_then_full_equals_sequential_full() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Concat)));

		// Sequential: fold each operand through full_merge one at a time.
		let (data, len, success) = call_full(&object, b"k", Some(b"x"), &[b"y"]);
		assert_eq!(success, BOOL_TRUE);
		let step = take(&object, data, len);
		let (data, len, _) = call_full(&object, b"k", Some(&step), &[b"z"]);
		let sequential = take(&object, data, len);

		// Combined: partial_merge the operands, then one full_merge.
		let (data, len, _) = call_partial(&object, b"k", &[b"y", b"z"]);
		let combined_operand = take(&object, data, len);
		let (data, len, _) = call_full(&object, b"k", Some(b"x"), &[&combined_operand]);
		let combined = take(&object, data, len);

		assert_eq!(sequential, combined);
		assert_eq!(combined, b"x+y+z");
	}

	#[test]
	fn test_empty_operand_list() {
		let object = create_merge_operator(register_merge_operator(Arc::new(Concat)));

		let mut success = 0u8;
		let mut result_len = 0usize;
		let data = (object.vtable.full_merge)(
			object.state,
			b"k".as_ptr(),
			1,
			b"x".as_ptr(),
			1,
			ptr::null(),
			ptr::null(),
			0,
			&mut success,
			&mut result_len,
		);
		assert_eq!(success, BOOL_TRUE);
		assert_eq!(take(&object, data, result_len), b"x");
	}
}
