// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Comparator extension point

use core::ffi::{c_char, c_void};
use std::{cmp::Ordering, ffi::CString, sync::Arc};

use granite_abi::{ComparatorFFI, ComparatorVTableFFI, HandleFFI};

use crate::{marshal, registry::Registry};

/// A comparator supplies a total order over keys.
///
/// The engine uses it for every ordering-dependent structure it maintains,
/// so the order must stay consistent across calls and with the ordering the
/// store was created under. Reversing or changing the order once data
/// exists silently corrupts logical ordering; that contract is the
/// handler's obligation, the adapter does not detect it.
pub trait Comparator: Send + Sync + 'static {
	/// Three-way comparison. Infallible by contract.
	fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;

	/// Identifier the engine uses to detect configuration mismatches
	/// across store opens. Must be stable for the configuration lifetime.
	fn name(&self) -> &str;
}

static COMPARATORS: Registry<dyn Comparator> = Registry::new();

/// Register a comparator handler, interning its name, and hand out the
/// opaque handle the engine will pass back on every callback.
pub fn register_comparator(handler: Arc<dyn Comparator>) -> HandleFFI {
	let name = CString::new(handler.name()).expect("comparator name must not contain NUL bytes");
	COMPARATORS.register(name, handler)
}

/// Build the engine-native comparator object for a registered handle.
pub fn create_comparator(handle: HandleFFI) -> ComparatorFFI {
	ComparatorFFI {
		state: handle.into_state(),
		vtable: ComparatorVTableFFI {
			compare: comparator_compare,
			name: comparator_name,
			destroy: marshal::destroy_noop,
		},
	}
}

extern "C" fn comparator_compare(state: *mut c_void, a: *const u8, a_len: usize, b: *const u8, b_len: usize) -> i32 {
	marshal::dispatch("comparator::compare", || {
		let handler = COMPARATORS.resolve(HandleFFI::from_state(state));
		let (a, b) = unsafe { (marshal::bytes(a, a_len), marshal::bytes(b, b_len)) };
		match handler.compare(a, b) {
			Ordering::Less => -1,
			Ordering::Equal => 0,
			Ordering::Greater => 1,
		}
	})
}

extern "C" fn comparator_name(state: *mut c_void) -> *const c_char {
	marshal::dispatch("comparator::name", || COMPARATORS.name_ptr(HandleFFI::from_state(state)))
}
