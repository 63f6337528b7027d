// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

use core::ffi::c_void;

/// Opaque handle identifying a registered extension handler.
///
/// The engine stores this value as the state pointer of an extension-point
/// object and passes it back, untouched, on every callback. It is a key
/// into an externally owned handler table, never a pointer to memory: the
/// adapter neither allocates nor frees anything through it.
///
/// A handle stays resolvable for as long as any extension-point object
/// embedding it is alive. Handler tables are append-only, so this holds for
/// the whole process lifetime.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleFFI(u64);

impl HandleFFI {
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	pub const fn get(self) -> u64 {
		self.0
	}

	/// Table index this handle denotes.
	pub const fn index(self) -> usize {
		self.0 as usize
	}

	/// Encode the handle as the state pointer of an extension-point object.
	pub fn into_state(self) -> *mut c_void {
		self.0 as usize as *mut c_void
	}

	/// Recover the handle from a state pointer the engine passed back.
	pub fn from_state(state: *mut c_void) -> Self {
		Self(state as usize as u64)
	}
}
