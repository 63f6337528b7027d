// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Append-only handler registry backing the opaque-handle dispatch

use core::ffi::c_char;
use std::{ffi::CString, process::abort, sync::Arc};

use granite_abi::HandleFFI;
use parking_lot::RwLock;
use tracing::error;

/// Append-only table mapping opaque handles to live handler objects.
///
/// One static registry exists per extension kind. Entries are never
/// removed, so a handle stays resolvable for the rest of the process,
/// which covers the lifetime of any extension-point object embedding it.
/// Lookup takes a read lock only for the table access itself; handler
/// calls are never serialized by the registry.
pub struct Registry<T: ?Sized> {
	entries: RwLock<Vec<Entry<T>>>,
}

struct Entry<T: ?Sized> {
	name: CString,
	handler: Arc<T>,
}

impl<T: ?Sized> Registry<T> {
	pub const fn new() -> Self {
		Self {
			entries: RwLock::new(Vec::new()),
		}
	}

	/// Register a handler under an interned name and hand out its handle.
	pub fn register(&self, name: CString, handler: Arc<T>) -> HandleFFI {
		let mut entries = self.entries.write();
		entries.push(Entry {
			name,
			handler,
		});
		HandleFFI::new((entries.len() - 1) as u64)
	}

	/// Resolve a handle to its handler.
	///
	/// An unknown handle is a fatal invariant violation, not a runtime
	/// condition: the engine provides no path to propagate a failure from
	/// inside a compaction or read call, so abort.
	pub fn resolve(&self, handle: HandleFFI) -> Arc<T> {
		let entries = self.entries.read();
		match entries.get(handle.index()) {
			Some(entry) => Arc::clone(&entry.handler),
			None => {
				error!(handle = handle.get(), "extension handle does not resolve to a registered handler, aborting");
				abort();
			}
		}
	}

	/// Stable pointer to the interned handler name.
	///
	/// The `CString` allocation never moves and entries are never dropped,
	/// so the pointer stays valid after the read lock is released.
	pub fn name_ptr(&self, handle: HandleFFI) -> *const c_char {
		let entries = self.entries.read();
		match entries.get(handle.index()) {
			Some(entry) => entry.name.as_ptr(),
			None => {
				error!(handle = handle.get(), "extension handle does not resolve to a registered handler, aborting");
				abort();
			}
		}
	}

	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
