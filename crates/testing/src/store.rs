// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! In-memory engine double
//!
//! Every interaction with an extension point goes through its vtable with
//! raw pointers, mirroring how the engine calls the adapter layer: keys
//! stay ordered by the comparator callback, reads fold merge operands
//! through `full_merge` and release results through `delete_value`,
//! compaction combines operands through `partial_merge` (falling back on
//! decline) and then consults the compaction filter once per surviving
//! pair.

use core::{cmp::Ordering, ptr, slice};

use granite_abi::{
	CompactionFilterFFI, ComparatorFFI, FilterPolicyFFI, MergeOperatorFFI, SliceTransformFFI,
	constants::{BOOL_TRUE, COMPACTION_REMOVE},
	data::BufferFFI,
};
use tracing::debug;

use crate::error::EngineError;

/// Which extension points a store is opened with. The comparator is
/// mandatory (the engine always orders by one); everything else is
/// optional, as in a real store configuration.
pub struct StoreOptions {
	comparator: ComparatorFFI,
	merge_operator: Option<MergeOperatorFFI>,
	compaction_filter: Option<CompactionFilterFFI>,
	filter_policy: Option<FilterPolicyFFI>,
	prefix_extractor: Option<SliceTransformFFI>,
	compaction_level: i32,
}

impl StoreOptions {
	pub fn new(comparator: ComparatorFFI) -> Self {
		Self {
			comparator,
			merge_operator: None,
			compaction_filter: None,
			filter_policy: None,
			prefix_extractor: None,
			compaction_level: 0,
		}
	}

	pub fn merge_operator(mut self, merge_operator: MergeOperatorFFI) -> Self {
		self.merge_operator = Some(merge_operator);
		self
	}

	pub fn compaction_filter(mut self, compaction_filter: CompactionFilterFFI) -> Self {
		self.compaction_filter = Some(compaction_filter);
		self
	}

	pub fn filter_policy(mut self, filter_policy: FilterPolicyFFI) -> Self {
		self.filter_policy = Some(filter_policy);
		self
	}

	pub fn prefix_extractor(mut self, prefix_extractor: SliceTransformFFI) -> Self {
		self.prefix_extractor = Some(prefix_extractor);
		self
	}

	/// Level reported to the compaction filter.
	pub fn compaction_level(mut self, level: i32) -> Self {
		self.compaction_level = level;
		self
	}
}

struct Entry {
	key: Vec<u8>,
	base: Option<Vec<u8>>,
	operands: Vec<Vec<u8>>,
}

/// In-memory stand-in for an open store.
pub struct TestStore {
	options: StoreOptions,
	entries: Vec<Entry>,
}

impl TestStore {
	pub fn open(options: StoreOptions) -> Self {
		Self {
			options,
			entries: Vec::new(),
		}
	}

	/// Write a base value, discarding pending merge operands for the key.
	pub fn put(&mut self, key: &[u8], value: &[u8]) {
		match self.locate(key) {
			Ok(index) => {
				let entry = &mut self.entries[index];
				entry.base = Some(value.to_vec());
				entry.operands.clear();
			}
			Err(index) => self.entries.insert(
				index,
				Entry {
					key: key.to_vec(),
					base: Some(value.to_vec()),
					operands: Vec::new(),
				},
			),
		}
	}

	pub fn delete(&mut self, key: &[u8]) {
		if let Ok(index) = self.locate(key) {
			self.entries.remove(index);
		}
	}

	/// Queue a merge operand for the key.
	pub fn merge(&mut self, key: &[u8], operand: &[u8]) -> Result<(), EngineError> {
		if self.options.merge_operator.is_none() {
			return Err(EngineError::MergeOperatorRequired);
		}
		match self.locate(key) {
			Ok(index) => self.entries[index].operands.push(operand.to_vec()),
			Err(index) => self.entries.insert(
				index,
				Entry {
					key: key.to_vec(),
					base: None,
					operands: vec![operand.to_vec()],
				},
			),
		}
		Ok(())
	}

	/// Read a value, applying pending merge operands on the fly the way
	/// the engine's read path does.
	pub fn get(&self, key: &[u8]) -> Result<Vec<u8>, EngineError> {
		let index = self.locate(key).map_err(|_| EngineError::NotFound)?;
		self.current_value(&self.entries[index])
	}

	/// Keys in comparator order.
	pub fn keys(&self) -> Vec<Vec<u8>> {
		self.entries.iter().map(|entry| entry.key.clone()).collect()
	}

	/// Forward iteration over (key, value) pairs in comparator order.
	pub fn scan(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>, EngineError> {
		self.entries.iter().map(|entry| Ok((entry.key.clone(), self.current_value(entry)?))).collect()
	}

	/// Run one compaction pass over the whole store.
	pub fn compact(&mut self) -> Result<(), EngineError> {
		let mut index = 0;
		let mut dropped = 0usize;
		let mut rewritten = 0usize;
		while index < self.entries.len() {
			// Fold pending operands into the base value first, combining
			// them through partial_merge where the operator accepts.
			if !self.entries[index].operands.is_empty() {
				let merge = self.options.merge_operator.as_ref().ok_or(EngineError::MergeOperatorRequired)?;
				let entry = &self.entries[index];
				let operands = partial_combine(merge, &entry.key, &entry.operands);
				let value = full_merge(merge, &entry.key, entry.base.as_deref(), &operands)?;
				let entry = &mut self.entries[index];
				entry.base = Some(value);
				entry.operands.clear();
			}

			match self.filter_verdict(index) {
				Verdict::Remove => {
					self.entries.remove(index);
					dropped += 1;
				}
				Verdict::Change(replacement) => {
					self.entries[index].base = Some(replacement);
					rewritten += 1;
					index += 1;
				}
				Verdict::Keep => index += 1,
			}
		}
		debug!(dropped, rewritten, remaining = self.entries.len(), "compaction pass complete");
		Ok(())
	}

	/// Build a filter block over the store's current key set, as the
	/// engine does per table block at write time. `None` without a policy.
	pub fn build_filter(&self) -> Option<Vec<u8>> {
		let policy = self.options.filter_policy.as_ref()?;
		let ptrs: Vec<*const u8> = self.entries.iter().map(|entry| entry.key.as_ptr()).collect();
		let lens: Vec<usize> = self.entries.iter().map(|entry| entry.key.len()).collect();
		let mut filter_len = 0usize;
		let data =
			(policy.vtable.create_filter)(policy.state, ptrs.as_ptr(), lens.as_ptr(), ptrs.len(), &mut filter_len);
		let block = copy_raw(data, filter_len);
		(policy.vtable.delete_filter)(policy.state, data, filter_len);
		Some(block)
	}

	/// Probe a filter block. Without a policy every key may match, which
	/// is what forces the engine to read.
	pub fn key_may_match(&self, key: &[u8], filter: &[u8]) -> bool {
		let Some(policy) = self.options.filter_policy.as_ref() else {
			return true;
		};
		(policy.vtable.key_may_match)(policy.state, key.as_ptr(), key.len(), filter.as_ptr(), filter.len())
			== BOOL_TRUE
	}

	/// All pairs whose derived prefix equals `prefix`, honoring the
	/// extractor's domain gate before any transform call.
	pub fn prefix_scan(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, EngineError> {
		let transform = self.options.prefix_extractor.as_ref().ok_or(EngineError::PrefixExtractorRequired)?;

		// A prefix the extractor can never produce matches nothing.
		if (transform.vtable.in_range)(transform.state, prefix.as_ptr(), prefix.len()) != BOOL_TRUE {
			return Ok(Vec::new());
		}

		let mut matched = Vec::new();
		for entry in &self.entries {
			let key = &entry.key;
			if (transform.vtable.in_domain)(transform.state, key.as_ptr(), key.len()) != BOOL_TRUE {
				continue;
			}
			let mut out_len = 0usize;
			let data = (transform.vtable.transform)(transform.state, key.as_ptr(), key.len(), &mut out_len);
			let derived = copy_raw(data, out_len);
			unsafe { BufferFFI::release_raw(data, out_len) };
			if derived == prefix {
				matched.push((key.clone(), self.current_value(entry)?));
			}
		}
		Ok(matched)
	}

	fn locate(&self, key: &[u8]) -> Result<usize, usize> {
		let comparator = &self.options.comparator;
		self.entries.binary_search_by(|entry| compare_with(comparator, &entry.key, key))
	}

	fn current_value(&self, entry: &Entry) -> Result<Vec<u8>, EngineError> {
		if entry.operands.is_empty() {
			return entry.base.clone().ok_or(EngineError::NotFound);
		}
		let merge = self.options.merge_operator.as_ref().ok_or(EngineError::MergeOperatorRequired)?;
		full_merge(merge, &entry.key, entry.base.as_deref(), &entry.operands)
	}

	fn filter_verdict(&self, index: usize) -> Verdict {
		let (Some(filter), entry) = (&self.options.compaction_filter, &self.entries[index]) else {
			return Verdict::Keep;
		};
		let Some(value) = &entry.base else {
			return Verdict::Keep;
		};
		let key = &entry.key;
		let mut new_value: *mut u8 = ptr::null_mut();
		let mut new_value_len = 0usize;
		let mut changed = 0u8;
		let verdict = (filter.vtable.filter)(
			filter.state,
			self.options.compaction_level,
			key.as_ptr(),
			key.len(),
			value.as_ptr(),
			value.len(),
			&mut new_value,
			&mut new_value_len,
			&mut changed,
		);
		if verdict == COMPACTION_REMOVE {
			return Verdict::Remove;
		}
		if changed == BOOL_TRUE {
			let replacement = copy_raw(new_value, new_value_len);
			unsafe { BufferFFI::release_raw(new_value, new_value_len) };
			return Verdict::Change(replacement);
		}
		Verdict::Keep
	}
}

impl Drop for TestStore {
	fn drop(&mut self) {
		// The engine destroys every extension-point object it holds when
		// the store closes.
		let comparator = &self.options.comparator;
		(comparator.vtable.destroy)(comparator.state);
		if let Some(merge) = &self.options.merge_operator {
			(merge.vtable.destroy)(merge.state);
		}
		if let Some(filter) = &self.options.compaction_filter {
			(filter.vtable.destroy)(filter.state);
		}
		if let Some(policy) = &self.options.filter_policy {
			(policy.vtable.destroy)(policy.state);
		}
		if let Some(transform) = &self.options.prefix_extractor {
			(transform.vtable.destroy)(transform.state);
		}
	}
}

enum Verdict {
	Keep,
	Remove,
	Change(Vec<u8>),
}

fn compare_with(comparator: &ComparatorFFI, a: &[u8], b: &[u8]) -> Ordering {
	(comparator.vtable.compare)(comparator.state, a.as_ptr(), a.len(), b.as_ptr(), b.len()).cmp(&0)
}

fn copy_raw(data: *const u8, len: usize) -> Vec<u8> {
	if data.is_null() || len == 0 {
		return Vec::new();
	}
	unsafe { slice::from_raw_parts(data, len) }.to_vec()
}

/// Try to collapse an operand list through `partial_merge`. On decline the
/// original operand list is kept for full-merge application.
fn partial_combine(merge: &MergeOperatorFFI, key: &[u8], operands: &[Vec<u8>]) -> Vec<Vec<u8>> {
	if operands.len() < 2 {
		return operands.to_vec();
	}
	let ptrs: Vec<*const u8> = operands.iter().map(|operand| operand.as_ptr()).collect();
	let lens: Vec<usize> = operands.iter().map(|operand| operand.len()).collect();
	let mut success = 0u8;
	let mut result_len = 0usize;
	let data = (merge.vtable.partial_merge)(
		merge.state,
		key.as_ptr(),
		key.len(),
		ptrs.as_ptr(),
		lens.as_ptr(),
		operands.len(),
		&mut success,
		&mut result_len,
	);
	if success != BOOL_TRUE {
		return operands.to_vec();
	}
	let combined = copy_raw(data, result_len);
	(merge.vtable.delete_value)(merge.state, data, result_len);
	vec![combined]
}

fn full_merge(
	merge: &MergeOperatorFFI,
	key: &[u8],
	base: Option<&[u8]>,
	operands: &[Vec<u8>],
) -> Result<Vec<u8>, EngineError> {
	let ptrs: Vec<*const u8> = operands.iter().map(|operand| operand.as_ptr()).collect();
	let lens: Vec<usize> = operands.iter().map(|operand| operand.len()).collect();
	let (base_ptr, base_len) = match base {
		Some(value) => (value.as_ptr(), value.len()),
		None => (ptr::null(), 0),
	};
	let mut success = 0u8;
	let mut result_len = 0usize;
	let data = (merge.vtable.full_merge)(
		merge.state,
		key.as_ptr(),
		key.len(),
		base_ptr,
		base_len,
		ptrs.as_ptr(),
		lens.as_ptr(),
		operands.len(),
		&mut success,
		&mut result_len,
	);
	if success != BOOL_TRUE {
		return Err(EngineError::MergeFailure);
	}
	let value = copy_raw(data, result_len);
	(merge.vtable.delete_value)(merge.state, data, result_len);
	Ok(value)
}
