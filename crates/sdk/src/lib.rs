// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Granite extension SDK
//!
//! Adapts host-side handler objects to the engine's native extension ABI.
//! For each extension kind this crate provides a handler trait, a
//! registration function that interns the handler in an append-only
//! registry, and a constructor that assembles the engine-native
//! extension-point object from an opaque handle, the kind's dispatch
//! adapters and a no-op destructor.
//!
//! Dispatch adapters run on whichever engine thread issues the callback
//! (write paths, read paths, background compactions) and may be invoked
//! concurrently for the same handle; they forward every call without
//! serializing. A panic crossing the callback boundary aborts the process,
//! as does a handle that fails to resolve: the engine has no channel to
//! propagate either condition.

pub mod compaction;
pub mod comparator;
pub mod filter;
mod marshal;
pub mod merge;
pub mod registry;
pub mod transform;

pub use compaction::{CompactionDecision, CompactionFilter, create_compaction_filter, register_compaction_filter};
pub use comparator::{Comparator, create_comparator, register_comparator};
pub use filter::{FilterPolicy, create_filter_policy, register_filter_policy};
pub use merge::{MergeOperator, create_merge_operator, register_merge_operator};
pub use transform::{SliceTransform, create_slice_transform, register_slice_transform};
