// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! C ABI definitions for Granite storage-engine extension points
//!
//! This crate defines the stable ABI the engine uses to call host-supplied
//! extension logic: one struct of `extern "C"` function pointers per
//! extension kind, the opaque handle embedded in each extension-point
//! object, and the raw buffer discipline shared by every callback.
//!
//! Memory ownership across the boundary:
//! - Input buffers (keys, values, operands) are owned by the engine and
//!   borrowed for the duration of a single callback invocation.
//! - Output buffers are produced by the host through [`data::BufferFFI`]
//!   and released by the engine through the kind's delete entry (merge
//!   results, filter blocks) or through [`data::BufferFFI::release_raw`]
//!   (replacement values, transformed keys).

pub mod comparator;
pub mod compaction;
pub mod constants;
pub mod data;
pub mod filter;
pub mod handle;
pub mod merge;
pub mod transform;

pub use comparator::*;
pub use compaction::*;
pub use filter::*;
pub use handle::HandleFFI;
pub use merge::*;
pub use transform::*;
