// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! FFI-safe buffer types and the cross-boundary allocation discipline

mod buffer;

pub use buffer::*;
