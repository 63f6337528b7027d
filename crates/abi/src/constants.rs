// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Byte-level calling conventions shared by all extension-point callbacks

/// Unsigned-byte encoding of `false` in callback flags and results.
pub const BOOL_FALSE: u8 = 0;

/// Unsigned-byte encoding of `true` in callback flags and results.
pub const BOOL_TRUE: u8 = 1;

/// Compaction filter verdict: keep the pair (possibly with a changed value,
/// signalled separately through the value-changed flag).
pub const COMPACTION_KEEP: u8 = 0;

/// Compaction filter verdict: drop the pair from the output of the
/// compaction.
pub const COMPACTION_REMOVE: u8 = 1;
