// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Granite

//! Test double for the Granite storage engine
//!
//! [`store::TestStore`] stands in for the engine on the other side of the
//! extension ABI. It holds extension-point objects the way the engine
//! would (for the life of the store) and calls them exclusively through
//! their vtables with raw (pointer, length) arguments, so adapter code is
//! exercised under the exact calling conventions the real engine uses.

pub mod error;
pub mod store;

pub use error::EngineError;
pub use store::{StoreOptions, TestStore};

/// Install the fmt subscriber for test binaries, filtered through
/// `RUST_LOG`. Safe to call from every test; only the first call wins.
pub fn init_tracing() {
	use tracing_subscriber::EnvFilter;

	let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
}
