// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Plugboard integration tests.
//!
//! Provides mock seams and a harness for fast, deterministic container
//! tests without a real rendering environment or application store.
//!
//! # Components
//!
//! - [`MockHost`] - Host adapter with scripted ready, failing, and gated mounts
//! - [`RecordingStore`] - State store that records every dispatched action
//! - [`TestHarness`] - Registry, store, host, and container wired together

pub mod harness;
pub mod mock_host;
pub mod recording_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_host::{MockBehavior, MockHost};
pub use recording_store::RecordingStore;
