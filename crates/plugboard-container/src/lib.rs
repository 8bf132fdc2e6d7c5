// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The plugins container and its collaborators.
//!
//! [`PluginsContainer`] is the central coordinator that:
//! - Observes the activation, flag, and settings slices of the store
//! - Resolves which plugin should be showing
//! - Unmounts the previous plugin and mounts the new one through a host adapter
//! - Confirms the new active plugin back to the store
//!
//! [`MemoryStore`] and [`HeadlessHost`] are self-contained implementations of
//! the store and host seams, used by the CLI.

pub mod container;
pub mod headless;
pub mod store;

pub use container::{ContainerState, PluginsContainer};
pub use headless::HeadlessHost;
pub use store::MemoryStore;
