// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host adapter trait: how a plugin's rendering unit is attached to and
//! detached from a dashboard container.
//!
//! The container never inspects which concrete kind of rendering unit it
//! holds. Components, embedded frames, and lazily fetched bundles all go
//! through [`PluginHostAdapter::mount`] and [`MountedInstance::unmount`].

use std::future::Future;

use futures::future::LocalBoxFuture;
use tokio::sync::mpsc;

use crate::error::PluginMountError;
use crate::types::{ContainerHandle, MountPoint, PluginId};

/// A live plugin rendering unit attached to a container.
pub trait MountedInstance {
    fn plugin_id(&self) -> &PluginId;

    /// Whether the unit is still attached to its container.
    fn is_attached(&self) -> bool;

    /// Detach from the container. Calling this on an already detached
    /// instance is a no-op.
    fn unmount(&mut self);
}

impl std::fmt::Debug for dyn MountedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountedInstance")
            .field("plugin_id", self.plugin_id())
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Outcome of a mount attempt once it has settled.
pub type MountResult = Result<Box<dyn MountedInstance>, PluginMountError>;

/// What a host adapter hands back from [`PluginHostAdapter::mount`].
pub enum MountRequest {
    /// The unit rendered (or failed) synchronously.
    Ready(MountResult),
    /// The unit is being fetched; the future settles on the event loop.
    ///
    /// The container drops the future when the attempt is superseded by
    /// teardown. Dropping it cancels the mount: an adapter must attach
    /// nothing from a future that is never polled to completion.
    Pending(LocalBoxFuture<'static, MountResult>),
}

impl MountRequest {
    pub fn ready(instance: impl MountedInstance + 'static) -> Self {
        MountRequest::Ready(Ok(Box::new(instance)))
    }

    pub fn failed(err: PluginMountError) -> Self {
        MountRequest::Ready(Err(err))
    }

    pub fn pending(fut: impl Future<Output = MountResult> + 'static) -> Self {
        MountRequest::Pending(Box::pin(fut))
    }
}

impl std::fmt::Debug for MountRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MountRequest::Ready(Ok(instance)) => f.debug_tuple("Ready").field(instance).finish(),
            MountRequest::Ready(Err(err)) => f.debug_tuple("Ready").field(err).finish(),
            MountRequest::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// A plugin asking to be torn down, tagged with the mount attempt it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeactivationRequest {
    pub plugin_id: PluginId,
    pub generation: u64,
}

/// Deactivation callback handed to a plugin when it is mounted.
#[derive(Debug, Clone)]
pub struct DeactivationHandle {
    plugin_id: PluginId,
    generation: u64,
    tx: mpsc::UnboundedSender<DeactivationRequest>,
}

impl DeactivationHandle {
    pub fn new(
        plugin_id: PluginId,
        generation: u64,
        tx: mpsc::UnboundedSender<DeactivationRequest>,
    ) -> Self {
        Self {
            plugin_id,
            generation,
            tx,
        }
    }

    /// A handle whose requests go nowhere, for mounting outside a container.
    pub fn detached(plugin_id: PluginId) -> Self {
        let (tx, _rx) = mpsc::unbounded_channel();
        Self::new(plugin_id, 0, tx)
    }

    pub fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask the owning container to unmount this plugin. Returns false if
    /// the container is gone.
    pub fn deactivate(&self) -> bool {
        self.tx
            .send(DeactivationRequest {
                plugin_id: self.plugin_id.clone(),
                generation: self.generation,
            })
            .is_ok()
    }
}

/// Everything a host adapter needs to mount one plugin.
#[derive(Debug, Clone)]
pub struct MountContext {
    pub container: ContainerHandle,
    pub plugin_id: PluginId,
    pub mount_point: MountPoint,
    pub generation: u64,
    pub deactivate: DeactivationHandle,
}

/// Capability set for instantiating plugin rendering units.
pub trait PluginHostAdapter {
    /// Stable human-readable adapter name (for logs).
    fn name(&self) -> &str;

    /// Start mounting the plugin described by `ctx` into `ctx.container`.
    ///
    /// Rendering failures are reported as [`PluginMountError`], never by
    /// panicking.
    fn mount(&mut self, ctx: MountContext) -> MountRequest;

    /// Detach a previously mounted instance. Must tolerate instances that
    /// are already detached.
    fn unmount(&mut self, instance: &mut dyn MountedInstance) {
        instance.unmount();
    }
}

impl<T: PluginHostAdapter + ?Sized> PluginHostAdapter for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn mount(&mut self, ctx: MountContext) -> MountRequest {
        (**self).mount(ctx)
    }

    fn unmount(&mut self, instance: &mut dyn MountedInstance) {
        (**self).unmount(instance)
    }
}
