// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock host adapter for deterministic container tests.
//!
//! `MockHost` mounts plugins according to a per-id [`MockBehavior`] and
//! records what is attached, how often each plugin was mounted and
//! detached, and the deactivation callbacks it was handed. Clones share
//! state, so a test keeps one clone while the container owns another.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use plugboard_core::traits::{
    DeactivationHandle, MountContext, MountRequest, MountedInstance, PluginHostAdapter,
};
use plugboard_core::types::PluginId;
use plugboard_core::PluginMountError;

/// How the mock responds to a mount request for a given plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MockBehavior {
    /// Attach synchronously.
    #[default]
    Ready,
    /// Fail synchronously with the given message.
    Fail(String),
    /// Stay pending until [`MockHost::release`] or [`MockHost::fail_pending`].
    Gated,
}

struct Gate {
    plugin_id: PluginId,
    tx: oneshot::Sender<Result<(), String>>,
}

#[derive(Default)]
struct Inner {
    behaviors: HashMap<PluginId, MockBehavior>,
    attached: Vec<PluginId>,
    mounts: Vec<PluginId>,
    detaches: HashMap<PluginId, usize>,
    gates: Vec<Gate>,
    handles: Vec<DeactivationHandle>,
}

/// A mock host adapter.
#[derive(Clone, Default)]
pub struct MockHost {
    inner: Rc<RefCell<Inner>>,
}

impl MockHost {
    /// Create a mock that attaches every plugin synchronously.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_behavior(self, id: impl Into<PluginId>, behavior: MockBehavior) -> Self {
        self.set_behavior(id, behavior);
        self
    }

    pub fn set_behavior(&self, id: impl Into<PluginId>, behavior: MockBehavior) {
        self.inner.borrow_mut().behaviors.insert(id.into(), behavior);
    }

    /// Let the oldest gated mount of `id` attach. Returns false if none
    /// is waiting.
    pub fn release(&self, id: &str) -> bool {
        self.open_gate(id, Ok(()))
    }

    /// Make the oldest gated mount of `id` fail.
    pub fn fail_pending(&self, id: &str, message: &str) -> bool {
        self.open_gate(id, Err(message.to_string()))
    }

    fn open_gate(&self, id: &str, outcome: Result<(), String>) -> bool {
        let gate = {
            let mut inner = self.inner.borrow_mut();
            match inner.gates.iter().position(|g| g.plugin_id.as_str() == id) {
                Some(pos) => inner.gates.remove(pos),
                None => return false,
            }
        };
        gate.tx.send(outcome).is_ok()
    }

    /// Plugins currently attached, oldest first.
    pub fn attached(&self) -> Vec<PluginId> {
        self.inner.borrow().attached.clone()
    }

    /// Every plugin mount was requested for, in call order.
    pub fn mount_calls(&self) -> Vec<PluginId> {
        self.inner.borrow().mounts.clone()
    }

    pub fn mount_count(&self, id: &str) -> usize {
        self.inner
            .borrow()
            .mounts
            .iter()
            .filter(|m| m.as_str() == id)
            .count()
    }

    /// How many times an attached instance of `id` was actually detached.
    pub fn detach_count(&self, id: &str) -> usize {
        self.inner.borrow().detaches.get(id).copied().unwrap_or(0)
    }

    /// Gated mounts not yet released.
    pub fn waiting(&self) -> usize {
        self.inner.borrow().gates.len()
    }

    /// Fire the deactivation callback handed to the most recent mount of
    /// `id`, as the plugin itself would.
    pub fn deactivate(&self, id: &str) -> bool {
        let handle = self
            .inner
            .borrow()
            .handles
            .iter()
            .rev()
            .find(|h| h.plugin_id().as_str() == id)
            .cloned();
        handle.is_some_and(|h| h.deactivate())
    }

    fn attach(inner: &Rc<RefCell<Inner>>, plugin_id: PluginId) -> MockInstance {
        inner.borrow_mut().attached.push(plugin_id.clone());
        MockInstance {
            plugin_id,
            attached: true,
            inner: Rc::clone(inner),
        }
    }
}

impl PluginHostAdapter for MockHost {
    fn name(&self) -> &str {
        "mock-host"
    }

    fn mount(&mut self, ctx: MountContext) -> MountRequest {
        let plugin_id = ctx.plugin_id.clone();
        let behavior = {
            let mut inner = self.inner.borrow_mut();
            inner.mounts.push(plugin_id.clone());
            inner.handles.push(ctx.deactivate.clone());
            inner.behaviors.get(&plugin_id).cloned().unwrap_or_default()
        };

        match behavior {
            MockBehavior::Ready => MountRequest::ready(Self::attach(&self.inner, plugin_id)),
            MockBehavior::Fail(message) => {
                MountRequest::failed(PluginMountError::new(plugin_id, message))
            }
            MockBehavior::Gated => {
                let (tx, rx) = oneshot::channel();
                self.inner.borrow_mut().gates.push(Gate {
                    plugin_id: plugin_id.clone(),
                    tx,
                });
                let inner = Rc::clone(&self.inner);
                MountRequest::pending(async move {
                    match rx.await {
                        Ok(Ok(())) => {
                            let instance: Box<dyn MountedInstance> =
                                Box::new(Self::attach(&inner, plugin_id));
                            Ok(instance)
                        }
                        Ok(Err(message)) => Err(PluginMountError::new(plugin_id, message)),
                        Err(_) => Err(PluginMountError::new(plugin_id, "mount abandoned")),
                    }
                })
            }
        }
    }
}

/// Instance handed out by [`MockHost`].
pub struct MockInstance {
    plugin_id: PluginId,
    attached: bool,
    inner: Rc<RefCell<Inner>>,
}

impl MountedInstance for MockInstance {
    fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    fn is_attached(&self) -> bool {
        self.attached
    }

    fn unmount(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        let mut inner = self.inner.borrow_mut();
        if let Some(pos) = inner.attached.iter().position(|id| *id == self.plugin_id) {
            inner.attached.remove(pos);
        }
        *inner.detaches.entry(self.plugin_id.clone()).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugboard_core::types::{ContainerHandle, MountPoint};

    fn ctx(id: &str) -> MountContext {
        MountContext {
            container: ContainerHandle::new("main"),
            plugin_id: id.into(),
            mount_point: MountPoint::None,
            generation: 1,
            deactivate: DeactivationHandle::detached(id.into()),
        }
    }

    #[test]
    fn ready_mount_attaches_and_unmount_is_idempotent() {
        let mut host = MockHost::new();
        let MountRequest::Ready(Ok(mut instance)) = host.mount(ctx("a")) else {
            panic!("expected ready mount");
        };
        assert_eq!(host.attached(), vec![PluginId::from("a")]);

        instance.unmount();
        instance.unmount();
        assert!(host.attached().is_empty());
        assert_eq!(host.detach_count("a"), 1);
    }

    #[test]
    fn failing_behavior_reports_mount_error() {
        let mut host = MockHost::new().with_behavior("a", MockBehavior::Fail("boom".into()));
        let MountRequest::Ready(Err(err)) = host.mount(ctx("a")) else {
            panic!("expected failed mount");
        };
        assert_eq!(err.message, "boom");
        assert!(host.attached().is_empty());
        assert_eq!(host.mount_count("a"), 1);
    }

    #[tokio::test]
    async fn gated_mount_waits_for_release() {
        let mut host = MockHost::new().with_behavior("a", MockBehavior::Gated);
        let MountRequest::Pending(fut) = host.mount(ctx("a")) else {
            panic!("expected pending mount");
        };
        assert_eq!(host.waiting(), 1);
        assert!(host.attached().is_empty());

        assert!(host.release("a"));
        let instance = fut.await.unwrap();
        assert!(instance.is_attached());
        assert_eq!(host.attached(), vec![PluginId::from("a")]);
        assert!(!host.release("a"));
    }

    #[tokio::test]
    async fn gated_mount_can_fail() {
        let mut host = MockHost::new().with_behavior("a", MockBehavior::Gated);
        let MountRequest::Pending(fut) = host.mount(ctx("a")) else {
            panic!("expected pending mount");
        };
        assert!(host.fail_pending("a", "chunk load failed"));
        let err = fut.await.unwrap_err();
        assert_eq!(err.message, "chunk load failed");
    }
}
