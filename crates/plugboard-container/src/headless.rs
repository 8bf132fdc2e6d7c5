// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host adapter for environments without a renderer.
//!
//! Mounting records the attachment and logs it. Bundles are treated as
//! lazily loaded and settle on the next turn of the event loop, so the
//! asynchronous path is exercised even without a real fetch.

use std::cell::RefCell;
use std::rc::Rc;

use plugboard_core::traits::{MountContext, MountRequest, MountedInstance, PluginHostAdapter};
use plugboard_core::types::{MountPoint, PluginId};
use tracing::info;

/// Ids currently attached, shared between the host and its instances.
type AttachedSet = Rc<RefCell<Vec<PluginId>>>;

/// Host adapter that attaches plugins without rendering them.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    attached: AttachedSet,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plugins currently attached, oldest first.
    pub fn attached(&self) -> Vec<PluginId> {
        self.attached.borrow().clone()
    }
}

/// A plugin attached by [`HeadlessHost`].
#[derive(Debug)]
pub struct HeadlessInstance {
    plugin_id: PluginId,
    container: String,
    attached: AttachedSet,
}

impl HeadlessInstance {
    fn attach(plugin_id: PluginId, container: String, attached: AttachedSet) -> Self {
        attached.borrow_mut().push(plugin_id.clone());
        Self {
            plugin_id,
            container,
            attached,
        }
    }
}

impl MountedInstance for HeadlessInstance {
    fn plugin_id(&self) -> &PluginId {
        &self.plugin_id
    }

    fn is_attached(&self) -> bool {
        self.attached.borrow().contains(&self.plugin_id)
    }

    fn unmount(&mut self) {
        let mut attached = self.attached.borrow_mut();
        if let Some(pos) = attached.iter().position(|id| *id == self.plugin_id) {
            attached.remove(pos);
            info!(plugin_id = %self.plugin_id, container = %self.container, "headless plugin detached");
        }
    }
}

impl PluginHostAdapter for HeadlessHost {
    fn name(&self) -> &str {
        "headless"
    }

    fn mount(&mut self, ctx: MountContext) -> MountRequest {
        let MountContext {
            container,
            plugin_id,
            mount_point,
            ..
        } = ctx;
        let container = container.name().to_string();
        let attached = Rc::clone(&self.attached);
        info!(
            plugin_id = %plugin_id,
            mount = %mount_point,
            container = %container,
            "headless plugin attach"
        );

        match mount_point {
            MountPoint::Bundle { .. } => MountRequest::pending(async move {
                tokio::task::yield_now().await;
                let instance: Box<dyn MountedInstance> =
                    Box::new(HeadlessInstance::attach(plugin_id, container, attached));
                Ok(instance)
            }),
            _ => MountRequest::ready(HeadlessInstance::attach(plugin_id, container, attached)),
        }
    }
}
