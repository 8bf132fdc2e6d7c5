// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugins container: keeps exactly the resolved plugin mounted.
//!
//! Every mount attempt is tagged with a generation. Starting a new
//! activation (or tearing down) bumps the generation, so a mount that
//! settles late finds itself stale: its result is dropped and, if it had
//! attached, it is unmounted on arrival. The most recent activation always
//! wins, and at most one plugin is ever left attached.

use std::sync::Arc;

use futures::future::LocalBoxFuture;
use futures::stream::FuturesUnordered;
use futures::{FutureExt, StreamExt};
use plugboard_core::store::{Action, StateStore, StoreSnapshot};
use plugboard_core::traits::{
    DeactivationHandle, DeactivationRequest, MountContext, MountRequest, MountResult,
    MountedInstance, PluginHostAdapter,
};
use plugboard_core::types::{ContainerHandle, FeatureFlags, PluginId, Settings};
use plugboard_core::PluginMountError;
use plugboard_plugin::registry::PluginRegistry;
use plugboard_plugin::resolver::resolve_for_snapshot;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lifecycle of the container's single mount slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    /// Nothing mounted; the region shows its placeholder.
    Idle,
    /// A mount was requested and has not settled yet.
    Mounting { plugin_id: PluginId, generation: u64 },
    /// The plugin is attached and confirmed to the store.
    Mounted { plugin_id: PluginId, generation: u64 },
}

impl ContainerState {
    /// The plugin being mounted or already mounted.
    pub fn plugin_id(&self) -> Option<&PluginId> {
        match self {
            ContainerState::Idle => None,
            ContainerState::Mounting { plugin_id, .. }
            | ContainerState::Mounted { plugin_id, .. } => Some(plugin_id),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ContainerState::Idle)
    }
}

/// The slices of store state that drive activation.
#[derive(Debug, Clone, PartialEq)]
struct ObservedSlices {
    known_plugin_ids: Vec<PluginId>,
    last_user_selection: Option<PluginId>,
    flags: FeatureFlags,
    settings: Settings,
}

impl From<&StoreSnapshot> for ObservedSlices {
    fn from(snapshot: &StoreSnapshot) -> Self {
        Self {
            known_plugin_ids: snapshot.activation.known_plugin_ids.clone(),
            last_user_selection: snapshot.activation.last_user_selection.clone(),
            flags: snapshot.flags.clone(),
            settings: snapshot.settings.clone(),
        }
    }
}

/// A pending mount that has completed, tagged with its attempt.
struct Settled {
    generation: u64,
    result: MountResult,
}

/// Reconciles store state against the registry and owns the mounted plugin.
pub struct PluginsContainer<H: PluginHostAdapter, S: StateStore> {
    registry: Arc<PluginRegistry>,
    host: H,
    store: S,
    container: ContainerHandle,
    state: ContainerState,
    current: Option<Box<dyn MountedInstance>>,
    generation: u64,
    pending: FuturesUnordered<LocalBoxFuture<'static, Settled>>,
    observed: Option<ObservedSlices>,
    last_error: Option<PluginMountError>,
    deactivate_tx: mpsc::UnboundedSender<DeactivationRequest>,
    deactivate_rx: mpsc::UnboundedReceiver<DeactivationRequest>,
    torn_down: bool,
}

impl<H: PluginHostAdapter, S: StateStore> PluginsContainer<H, S> {
    pub fn new(registry: Arc<PluginRegistry>, host: H, store: S, container: ContainerHandle) -> Self {
        let (deactivate_tx, deactivate_rx) = mpsc::unbounded_channel();
        Self {
            registry,
            host,
            store,
            container,
            state: ContainerState::Idle,
            current: None,
            generation: 0,
            pending: FuturesUnordered::new(),
            observed: None,
            last_error: None,
            deactivate_tx,
            deactivate_rx,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &ContainerState {
        &self.state
    }

    /// The attached instance, if a plugin is mounted.
    pub fn mounted(&self) -> Option<&dyn MountedInstance> {
        self.current.as_deref()
    }

    /// Why the last mount attempt failed, until the next activation.
    pub fn last_error(&self) -> Option<&PluginMountError> {
        self.last_error.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of mounts still in flight, including superseded ones.
    pub fn pending_mounts(&self) -> usize {
        self.pending.len()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// React to a change in application state.
    ///
    /// Cheap to call on every store notification: nothing happens unless
    /// an observed slice changed and the resolved plugin differs from the
    /// one being mounted or shown.
    pub fn on_state_change(&mut self, snapshot: &StoreSnapshot) {
        if self.torn_down {
            debug!("state change after teardown ignored");
            return;
        }

        let observed = ObservedSlices::from(snapshot);
        if self.observed.as_ref() == Some(&observed) {
            return;
        }
        self.observed = Some(observed);

        let desired = resolve_for_snapshot(&self.registry, snapshot);
        if desired.as_ref() == self.state.plugin_id() {
            return;
        }
        self.activate(desired);
    }

    fn activate(&mut self, desired: Option<PluginId>) {
        self.generation += 1;
        let generation = self.generation;
        self.unmount_current();
        self.last_error = None;

        let Some(plugin_id) = desired else {
            self.state = ContainerState::Idle;
            info!(generation, "no eligible plugin, container idle");
            return;
        };

        let Some(descriptor) = self.registry.get(plugin_id.as_str()) else {
            // The resolver only returns registered ids.
            warn!(plugin_id = %plugin_id, "resolved plugin missing from registry");
            self.state = ContainerState::Idle;
            return;
        };

        let ctx = MountContext {
            container: self.container.clone(),
            plugin_id: plugin_id.clone(),
            mount_point: descriptor.mount_point().clone(),
            generation,
            deactivate: DeactivationHandle::new(
                plugin_id.clone(),
                generation,
                self.deactivate_tx.clone(),
            ),
        };

        info!(
            plugin_id = %plugin_id,
            generation,
            host = self.host.name(),
            container = self.container.name(),
            "mounting plugin"
        );
        self.state = ContainerState::Mounting {
            plugin_id,
            generation,
        };

        match self.host.mount(ctx) {
            MountRequest::Ready(result) => self.on_mount_settled(generation, result),
            MountRequest::Pending(fut) => {
                self.pending
                    .push(fut.map(move |result| Settled { generation, result }).boxed_local());
            }
        }
    }

    /// Apply the outcome of the mount attempt tagged `generation`.
    ///
    /// Outcomes of superseded attempts are discarded; an instance that
    /// attached anyway is unmounted immediately.
    pub fn on_mount_settled(&mut self, generation: u64, result: MountResult) {
        let is_current = !self.torn_down
            && matches!(
                &self.state,
                ContainerState::Mounting { generation: g, .. } if *g == generation
            );

        if !is_current {
            if let Ok(mut instance) = result {
                self.host.unmount(instance.as_mut());
                debug!(
                    plugin_id = %instance.plugin_id(),
                    generation,
                    current_generation = self.generation,
                    "stale mount discarded"
                );
            } else {
                debug!(generation, "stale mount failure discarded");
            }
            return;
        }

        let ContainerState::Mounting { plugin_id, .. } = std::mem::replace(&mut self.state, ContainerState::Idle)
        else {
            return;
        };

        match result {
            Ok(instance) => {
                self.current = Some(instance);
                self.state = ContainerState::Mounted {
                    plugin_id: plugin_id.clone(),
                    generation,
                };
                info!(plugin_id = %plugin_id, generation, "plugin mounted");
                self.store.dispatch(Action::ActivePluginChanged(plugin_id));
            }
            Err(err) => {
                warn!(
                    plugin_id = %plugin_id,
                    generation,
                    error = %err,
                    "plugin failed to mount, showing empty region"
                );
                self.last_error = Some(err);
            }
        }
    }

    /// Handle a plugin asking to be torn down through its deactivation
    /// callback. The container stays idle until the next state change.
    pub fn on_plugin_deactivated(&mut self, request: DeactivationRequest) {
        let matches_current = match &self.state {
            ContainerState::Mounting { generation, .. } | ContainerState::Mounted { generation, .. } => {
                *generation == request.generation
            }
            ContainerState::Idle => false,
        };
        if !matches_current || self.torn_down {
            debug!(
                plugin_id = %request.plugin_id,
                generation = request.generation,
                "deactivation for superseded mount ignored"
            );
            return;
        }

        info!(plugin_id = %request.plugin_id, generation = request.generation, "plugin requested deactivation");
        self.generation += 1;
        self.unmount_current();
        self.state = ContainerState::Idle;
    }

    fn unmount_current(&mut self) {
        if let Some(mut instance) = self.current.take() {
            self.host.unmount(instance.as_mut());
            info!(plugin_id = %instance.plugin_id(), "plugin unmounted");
        }
    }

    /// Wait for the next in-flight mount to settle and apply it. Returns
    /// false when nothing is in flight.
    pub async fn settle_next(&mut self) -> bool {
        match self.pending.next().await {
            Some(settled) => {
                self.on_mount_settled(settled.generation, settled.result);
                true
            }
            None => false,
        }
    }

    /// Apply deactivation requests that are already queued, without
    /// waiting. Returns how many were processed.
    pub fn process_deactivations(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(request) = self.deactivate_rx.try_recv() {
            self.on_plugin_deactivated(request);
            processed += 1;
        }
        processed
    }

    /// Tear the container down: stop listening, cancel in-flight mounts,
    /// and unmount the current plugin. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.deactivate_rx.close();
        self.generation += 1;

        // Mounts that already finished are delivered, and so unmounted on
        // arrival; the rest are dropped, which cancels them.
        let mut cancelled = 0;
        for fut in std::mem::take(&mut self.pending) {
            match fut.now_or_never() {
                Some(settled) => self.on_mount_settled(settled.generation, settled.result),
                None => cancelled += 1,
            }
        }
        if cancelled > 0 {
            debug!(cancelled, "in-flight mounts cancelled");
        }

        self.unmount_current();
        self.state = ContainerState::Idle;
        info!(container = self.container.name(), "container torn down");
    }

    /// Drive the container from store updates until `cancel` fires or the
    /// store goes away, then tear down.
    ///
    /// Runs on the caller's task: store updates, mount settlements, and
    /// deactivation requests are handled one at a time, in arrival order.
    pub async fn run(&mut self, updates: &mut watch::Receiver<StoreSnapshot>, cancel: CancellationToken) {
        let initial = updates.borrow_and_update().clone();
        self.on_state_change(&initial);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("container shutdown requested");
                    break;
                }
                changed = updates.changed() => {
                    if changed.is_err() {
                        info!("state store closed, stopping container");
                        break;
                    }
                    let snapshot = updates.borrow_and_update().clone();
                    self.on_state_change(&snapshot);
                }
                Some(settled) = self.pending.next(), if !self.pending.is_empty() => {
                    self.on_mount_settled(settled.generation, settled.result);
                }
                Some(request) = self.deactivate_rx.recv() => {
                    self.on_plugin_deactivated(request);
                }
            }
        }

        self.teardown();
    }
}

impl<H: PluginHostAdapter, S: StateStore> Drop for PluginsContainer<H, S> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use plugboard_core::store::ActivationState;
    use plugboard_plugin::descriptor::{EnablePredicate, PluginDescriptor};
    use tracing_test::traced_test;

    /// Shared log of which plugins are attached, in attach order.
    type Attached = Rc<RefCell<Vec<PluginId>>>;

    struct Unit {
        id: PluginId,
        attached: Attached,
        unmounts: Rc<RefCell<usize>>,
    }

    impl MountedInstance for Unit {
        fn plugin_id(&self) -> &PluginId {
            &self.id
        }

        fn is_attached(&self) -> bool {
            self.attached.borrow().contains(&self.id)
        }

        fn unmount(&mut self) {
            let mut attached = self.attached.borrow_mut();
            if let Some(pos) = attached.iter().position(|id| *id == self.id) {
                attached.remove(pos);
                *self.unmounts.borrow_mut() += 1;
            }
        }
    }

    /// Mounts synchronously, except ids listed in `deferred`, which wait
    /// for a oneshot the test completes.
    #[derive(Default)]
    struct TestHost {
        attached: Attached,
        unmounts: Rc<RefCell<usize>>,
        failing: Vec<&'static str>,
        deferred: Vec<&'static str>,
        gates: Vec<(PluginId, oneshot::Sender<()>)>,
        handles: Vec<DeactivationHandle>,
    }

    impl TestHost {
        fn unit(&self, id: PluginId) -> Unit {
            self.attached.borrow_mut().push(id.clone());
            Unit {
                id,
                attached: Rc::clone(&self.attached),
                unmounts: Rc::clone(&self.unmounts),
            }
        }

        fn open_gate(&mut self, id: &str) {
            let pos = self.gates.iter().position(|(g, _)| g.as_str() == id).unwrap();
            let (_, tx) = self.gates.remove(pos);
            tx.send(()).unwrap();
        }
    }

    impl PluginHostAdapter for TestHost {
        fn name(&self) -> &str {
            "test-host"
        }

        fn mount(&mut self, ctx: MountContext) -> MountRequest {
            self.handles.push(ctx.deactivate.clone());
            let id = ctx.plugin_id;
            if self.failing.contains(&id.as_str()) {
                return MountRequest::failed(PluginMountError::new(id, "render crashed"));
            }
            if self.deferred.contains(&id.as_str()) {
                let (tx, rx) = oneshot::channel();
                self.gates.push((id.clone(), tx));
                let attached = Rc::clone(&self.attached);
                let unmounts = Rc::clone(&self.unmounts);
                return MountRequest::pending(async move {
                    rx.await
                        .map_err(|_| PluginMountError::new(id.clone(), "load abandoned"))?;
                    attached.borrow_mut().push(id.clone());
                    let unit: Box<dyn MountedInstance> = Box::new(Unit { id, attached, unmounts });
                    Ok::<_, PluginMountError>(unit)
                });
            }
            MountRequest::ready(self.unit(id))
        }
    }

    #[derive(Default)]
    struct TestStore {
        snapshot: RefCell<StoreSnapshot>,
        dispatched: RefCell<Vec<Action>>,
    }

    impl StateStore for TestStore {
        fn snapshot(&self) -> StoreSnapshot {
            self.snapshot.borrow().clone()
        }

        fn dispatch(&self, action: Action) {
            self.snapshot.borrow_mut().reduce(action.clone());
            self.dispatched.borrow_mut().push(action);
        }
    }

    fn registry() -> Arc<PluginRegistry> {
        let mut registry = PluginRegistry::new();
        registry.register(PluginDescriptor::new("a", "A")).unwrap();
        registry
            .register(PluginDescriptor::new("b", "B").with_predicate(EnablePredicate::flag("b_on")))
            .unwrap();
        registry.register(PluginDescriptor::new("c", "C")).unwrap();
        Arc::new(registry)
    }

    fn snapshot(known: &[&str], selection: Option<&str>) -> StoreSnapshot {
        StoreSnapshot {
            activation: ActivationState {
                known_plugin_ids: known.iter().map(|s| PluginId::from(*s)).collect(),
                active_plugin_id: None,
                last_user_selection: selection.map(PluginId::from),
            },
            ..StoreSnapshot::default()
        }
    }

    fn container(host: TestHost) -> PluginsContainer<TestHost, Rc<TestStore>> {
        PluginsContainer::new(
            registry(),
            host,
            Rc::new(TestStore::default()),
            ContainerHandle::new("main"),
        )
    }

    #[test]
    fn mounts_default_and_confirms_once() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a", "b", "c"], None));

        assert_eq!(
            c.state(),
            &ContainerState::Mounted {
                plugin_id: "a".into(),
                generation: 1
            }
        );
        assert_eq!(
            *c.store().dispatched.borrow(),
            vec![Action::ActivePluginChanged("a".into())]
        );

        // The store echoes the confirmation back as a new selection.
        c.on_state_change(&snapshot(&["a", "b", "c"], Some("a")));
        assert_eq!(c.generation(), 1);
        assert_eq!(c.store().dispatched.borrow().len(), 1);
    }

    #[test]
    fn unchanged_slices_are_ignored() {
        let mut c = container(TestHost::default());
        let snap = snapshot(&["a"], None);
        c.on_state_change(&snap);
        c.on_state_change(&snap);
        assert_eq!(c.generation(), 1);
    }

    #[test]
    fn switching_unmounts_previous_first() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a", "c"], None));
        c.on_state_change(&snapshot(&["a", "c"], Some("c")));

        assert_eq!(c.state().plugin_id(), Some(&PluginId::from("c")));
        assert_eq!(*c.host().attached.borrow(), vec![PluginId::from("c")]);
        assert_eq!(*c.host().unmounts.borrow(), 1);
    }

    #[test]
    fn nothing_eligible_goes_idle() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a"], None));
        c.on_state_change(&snapshot(&["b"], None));

        assert!(c.state().is_idle());
        assert!(c.mounted().is_none());
        assert!(c.host().attached.borrow().is_empty());
    }

    #[test]
    #[traced_test]
    fn mount_failure_leaves_idle_without_retry() {
        let mut c = container(TestHost {
            failing: vec!["a"],
            ..TestHost::default()
        });
        let snap = snapshot(&["a", "c"], None);
        c.on_state_change(&snap);

        assert!(c.state().is_idle());
        assert_eq!(c.last_error().unwrap().plugin_id.as_str(), "a");
        assert!(c.store().dispatched.borrow().is_empty());
        assert!(logs_contain("plugin failed to mount"));

        c.on_state_change(&snap);
        assert_eq!(c.generation(), 1, "same state must not retry");

        c.on_state_change(&snapshot(&["a", "c"], Some("c")));
        assert_eq!(c.state().plugin_id(), Some(&PluginId::from("c")));
        assert!(c.last_error().is_none());
    }

    #[tokio::test]
    async fn superseded_pending_mount_is_discarded() {
        let mut c = container(TestHost {
            deferred: vec!["a"],
            ..TestHost::default()
        });
        c.on_state_change(&snapshot(&["a", "c"], None));
        assert!(matches!(c.state(), ContainerState::Mounting { .. }));

        c.on_state_change(&snapshot(&["a", "c"], Some("c")));
        assert_eq!(c.state().plugin_id(), Some(&PluginId::from("c")));

        c.host.open_gate("a");
        assert!(c.settle_next().await);

        assert_eq!(*c.host().attached.borrow(), vec![PluginId::from("c")]);
        assert_eq!(*c.host().unmounts.borrow(), 1);
        assert_eq!(
            *c.store().dispatched.borrow(),
            vec![Action::ActivePluginChanged("c".into())]
        );
    }

    #[test]
    fn teardown_unmounts_once() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a"], None));
        c.teardown();
        c.teardown();

        assert!(c.is_torn_down());
        assert!(c.state().is_idle());
        assert_eq!(*c.host().unmounts.borrow(), 1);

        c.on_state_change(&snapshot(&["c"], None));
        assert!(c.mounted().is_none());
    }

    #[test]
    fn late_settlement_after_teardown_is_unmounted() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a"], None));
        let stale_generation = c.generation();
        c.teardown();

        let late = c.host.unit("c".into());
        c.on_mount_settled(stale_generation, Ok(Box::new(late)));
        assert!(c.host().attached.borrow().is_empty());
        assert_eq!(*c.host().unmounts.borrow(), 2);
    }

    #[test]
    fn deactivation_callback_unmounts_current_only() {
        let mut c = container(TestHost::default());
        c.on_state_change(&snapshot(&["a", "c"], None));
        let first = c.host().handles[0].clone();

        c.on_state_change(&snapshot(&["a", "c"], Some("c")));
        let stale = DeactivationRequest {
            plugin_id: "a".into(),
            generation: first.generation(),
        };
        c.on_plugin_deactivated(stale);
        assert_eq!(c.state().plugin_id(), Some(&PluginId::from("c")));

        let current = c.host().handles[1].generation();
        c.on_plugin_deactivated(DeactivationRequest {
            plugin_id: "c".into(),
            generation: current,
        });
        assert!(c.state().is_idle());
        assert!(c.host().attached.borrow().is_empty());
    }
}
