// SPDX-FileCopyrightText: 2026 Plugboard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin descriptors and their enablement predicates.

use std::sync::Arc;

use plugboard_core::types::{FeatureFlags, MountPoint, PluginId, Settings};

type PredicateFn = dyn Fn(&FeatureFlags, &Settings) -> bool + Send + Sync;

/// Decides whether a plugin is available under the current flags and
/// settings. Must be pure: same inputs, same answer.
#[derive(Clone)]
pub struct EnablePredicate {
    label: String,
    test: Arc<PredicateFn>,
}

impl EnablePredicate {
    /// Build a predicate from a closure. `label` shows up in listings and logs.
    pub fn from_fn<F>(label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&FeatureFlags, &Settings) -> bool + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            test: Arc::new(f),
        }
    }

    pub fn always() -> Self {
        Self::from_fn("always", |_, _| true)
    }

    pub fn never() -> Self {
        Self::from_fn("never", |_, _| false)
    }

    /// On when the named feature flag is set.
    pub fn flag(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::from_fn(format!("flag:{name}"), move |flags, _| flags.is_set(&name))
    }

    /// On when the user opted into the experimental plugin `id`.
    pub fn experimental(id: impl Into<PluginId>) -> Self {
        let id = id.into();
        Self::from_fn(format!("experimental:{id}"), move |flags, _| {
            flags.is_experimental_enabled(&id)
        })
    }

    /// On when the boolean setting `key` is true.
    pub fn setting(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::from_fn(format!("setting:{key}"), move |_, settings| {
            settings.get_bool(&key)
        })
    }

    pub fn and(self, other: EnablePredicate) -> Self {
        let label = format!("{} & {}", self.label, other.label);
        Self::from_fn(label, move |flags, settings| {
            self.evaluate(flags, settings) && other.evaluate(flags, settings)
        })
    }

    pub fn or(self, other: EnablePredicate) -> Self {
        let label = format!("({} | {})", self.label, other.label);
        Self::from_fn(label, move |flags, settings| {
            self.evaluate(flags, settings) || other.evaluate(flags, settings)
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        let label = format!("!{}", self.label);
        Self::from_fn(label, move |flags, settings| !self.evaluate(flags, settings))
    }

    pub fn evaluate(&self, flags: &FeatureFlags, settings: &Settings) -> bool {
        (self.test)(flags, settings)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for EnablePredicate {
    fn default() -> Self {
        Self::always()
    }
}

impl std::fmt::Debug for EnablePredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("EnablePredicate").field(&self.label).finish()
    }
}

/// Static metadata a plugin registers about itself.
///
/// Immutable once built; the registry hands out shared references only.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    id: PluginId,
    display_name: String,
    mount_point: MountPoint,
    enabled: EnablePredicate,
}

impl PluginDescriptor {
    /// A descriptor that is always enabled and mounts nothing of its own.
    /// Refine it with the `with_*` builders before registering.
    pub fn new(id: impl Into<PluginId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            mount_point: MountPoint::None,
            enabled: EnablePredicate::always(),
        }
    }

    pub fn with_mount_point(mut self, mount_point: MountPoint) -> Self {
        self.mount_point = mount_point;
        self
    }

    pub fn with_predicate(mut self, predicate: EnablePredicate) -> Self {
        self.enabled = predicate;
        self
    }

    pub fn id(&self) -> &PluginId {
        &self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mount_point(&self) -> &MountPoint {
        &self.mount_point
    }

    pub fn predicate(&self) -> &EnablePredicate {
        &self.enabled
    }

    pub fn is_enabled(&self, flags: &FeatureFlags, settings: &Settings) -> bool {
        self.enabled.evaluate(flags, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_descriptor_defaults_to_enabled_with_no_mount() {
        let d = PluginDescriptor::new("text", "Text");
        assert_eq!(d.id().as_str(), "text");
        assert_eq!(d.display_name(), "Text");
        assert_eq!(*d.mount_point(), MountPoint::None);
        assert!(d.is_enabled(&FeatureFlags::new(), &Settings::new()));
    }

    #[test]
    fn flag_predicate_follows_flag() {
        let p = EnablePredicate::flag("enable_debugger");
        assert!(!p.evaluate(&FeatureFlags::new(), &Settings::new()));
        let on = FeatureFlags::new().with_flag("enable_debugger", true);
        assert!(p.evaluate(&on, &Settings::new()));
        assert_eq!(p.label(), "flag:enable_debugger");
    }

    #[test]
    fn experimental_predicate_needs_opt_in() {
        let p = EnablePredicate::experimental("custom_scalars");
        assert!(!p.evaluate(&FeatureFlags::new(), &Settings::new()));
        let flags = FeatureFlags::new().with_experimental("custom_scalars");
        assert!(p.evaluate(&flags, &Settings::new()));
    }

    #[test]
    fn combinators_compose_and_label() {
        let p = EnablePredicate::flag("a")
            .and(EnablePredicate::setting("b").or(EnablePredicate::never()))
            .not();
        let flags = FeatureFlags::new().with_flag("a", true);
        let settings = Settings::new().with("b", true);
        assert!(!p.evaluate(&flags, &settings));
        assert!(p.evaluate(&flags, &Settings::new()));
        assert_eq!(p.label(), "!flag:a & (setting:b | never)");
    }
}
