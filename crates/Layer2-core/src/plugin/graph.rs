//! Dependency Graph - 레지스트리 스냅샷에 대한 순수 조회
//!
//! 직접 의존성의 상태만 봅니다. 순환 의존은 오류로 처리하지 않고, 순환에 속한
//! 플러그인은 모두 활성화할 수 없는 상태로 남습니다.

use super::registry::PluginRegistry;

/// 충족되지 않은 의존성 (미등록이거나 active가 아닌 것, 선언 순서)
pub(crate) fn unsatisfied_dependencies(registry: &PluginRegistry, id: &str) -> Vec<String> {
    let Some(entry) = registry.get(id) else {
        return vec![];
    };

    entry
        .manifest
        .dependencies
        .iter()
        .filter(|dep| {
            !registry
                .get(dep)
                .is_some_and(|candidate| candidate.satisfies_dependents())
        })
        .cloned()
        .collect()
}

/// 모든 의존성이 active인지. 알 수 없는 ID는 false
pub(crate) fn is_activatable(registry: &PluginRegistry, id: &str) -> bool {
    registry.contains(id) && unsatisfied_dependencies(registry, id).is_empty()
}

/// `id`를 의존성으로 가진 active(또는 활성화 중) 플러그인, 등록 순서
pub(crate) fn blocking_dependents(registry: &PluginRegistry, id: &str) -> Vec<String> {
    registry
        .ordered()
        .into_iter()
        .filter(|entry| entry.id() != id)
        .filter(|entry| entry.manifest.depends_on(id) && entry.holds_dependencies())
        .map(|entry| entry.id().to_string())
        .collect()
}

/// 선언된 의존성 중 현재 등록된 것 (선언 순서)
pub(crate) fn dependencies_of(registry: &PluginRegistry, id: &str) -> Vec<String> {
    let Some(entry) = registry.get(id) else {
        return vec![];
    };

    entry
        .manifest
        .dependencies
        .iter()
        .filter(|dep| registry.contains(dep))
        .cloned()
        .collect()
}

/// `id`를 의존성으로 선언한 모든 플러그인, 등록 순서
pub(crate) fn dependents_of(registry: &PluginRegistry, id: &str) -> Vec<String> {
    registry
        .ordered()
        .into_iter()
        .filter(|entry| entry.manifest.depends_on(id))
        .map(|entry| entry.id().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::capability::CapabilityKind;
    use crate::plugin::lifecycle::{PluginStatus, Transition};
    use crate::plugin::registry::PluginEntry;
    use crate::plugin::testing::StubPlugin;
    use crate::plugin::traits::Plugin;
    use std::sync::Arc;

    fn add(registry: &mut PluginRegistry, plugin: StubPlugin, status: PluginStatus) {
        let plugin = Arc::new(plugin);
        let manifest = plugin.manifest();
        let id = manifest.id.clone();
        registry.insert(PluginEntry::new(
            plugin,
            manifest,
            CapabilityKind::Transform,
            Arc::default(),
        ));
        if let Some(entry) = registry.get_mut(&id) {
            entry.status = status;
        }
    }

    #[test]
    fn test_missing_dependency_is_unsatisfied() {
        let mut registry = PluginRegistry::new();
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json"),
            PluginStatus::Initialized,
        );

        assert_eq!(unsatisfied_dependencies(&registry, "html"), vec!["json"]);
        assert!(!is_activatable(&registry, "html"));
        assert!(!is_activatable(&registry, "unknown"));
    }

    #[test]
    fn test_active_dependency_satisfies() {
        let mut registry = PluginRegistry::new();
        add(&mut registry, StubPlugin::new("json"), PluginStatus::Active);
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json"),
            PluginStatus::Initialized,
        );

        assert!(is_activatable(&registry, "html"));
        assert!(is_activatable(&registry, "json"));
    }

    #[test]
    fn test_deactivating_dependency_does_not_satisfy() {
        let mut registry = PluginRegistry::new();
        add(&mut registry, StubPlugin::new("json"), PluginStatus::Active);
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json"),
            PluginStatus::Inactive,
        );
        registry.get_mut("json").unwrap().pending = Some(Transition::Deactivate);

        assert!(!is_activatable(&registry, "html"));
    }

    #[test]
    fn test_blocking_dependents_only_counts_active() {
        let mut registry = PluginRegistry::new();
        add(&mut registry, StubPlugin::new("json"), PluginStatus::Active);
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json"),
            PluginStatus::Inactive,
        );
        add(
            &mut registry,
            StubPlugin::new("xml").depends_on("json"),
            PluginStatus::Active,
        );

        assert_eq!(blocking_dependents(&registry, "json"), vec!["xml"]);
        assert_eq!(dependents_of(&registry, "json"), vec!["html", "xml"]);
    }

    #[test]
    fn test_activating_dependent_blocks() {
        let mut registry = PluginRegistry::new();
        add(&mut registry, StubPlugin::new("json"), PluginStatus::Active);
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json"),
            PluginStatus::Initialized,
        );
        registry.get_mut("html").unwrap().pending = Some(Transition::Activate);

        assert_eq!(blocking_dependents(&registry, "json"), vec!["html"]);
    }

    #[test]
    fn test_cycle_is_never_activatable() {
        let mut registry = PluginRegistry::new();
        add(
            &mut registry,
            StubPlugin::new("a").depends_on("b"),
            PluginStatus::Initialized,
        );
        add(
            &mut registry,
            StubPlugin::new("b").depends_on("a"),
            PluginStatus::Initialized,
        );

        assert!(!is_activatable(&registry, "a"));
        assert!(!is_activatable(&registry, "b"));
    }

    #[test]
    fn test_dependencies_of_skips_unregistered() {
        let mut registry = PluginRegistry::new();
        add(
            &mut registry,
            StubPlugin::new("html").depends_on("json").depends_on("css"),
            PluginStatus::Initialized,
        );
        assert!(dependencies_of(&registry, "html").is_empty());

        add(&mut registry, StubPlugin::new("css"), PluginStatus::Inactive);
        assert_eq!(dependencies_of(&registry, "html"), vec!["css"]);
    }

    #[test]
    fn test_unknown_ids_are_empty() {
        let registry = PluginRegistry::new();
        assert!(dependencies_of(&registry, "nope").is_empty());
        assert!(dependents_of(&registry, "nope").is_empty());
        assert!(blocking_dependents(&registry, "nope").is_empty());
    }
}
