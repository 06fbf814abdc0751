//! Plugin Registry - 플러그인 저장소
//!
//! 락은 갖지 않습니다. 매니저가 `tokio::sync::RwLock`으로 감싸서 씁니다.

use super::capability::CapabilityKind;
use super::descriptor::PluginDescriptor;
use super::lifecycle::{LastError, PluginStatus, Transition};
use super::manifest::PluginManifest;
use super::traits::Plugin;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 레지스트리 항목
pub(crate) struct PluginEntry {
    /// 플러그인 인스턴스
    pub plugin: Arc<dyn Plugin>,

    /// 등록 시점의 매니페스트
    pub manifest: PluginManifest,

    /// 기능 종류
    pub kind: CapabilityKind,

    /// 현재 상태
    pub status: PluginStatus,

    /// 마지막 실패
    pub last_error: Option<LastError>,

    /// 훅 실행 중인 전이
    pub pending: Option<Transition>,

    /// 로드 순서
    pub load_order: u64,

    /// 같은 ID에 대한 전이를 직렬화하는 게이트
    pub gate: Arc<Mutex<()>>,
}

impl PluginEntry {
    /// 의존성 목록은 여기서 한 번 중복 제거 (선언 순서 유지)
    pub fn new(
        plugin: Arc<dyn Plugin>,
        mut manifest: PluginManifest,
        kind: CapabilityKind,
        gate: Arc<Mutex<()>>,
    ) -> Self {
        let mut seen = HashSet::new();
        manifest.dependencies.retain(|dep| seen.insert(dep.clone()));

        Self {
            plugin,
            manifest,
            kind,
            status: PluginStatus::Registered,
            last_error: None,
            pending: None,
            load_order: 0,
            gate,
        }
    }

    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    /// 의존성으로서 충족되는지 (active이고 비활성화 중이 아님)
    pub fn satisfies_dependents(&self) -> bool {
        self.status == PluginStatus::Active && self.pending != Some(Transition::Deactivate)
    }

    /// 의존 대상의 비활성화/제거를 막는지 (active이거나 활성화 중)
    pub fn holds_dependencies(&self) -> bool {
        self.status == PluginStatus::Active || self.pending == Some(Transition::Activate)
    }

    pub fn descriptor(&self) -> PluginDescriptor {
        PluginDescriptor {
            manifest: self.manifest.clone(),
            capability: self.kind,
            status: self.status,
            last_error: self.last_error.clone(),
            pending: self.pending,
            load_order: self.load_order,
        }
    }
}

/// 플러그인 레지스트리 - ID당 항목 하나
#[derive(Default)]
pub(crate) struct PluginRegistry {
    /// 플러그인 저장소 (ID -> PluginEntry)
    plugins: HashMap<String, PluginEntry>,

    /// 로드 카운터
    load_counter: u64,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목 추가. 같은 ID가 있으면 false
    pub fn insert(&mut self, mut entry: PluginEntry) -> bool {
        if self.plugins.contains_key(entry.id()) {
            return false;
        }

        self.load_counter += 1;
        entry.load_order = self.load_counter;
        self.plugins.insert(entry.id().to_string(), entry);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<PluginEntry> {
        self.plugins.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&PluginEntry> {
        self.plugins.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PluginEntry> {
        self.plugins.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.plugins.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// 로드 순서대로 정렬된 항목
    pub fn ordered(&self) -> Vec<&PluginEntry> {
        let mut entries: Vec<_> = self.plugins.values().collect();
        entries.sort_by_key(|entry| entry.load_order);
        entries
    }

    /// 로드 순서대로 스냅샷
    pub fn descriptors(&self) -> Vec<PluginDescriptor> {
        self.ordered().into_iter().map(PluginEntry::descriptor).collect()
    }
}
