//! Plugin Manager - 플러그인 라이프사이클 관리
//!
//! ## 전이 규약
//!
//! 1. ID별 게이트 획득 (같은 ID의 전이는 한 번에 하나)
//! 2. 레지스트리 쓰기 락 아래에서 가드 검사, pending 표시
//! 3. 락을 놓고 훅 실행 (타임아웃/취소 적용)
//! 4. 락을 다시 잡고 가드 재검증 후 커밋
//!
//! 훅이 실패하면 상태는 `error`가 되고 `on_error`가 호출된 뒤 에러가 그대로
//! 호출자에게 돌아갑니다. 이전 상태로 되돌리지 않습니다.

use super::capability::CapabilityKind;
use super::descriptor::PluginDescriptor;
use super::error::{PluginError, PluginResult};
use super::events::{EventBus, EventType, PluginEvent};
use super::graph;
use super::lifecycle::{
    HookPhase, HookRunner, LastError, PluginStatus, Transition, TransitionOptions,
};
use super::registry::{PluginEntry, PluginRegistry};
use super::traits::{Plugin, PluginContext};
use pluggable_foundation::{PluggableConfig, RuntimeEnvironment};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock, RwLockReadGuard};
use tracing::{debug, error, info, warn};

// ============================================================================
// PluginManagerConfig
// ============================================================================

/// 플러그인 매니저 설정
#[derive(Debug, Clone)]
pub struct PluginManagerConfig {
    /// 컨텍스트에 주입할 실행 환경 태그
    pub environment: RuntimeEnvironment,

    /// 훅 기본 제한 시간 (None이면 무제한)
    pub hook_timeout: Option<Duration>,
}

impl Default for PluginManagerConfig {
    fn default() -> Self {
        Self {
            environment: RuntimeEnvironment::detect(),
            hook_timeout: None,
        }
    }
}

impl PluginManagerConfig {
    pub fn with_environment(mut self, environment: RuntimeEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_hook_timeout(mut self, timeout: Duration) -> Self {
        self.hook_timeout = Some(timeout);
        self
    }
}

impl From<&PluggableConfig> for PluginManagerConfig {
    fn from(config: &PluggableConfig) -> Self {
        Self {
            environment: config.resolved_environment(),
            hook_timeout: config.hook_timeout(),
        }
    }
}

// ============================================================================
// PluginManager / ManagerHandle
// ============================================================================

struct ManagerInner {
    registry: RwLock<PluginRegistry>,
    event_bus: Arc<EventBus>,
    config: PluginManagerConfig,
}

/// 플러그인 매니저 - 전체 플러그인 시스템 관리
///
/// `Clone`은 같은 레지스트리를 가리키는 핸들을 복제합니다. 독립된 레지스트리가
/// 필요하면 `new()`로 새로 만듭니다.
#[derive(Clone)]
pub struct PluginManager {
    inner: Arc<ManagerInner>,
}

/// 매니저 약한 참조 (플러그인 컨텍스트용)
#[derive(Clone, Default)]
pub struct ManagerHandle {
    inner: Weak<ManagerInner>,
}

impl ManagerHandle {
    /// 매니저가 아직 살아 있으면 핸들 반환
    pub fn upgrade(&self) -> Option<PluginManager> {
        self.inner.upgrade().map(|inner| PluginManager { inner })
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}

impl std::fmt::Debug for ManagerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginManager {
    /// 새 매니저 생성
    pub fn new() -> Self {
        Self::with_config(PluginManagerConfig::default())
    }

    /// 설정으로 생성
    pub fn with_config(config: PluginManagerConfig) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                registry: RwLock::new(PluginRegistry::new()),
                event_bus: Arc::new(EventBus::new()),
                config,
            }),
        }
    }

    /// 약한 참조
    pub fn handle(&self) -> ManagerHandle {
        ManagerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    // ========================================================================
    // 등록/해제
    // ========================================================================

    /// 플러그인 등록 (기본 훅 옵션)
    pub async fn register(&self, plugin: Arc<dyn Plugin>) -> PluginResult<()> {
        self.register_with(plugin, TransitionOptions::default()).await
    }

    /// 플러그인 등록
    ///
    /// `on_init` 실패 시 플러그인은 `error` 상태로 레지스트리에 남습니다.
    /// `config.enabled`면 바로 활성화를 시도하고 그 결과를 반환합니다.
    pub async fn register_with(
        &self,
        plugin: Arc<dyn Plugin>,
        options: TransitionOptions,
    ) -> PluginResult<()> {
        let manifest = plugin.manifest();
        let kind = plugin.capability().kind();
        let id = manifest.id.clone();

        let gate = Arc::new(Mutex::new(()));
        let _gate = Arc::clone(&gate).lock_owned().await;

        {
            let mut registry = self.inner.registry.write().await;
            let entry = PluginEntry::new(Arc::clone(&plugin), manifest.clone(), kind, gate);
            if !registry.insert(entry) {
                warn!(plugin = %id, "Plugin is already registered");
                return Err(PluginError::DuplicateId(id));
            }
        }

        info!(plugin = %id, version = %manifest.version, capability = %kind, "Registered plugin");
        self.publish(
            EventType::Registered,
            &id,
            json!({ "version": manifest.version.to_string(), "capability": kind }),
        )
        .await;

        let ctx = self.context();
        if let Err(err) = self
            .runner(&id, &options)
            .run(HookPhase::Init, plugin.on_init(&ctx))
            .await
        {
            return self.fail(&id, &plugin, HookPhase::Init, err).await;
        }

        {
            let mut registry = self.inner.registry.write().await;
            if let Some(entry) = registry.get_mut(&id) {
                entry.status = PluginStatus::Initialized;
            }
        }
        debug!(plugin = %id, "Plugin initialized");
        self.publish(EventType::Initialized, &id, Value::Null).await;

        if manifest.config.enabled {
            self.activate_gated(&id, &options).await?;
        }

        Ok(())
    }

    /// 플러그인 등록 해제 (기본 훅 옵션)
    pub async fn unregister(&self, id: &str) -> PluginResult<()> {
        self.unregister_with(id, TransitionOptions::default()).await
    }

    /// 플러그인 등록 해제
    ///
    /// 없는 ID는 성공으로 처리합니다. active면 먼저 비활성화하고 `on_destroy`
    /// 후 제거합니다. 중간 훅이 실패하면 `error` 상태로 남고 제거되지 않습니다.
    pub async fn unregister_with(&self, id: &str, options: TransitionOptions) -> PluginResult<()> {
        let _gate = match self.acquire_gate(id).await {
            Ok(gate) => gate,
            Err(PluginError::NotFound(_)) => {
                debug!(plugin = %id, "Unregister of unknown plugin ignored");
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let (plugin, status) = {
            let registry = self.inner.registry.read().await;
            let Some(entry) = registry.get(id) else {
                return Ok(());
            };
            let dependents = graph::blocking_dependents(&registry, id);
            if !dependents.is_empty() {
                warn!(plugin = %id, ?dependents, "Unregister blocked by active dependents");
                return Err(PluginError::HasActiveDependents {
                    plugin_id: id.to_string(),
                    dependents,
                });
            }
            (Arc::clone(&entry.plugin), entry.status)
        };

        if status == PluginStatus::Active {
            self.deactivate_gated(id, &options).await?;
        }

        let ctx = self.context();
        if let Err(err) = self
            .runner(id, &options)
            .run(HookPhase::Destroy, plugin.on_destroy(&ctx))
            .await
        {
            return self.fail(id, &plugin, HookPhase::Destroy, err).await;
        }

        {
            let mut registry = self.inner.registry.write().await;
            registry.remove(id);
        }

        info!(plugin = %id, "Unregistered plugin");
        self.publish(EventType::Unregistered, id, Value::Null).await;
        Ok(())
    }

    // ========================================================================
    // 활성화/비활성화
    // ========================================================================

    /// 플러그인 활성화 (기본 훅 옵션)
    pub async fn activate(&self, id: &str) -> PluginResult<()> {
        self.activate_with(id, TransitionOptions::default()).await
    }

    /// 플러그인 활성화
    ///
    /// 이미 active면 훅 없이 성공. 의존성이 모두 active가 아니면
    /// `DependenciesNotSatisfied`이고 상태는 그대로입니다.
    pub async fn activate_with(&self, id: &str, options: TransitionOptions) -> PluginResult<()> {
        let _gate = self.acquire_gate(id).await?;
        self.activate_gated(id, &options).await
    }

    /// 플러그인 비활성화 (기본 훅 옵션)
    pub async fn deactivate(&self, id: &str) -> PluginResult<()> {
        self.deactivate_with(id, TransitionOptions::default()).await
    }

    /// 플러그인 비활성화
    ///
    /// active가 아니면 훅 없이 성공. active인 의존자가 있으면
    /// `HasActiveDependents`이고 상태는 그대로입니다.
    pub async fn deactivate_with(&self, id: &str, options: TransitionOptions) -> PluginResult<()> {
        let _gate = self.acquire_gate(id).await?;
        self.deactivate_gated(id, &options).await
    }

    async fn activate_gated(&self, id: &str, options: &TransitionOptions) -> PluginResult<()> {
        let plugin = {
            let mut registry = self.inner.registry.write().await;
            let entry = registry
                .get(id)
                .ok_or_else(|| PluginError::NotFound(id.to_string()))?;

            match entry.status {
                PluginStatus::Active => {
                    debug!(plugin = %id, "Plugin already active");
                    return Ok(());
                }
                PluginStatus::Initialized | PluginStatus::Inactive => {}
                from => {
                    warn!(plugin = %id, status = %from, "Activation rejected");
                    return Err(PluginError::InvalidTransition {
                        plugin_id: id.to_string(),
                        from,
                        to: PluginStatus::Active,
                    });
                }
            }

            let missing = graph::unsatisfied_dependencies(&registry, id);
            if !missing.is_empty() {
                warn!(plugin = %id, ?missing, "Activation blocked by dependencies");
                return Err(PluginError::DependenciesNotSatisfied {
                    plugin_id: id.to_string(),
                    missing,
                });
            }

            let entry = registry
                .get_mut(id)
                .ok_or_else(|| PluginError::NotFound(id.to_string()))?;
            entry.pending = Some(Transition::Activate);
            Arc::clone(&entry.plugin)
        };

        let ctx = self.context();
        if let Err(err) = self
            .runner(id, options)
            .run(HookPhase::Activate, plugin.on_activate(&ctx))
            .await
        {
            return self.fail(id, &plugin, HookPhase::Activate, err).await;
        }

        let committed = {
            let mut registry = self.inner.registry.write().await;
            let missing = graph::unsatisfied_dependencies(&registry, id);
            match registry.get_mut(id) {
                None => Err(PluginError::NotFound(id.to_string())),
                Some(_) if !missing.is_empty() => Err(PluginError::DependenciesNotSatisfied {
                    plugin_id: id.to_string(),
                    missing,
                }),
                Some(entry) => {
                    entry.status = PluginStatus::Active;
                    entry.pending = None;
                    entry.last_error = None;
                    Ok(())
                }
            }
        };
        if let Err(err) = committed {
            return self.fail(id, &plugin, HookPhase::Activate, err).await;
        }

        info!(plugin = %id, "Plugin activated");
        self.publish(EventType::Activated, id, Value::Null).await;
        Ok(())
    }

    async fn deactivate_gated(&self, id: &str, options: &TransitionOptions) -> PluginResult<()> {
        let plugin = {
            let mut registry = self.inner.registry.write().await;
            let entry = registry
                .get(id)
                .ok_or_else(|| PluginError::NotFound(id.to_string()))?;

            if entry.status != PluginStatus::Active {
                debug!(plugin = %id, status = %entry.status, "Plugin not active, nothing to deactivate");
                return Ok(());
            }

            let dependents = graph::blocking_dependents(&registry, id);
            if !dependents.is_empty() {
                warn!(plugin = %id, ?dependents, "Deactivation blocked by active dependents");
                return Err(PluginError::HasActiveDependents {
                    plugin_id: id.to_string(),
                    dependents,
                });
            }

            let entry = registry
                .get_mut(id)
                .ok_or_else(|| PluginError::NotFound(id.to_string()))?;
            entry.pending = Some(Transition::Deactivate);
            Arc::clone(&entry.plugin)
        };

        let ctx = self.context();
        if let Err(err) = self
            .runner(id, options)
            .run(HookPhase::Deactivate, plugin.on_deactivate(&ctx))
            .await
        {
            return self.fail(id, &plugin, HookPhase::Deactivate, err).await;
        }

        let committed = {
            let mut registry = self.inner.registry.write().await;
            let dependents = graph::blocking_dependents(&registry, id);
            match registry.get_mut(id) {
                None => Err(PluginError::NotFound(id.to_string())),
                Some(_) if !dependents.is_empty() => Err(PluginError::HasActiveDependents {
                    plugin_id: id.to_string(),
                    dependents,
                }),
                Some(entry) => {
                    entry.status = PluginStatus::Inactive;
                    entry.pending = None;
                    Ok(())
                }
            }
        };
        if let Err(err) = committed {
            return self.fail(id, &plugin, HookPhase::Deactivate, err).await;
        }

        info!(plugin = %id, "Plugin deactivated");
        self.publish(EventType::Deactivated, id, Value::Null).await;
        Ok(())
    }

    // ========================================================================
    // 조회
    // ========================================================================

    /// 디스크립터 조회
    pub async fn get_plugin(&self, id: &str) -> PluginResult<PluginDescriptor> {
        let registry = self.inner.registry.read().await;
        registry
            .get(id)
            .map(PluginEntry::descriptor)
            .ok_or_else(|| PluginError::NotFound(id.to_string()))
    }

    /// 현재 상태
    pub async fn status(&self, id: &str) -> Option<PluginStatus> {
        let registry = self.inner.registry.read().await;
        registry.get(id).map(|entry| entry.status)
    }

    pub async fn contains(&self, id: &str) -> bool {
        let registry = self.inner.registry.read().await;
        registry.contains(id)
    }

    /// 모든 플러그인 (등록 순서)
    pub async fn list_all(&self) -> Vec<PluginDescriptor> {
        let registry = self.inner.registry.read().await;
        registry.descriptors()
    }

    /// 기능별 플러그인 (등록 순서, 상태 무관)
    pub async fn list_by_capability(&self, kind: CapabilityKind) -> Vec<PluginDescriptor> {
        let registry = self.inner.registry.read().await;
        registry
            .ordered()
            .into_iter()
            .filter(|entry| entry.kind == kind)
            .map(PluginEntry::descriptor)
            .collect()
    }

    /// 등록된 의존성 (미등록 ID는 제외, 선언 목록은 디스크립터에서)
    pub async fn dependencies_of(&self, id: &str) -> Vec<String> {
        let registry = self.inner.registry.read().await;
        graph::dependencies_of(&registry, id)
    }

    /// `id`에 의존하는 플러그인 (상태 무관)
    pub async fn dependents_of(&self, id: &str) -> Vec<String> {
        let registry = self.inner.registry.read().await;
        graph::dependents_of(&registry, id)
    }

    /// 지금 활성화할 수 있는지 (의존성 기준)
    pub async fn is_activatable(&self, id: &str) -> bool {
        let registry = self.inner.registry.read().await;
        graph::is_activatable(&registry, id)
    }

    /// 비활성화/제거를 막고 있는 의존자
    pub async fn blocking_dependents(&self, id: &str) -> Vec<PluginDescriptor> {
        let registry = self.inner.registry.read().await;
        graph::blocking_dependents(&registry, id)
            .iter()
            .filter_map(|dependent| registry.get(dependent))
            .map(PluginEntry::descriptor)
            .collect()
    }

    /// active인 플러그인 인스턴스
    pub async fn active_instance(&self, id: &str) -> Option<Arc<dyn Plugin>> {
        let registry = self.inner.registry.read().await;
        registry
            .get(id)
            .filter(|entry| entry.status == PluginStatus::Active)
            .map(|entry| Arc::clone(&entry.plugin))
    }

    /// 등록된 플러그인 수
    pub async fn plugin_count(&self) -> usize {
        let registry = self.inner.registry.read().await;
        registry.len()
    }

    /// 상태별 요약
    pub async fn summary(&self) -> PluginSummary {
        let registry = self.inner.registry.read().await;
        let mut summary = PluginSummary::default();
        for entry in registry.ordered() {
            summary.total += 1;
            match entry.status {
                PluginStatus::Registered => summary.registered += 1,
                PluginStatus::Initialized => summary.initialized += 1,
                PluginStatus::Active => summary.active += 1,
                PluginStatus::Inactive => summary.inactive += 1,
                PluginStatus::Error => summary.error += 1,
            }
        }
        summary
    }

    // ========================================================================
    // 접근자
    // ========================================================================

    /// 이벤트 버스 접근
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.inner.event_bus
    }

    pub fn config(&self) -> &PluginManagerConfig {
        &self.inner.config
    }

    pub fn environment(&self) -> RuntimeEnvironment {
        self.inner.config.environment
    }

    pub(crate) async fn registry(&self) -> RwLockReadGuard<'_, PluginRegistry> {
        self.inner.registry.read().await
    }

    // ========================================================================
    // 내부 헬퍼
    // ========================================================================

    fn context(&self) -> PluginContext {
        PluginContext::new(self.inner.config.environment, self.handle())
    }

    fn runner(&self, id: &str, options: &TransitionOptions) -> HookRunner {
        HookRunner::new(id, options, self.inner.config.hook_timeout)
    }

    /// ID의 전이 게이트 획득
    ///
    /// 기다리는 동안 제거 후 재등록되면 새 게이트로 다시 시도합니다.
    async fn acquire_gate(&self, id: &str) -> PluginResult<OwnedMutexGuard<()>> {
        loop {
            let gate = {
                let registry = self.inner.registry.read().await;
                let entry = registry
                    .get(id)
                    .ok_or_else(|| PluginError::NotFound(id.to_string()))?;
                Arc::clone(&entry.gate)
            };

            let guard = Arc::clone(&gate).lock_owned().await;

            let registry = self.inner.registry.read().await;
            match registry.get(id) {
                Some(entry) if Arc::ptr_eq(&entry.gate, &gate) => return Ok(guard),
                Some(_) => continue,
                None => return Err(PluginError::NotFound(id.to_string())),
            }
        }
    }

    /// 훅 실패 처리: `error` 기록 → `on_error` → 이벤트 → 에러 반환
    async fn fail<T>(
        &self,
        id: &str,
        plugin: &Arc<dyn Plugin>,
        phase: HookPhase,
        err: PluginError,
    ) -> PluginResult<T> {
        {
            let mut registry = self.inner.registry.write().await;
            if let Some(entry) = registry.get_mut(id) {
                entry.status = PluginStatus::Error;
                entry.pending = None;
                entry.last_error = Some(LastError::new(phase, err.to_string()));
            }
        }
        error!(plugin = %id, phase = %phase, error = %err, "Plugin lifecycle hook failed");

        let on_error = self
            .runner(id, &TransitionOptions::default())
            .run(phase, plugin.on_error(&err))
            .await;
        if let Err(hook_err) = on_error {
            warn!(plugin = %id, error = %hook_err, "on_error hook failed");
        }

        self.publish(
            EventType::Failed,
            id,
            json!({ "phase": phase, "error": err.to_string() }),
        )
        .await;

        Err(err)
    }

    async fn publish(&self, event_type: EventType, id: &str, data: Value) {
        self.inner
            .event_bus
            .publish(PluginEvent::new(event_type, id, data))
            .await;
    }
}

/// 플러그인 시스템 요약
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PluginSummary {
    pub total: usize,
    pub registered: usize,
    pub initialized: usize,
    pub active: usize,
    pub inactive: usize,
    pub error: usize,
}
