//! Plugin traits - 핵심 플러그인 인터페이스

use super::capability::Capability;
use super::error::PluginError;
use super::manager::ManagerHandle;
use super::manifest::PluginManifest;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pluggable_foundation::{Result, RuntimeEnvironment};

// ============================================================================
// PluginContext - 라이프사이클 훅에 전달되는 컨텍스트
// ============================================================================

/// 플러그인 컨텍스트
///
/// 훅이 호출될 때마다 새로 만들어집니다. `manager`는 약한 참조라서
/// 플러그인이 보관해도 매니저 수명을 늘리지 않습니다.
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// 컨텍스트 생성 시각
    pub timestamp: DateTime<Utc>,

    /// 실행 환경 태그 (정보용)
    pub environment: RuntimeEnvironment,

    /// 매니저 역참조 (다른 플러그인 조회용)
    pub manager: ManagerHandle,
}

impl PluginContext {
    pub fn new(environment: RuntimeEnvironment, manager: ManagerHandle) -> Self {
        Self {
            timestamp: Utc::now(),
            environment,
            manager,
        }
    }
}

// ============================================================================
// Plugin Trait - 모든 플러그인이 구현해야 하는 인터페이스
// ============================================================================

/// 플러그인 트레이트
///
/// `manifest()`와 `capability()`만 필수입니다. 훅은 모두 선택이며 기본 구현은
/// 성공을 반환합니다. 매니저는 등록 시점에 매니페스트와 기능 종류를 한 번 읽고
/// 이후에는 다시 읽지 않습니다.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// 플러그인 매니페스트 반환
    fn manifest(&self) -> PluginManifest;

    /// 플러그인이 제공하는 기능
    fn capability(&self) -> Capability<'_>;

    /// 등록 직후 호출
    async fn on_init(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 활성화 시 호출 (의존성 검사 통과 후)
    async fn on_activate(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 비활성화 시 호출
    async fn on_deactivate(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 레지스트리에서 제거되기 직전 호출
    async fn on_destroy(&self, _ctx: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// 다른 훅이 실패해 `error` 상태가 된 뒤 호출
    ///
    /// 여기서 반환한 에러는 로그만 남고 호출자에게 전달되지 않습니다.
    async fn on_error(&self, _error: &PluginError) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::capability::{CapabilityKind, Transformer};
    use crate::plugin::PluginManager;
    use serde_json::Value;

    struct Identity;

    #[async_trait]
    impl Transformer for Identity {
        async fn transform(&self, data: Value) -> Result<Value> {
            Ok(data)
        }
    }

    #[async_trait]
    impl Plugin for Identity {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new("identity", "Identity")
        }

        fn capability(&self) -> Capability<'_> {
            Capability::Transform(self)
        }
    }

    #[tokio::test]
    async fn test_default_hooks_succeed() {
        let plugin = Identity;
        let manager = PluginManager::new();
        let ctx = PluginContext::new(RuntimeEnvironment::Development, manager.handle());

        assert!(plugin.on_init(&ctx).await.is_ok());
        assert!(plugin.on_activate(&ctx).await.is_ok());
        assert!(plugin.on_deactivate(&ctx).await.is_ok());
        assert!(plugin.on_destroy(&ctx).await.is_ok());
        assert_eq!(plugin.capability().kind(), CapabilityKind::Transform);
    }

    #[tokio::test]
    async fn test_context_handle_is_weak() {
        let manager = PluginManager::new();
        let ctx = PluginContext::new(RuntimeEnvironment::Production, manager.handle());

        assert!(ctx.manager.upgrade().is_some());
        drop(manager);
        assert!(ctx.manager.upgrade().is_none());
        assert!(ctx.environment.is_production());
    }
}
