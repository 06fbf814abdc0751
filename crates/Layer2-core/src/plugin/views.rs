//! Typed Capability Views - active 플러그인을 기능별로 꺼내는 읽기 전용 뷰
//!
//! 캐시하지 않습니다. 호출할 때마다 레지스트리에서 다시 계산합니다.

use super::capability::{
    Capability, CapabilityKind, Formatter, Operation, Transformer, ValidationReport, Validator,
};
use super::descriptor::PluginDescriptor;
use super::error::{PluginError, PluginResult};
use super::lifecycle::PluginStatus;
use super::manager::PluginManager;
use super::registry::PluginEntry;
use super::traits::Plugin;
use serde_json::Value;
use std::sync::Arc;

/// 플러그인 핸들 - 디스크립터 스냅샷 + 인스턴스
#[derive(Clone)]
pub struct PluginHandle {
    pub descriptor: PluginDescriptor,
    plugin: Arc<dyn Plugin>,
}

impl PluginHandle {
    fn from_entry(entry: &PluginEntry) -> Self {
        Self {
            descriptor: entry.descriptor(),
            plugin: Arc::clone(&entry.plugin),
        }
    }

    pub fn id(&self) -> &str {
        self.descriptor.id()
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn capability(&self) -> Capability<'_> {
        self.plugin.capability()
    }

    fn mismatch(&self, expected: CapabilityKind) -> PluginError {
        PluginError::CapabilityMismatch {
            plugin_id: self.id().to_string(),
            expected,
            actual: self.descriptor.capability,
        }
    }

    // ========================================================================
    // 기능 다운캐스트
    // ========================================================================

    pub fn as_transformer(&self) -> PluginResult<&dyn Transformer> {
        match self.capability() {
            Capability::Transform(transformer) => Ok(transformer),
            _ => Err(self.mismatch(CapabilityKind::Transform)),
        }
    }

    pub fn as_validator(&self) -> PluginResult<&dyn Validator> {
        match self.capability() {
            Capability::Validate(validator) => Ok(validator),
            _ => Err(self.mismatch(CapabilityKind::Validate)),
        }
    }

    pub fn as_formatter(&self) -> PluginResult<&dyn Formatter> {
        match self.capability() {
            Capability::Format(formatter) => Ok(formatter),
            _ => Err(self.mismatch(CapabilityKind::Format)),
        }
    }

    pub fn as_operation(&self) -> PluginResult<&dyn Operation> {
        match self.capability() {
            Capability::Operate(operation) => Ok(operation),
            _ => Err(self.mismatch(CapabilityKind::Operate)),
        }
    }

    // ========================================================================
    // 기능 호출 (실패는 Invocation, 상태는 그대로)
    // ========================================================================

    pub async fn transform(&self, data: Value) -> PluginResult<Value> {
        self.as_transformer()?
            .transform(data)
            .await
            .map_err(|e| PluginError::invocation(self.id(), e))
    }

    pub async fn validate(&self, data: &Value) -> PluginResult<ValidationReport> {
        self.as_validator()?
            .validate(data)
            .await
            .map_err(|e| PluginError::invocation(self.id(), e))
    }

    pub async fn format(&self, data: &Value) -> PluginResult<String> {
        self.as_formatter()?
            .format(data)
            .await
            .map_err(|e| PluginError::invocation(self.id(), e))
    }

    pub async fn execute(&self, operands: &[f64]) -> PluginResult<f64> {
        self.as_operation()?
            .execute(operands)
            .await
            .map_err(|e| PluginError::invocation(self.id(), e))
    }
}

impl std::fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginHandle")
            .field("id", &self.id())
            .field("capability", &self.descriptor.capability)
            .field("status", &self.descriptor.status)
            .finish()
    }
}

// ============================================================================
// PluginManager 뷰
// ============================================================================

impl PluginManager {
    /// 기능별 active 플러그인 (등록 순서)
    pub async fn active_by_capability(&self, kind: CapabilityKind) -> Vec<PluginHandle> {
        let registry = self.registry().await;
        registry
            .ordered()
            .into_iter()
            .filter(|entry| entry.kind == kind && entry.status == PluginStatus::Active)
            .map(PluginHandle::from_entry)
            .collect()
    }

    pub async fn transformers(&self) -> Vec<PluginHandle> {
        self.active_by_capability(CapabilityKind::Transform).await
    }

    pub async fn validators(&self) -> Vec<PluginHandle> {
        self.active_by_capability(CapabilityKind::Validate).await
    }

    pub async fn formatters(&self) -> Vec<PluginHandle> {
        self.active_by_capability(CapabilityKind::Format).await
    }

    pub async fn operations(&self) -> Vec<PluginHandle> {
        self.active_by_capability(CapabilityKind::Operate).await
    }

    /// active 플러그인 하나 (없으면 NotFound, active가 아니면 NotActive)
    pub async fn active_plugin(&self, id: &str) -> PluginResult<PluginHandle> {
        let registry = self.registry().await;
        let entry = registry
            .get(id)
            .ok_or_else(|| PluginError::NotFound(id.to_string()))?;
        if entry.status != PluginStatus::Active {
            return Err(PluginError::NotActive(id.to_string()));
        }
        Ok(PluginHandle::from_entry(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::testing::StubPlugin;
    use serde_json::json;

    #[tokio::test]
    async fn test_views_filter_to_active() {
        let manager = PluginManager::new();
        manager.register(Arc::new(StubPlugin::new("a").enabled())).await.unwrap();
        manager.register(Arc::new(StubPlugin::new("b"))).await.unwrap();
        manager.register(Arc::new(StubPlugin::new("c").enabled())).await.unwrap();

        let ids: Vec<_> = manager
            .transformers()
            .await
            .iter()
            .map(|h| h.id().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(manager.formatters().await.is_empty());

        manager.deactivate("a").await.unwrap();
        assert_eq!(manager.transformers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_handle_downcast() {
        let manager = PluginManager::new();
        manager.register(Arc::new(StubPlugin::new("a").enabled())).await.unwrap();

        let handle = manager.active_plugin("a").await.unwrap();
        assert!(handle.as_transformer().is_ok());
        assert!(matches!(
            handle.as_formatter(),
            Err(PluginError::CapabilityMismatch {
                expected: CapabilityKind::Format,
                actual: CapabilityKind::Transform,
                ..
            })
        ));
        assert_eq!(handle.transform(json!("x")).await.unwrap(), json!("x"));
    }

    #[tokio::test]
    async fn test_active_plugin_errors() {
        let manager = PluginManager::new();
        manager.register(Arc::new(StubPlugin::new("a"))).await.unwrap();

        assert!(matches!(
            manager.active_plugin("a").await,
            Err(PluginError::NotActive(_))
        ));
        assert!(matches!(
            manager.active_plugin("b").await,
            Err(PluginError::NotFound(_))
        ));
    }
}
