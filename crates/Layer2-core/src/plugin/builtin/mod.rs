//! Built-in Plugins
//!
//! 기본 제공 플러그인들 (등록 순서 = 파이프라인 기본 순서)

mod arithmetic;
mod format;
mod text;

pub use arithmetic::{ArithmeticKind, ArithmeticOperation};
pub use format::{HtmlFormatter, JsonFormatter};
pub use text::{StringLengthValidator, UppercaseTransformer};

use super::{Plugin, PluginError, PluginManager};
use std::sync::Arc;
use tracing::warn;

/// 데이터 처리 플러그인 (변환, 검증, 포맷)
pub fn data_processing() -> Vec<Arc<dyn Plugin>> {
    vec![
        Arc::new(UppercaseTransformer::new()),
        Arc::new(StringLengthValidator::new()),
        Arc::new(JsonFormatter::new()),
        Arc::new(HtmlFormatter::new()),
    ]
}

/// 사칙연산 플러그인
pub fn operations() -> Vec<Arc<dyn Plugin>> {
    ArithmeticKind::ALL
        .into_iter()
        .map(|kind| Arc::new(ArithmeticOperation::new(kind)) as Arc<dyn Plugin>)
        .collect()
}

/// 모든 기본 플러그인
pub fn all() -> Vec<Arc<dyn Plugin>> {
    let mut plugins = data_processing();
    plugins.extend(operations());
    plugins
}

/// 기본 플러그인 일괄 등록
///
/// 하나가 실패해도 나머지는 계속 등록하고, 실패한 것들을 반환합니다.
pub async fn register_all(manager: &PluginManager) -> Vec<PluginError> {
    let mut failures = Vec::new();
    for plugin in all() {
        if let Err(err) = manager.register(plugin).await {
            warn!(plugin = %err.plugin_id(), error = %err, "Failed to register built-in plugin");
            failures.push(err);
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{CapabilityKind, PluginStatus};

    #[tokio::test]
    async fn test_register_all() {
        let manager = PluginManager::new();
        assert!(register_all(&manager).await.is_empty());

        let summary = manager.summary().await;
        assert_eq!(summary.total, 8);
        assert_eq!(summary.active, 8);

        let formatters: Vec<_> = manager
            .list_by_capability(CapabilityKind::Format)
            .await
            .into_iter()
            .map(|d| d.manifest.id)
            .collect();
        assert_eq!(formatters, vec![JsonFormatter::ID, HtmlFormatter::ID]);
        assert_eq!(
            manager.dependencies_of(HtmlFormatter::ID).await,
            vec![JsonFormatter::ID]
        );
    }

    #[tokio::test]
    async fn test_second_registration_reports_duplicates() {
        let manager = PluginManager::new();
        register_all(&manager).await;

        let failures = register_all(&manager).await;
        assert_eq!(failures.len(), 8);
        assert!(failures
            .iter()
            .all(|err| matches!(err, PluginError::DuplicateId(_))));
        assert_eq!(
            manager.status(UppercaseTransformer::ID).await,
            Some(PluginStatus::Active)
        );
    }
}
