//! Pipeline - 기능 뷰를 조합한 데이터 처리 파이프라인
//!
//! 변환 → 검증 → 포맷 순서로 active 플러그인만 실행합니다.
//! 검증은 첫 실패에서 멈추고 그 검증기의 에러 목록을 돌려줍니다.

use crate::plugin::{CapabilityKind, PluginHandle, PluginManager, PluginResult};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// 파이프라인 실행 결과
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PipelineOutcome {
    /// 모든 단계 통과
    Completed {
        output: String,
        /// 실행된 플러그인 ID (실행 순서)
        applied: Vec<String>,
    },

    /// 검증 실패
    Rejected {
        validator: String,
        errors: Vec<String>,
    },
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn output(&self) -> Option<&str> {
        match self {
            Self::Completed { output, .. } => Some(output),
            Self::Rejected { .. } => None,
        }
    }
}

/// 데이터 처리 파이프라인
#[derive(Clone)]
pub struct Pipeline {
    manager: PluginManager,
    by_priority: bool,
}

impl Pipeline {
    /// 등록 순서로 실행하는 파이프라인
    pub fn new(manager: PluginManager) -> Self {
        Self {
            manager,
            by_priority: false,
        }
    }

    /// 각 단계를 `priority` 오름차순으로 실행 (같으면 등록 순서)
    ///
    /// 기본 동작(등록 순서)과 결과가 달라질 수 있습니다.
    pub fn ordered_by_priority(mut self) -> Self {
        self.by_priority = true;
        self
    }

    async fn stage(&self, kind: CapabilityKind) -> Vec<PluginHandle> {
        let mut handles = self.manager.active_by_capability(kind).await;
        if self.by_priority {
            handles.sort_by_key(|handle| handle.descriptor.priority());
        }
        handles
    }

    /// 입력을 파이프라인에 통과시킴
    pub async fn run(&self, input: impl Into<Value>) -> PluginResult<PipelineOutcome> {
        let mut data = input.into();
        let mut applied = Vec::new();

        for transformer in self.stage(CapabilityKind::Transform).await {
            data = transformer.transform(data).await?;
            debug!(plugin = %transformer.id(), "Transform applied");
            applied.push(transformer.id().to_string());
        }

        for validator in self.stage(CapabilityKind::Validate).await {
            let report = validator.validate(&data).await?;
            applied.push(validator.id().to_string());
            if !report.valid {
                info!(plugin = %validator.id(), errors = ?report.errors, "Pipeline input rejected");
                return Ok(PipelineOutcome::Rejected {
                    validator: validator.id().to_string(),
                    errors: report.errors,
                });
            }
        }

        for formatter in self.stage(CapabilityKind::Format).await {
            data = Value::String(formatter.format(&data).await?);
            debug!(plugin = %formatter.id(), "Format applied");
            applied.push(formatter.id().to_string());
        }

        let output = match data {
            Value::String(text) => text,
            other => other.to_string(),
        };
        info!(steps = applied.len(), "Pipeline completed");

        Ok(PipelineOutcome::Completed { output, applied })
    }

    /// active 연산 플러그인 실행
    pub async fn execute(&self, operation_id: &str, operands: &[f64]) -> PluginResult<f64> {
        let operation = self.manager.active_plugin(operation_id).await?;
        operation.execute(operands).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::builtin::{self, HtmlFormatter, JsonFormatter, StringLengthValidator};
    use crate::plugin::{
        Capability, Plugin, PluginError, PluginManifest, Transformer,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    async fn manager_with_builtins() -> PluginManager {
        let manager = PluginManager::new();
        assert!(builtin::register_all(&manager).await.is_empty());
        manager
    }

    #[tokio::test]
    async fn test_full_pipeline() {
        let manager = manager_with_builtins().await;
        let outcome = Pipeline::new(manager).run("hello").await.unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::Completed {
                output: r#"<pre class="code">"\"HELLO\""</pre>"#.to_string(),
                applied: vec![
                    "uppercase-transformer".to_string(),
                    StringLengthValidator::ID.to_string(),
                    JsonFormatter::ID.to_string(),
                    HtmlFormatter::ID.to_string(),
                ],
            }
        );
    }

    #[tokio::test]
    async fn test_inactive_plugins_are_skipped() {
        let manager = manager_with_builtins().await;
        manager.deactivate(HtmlFormatter::ID).await.unwrap();

        let outcome = Pipeline::new(manager).run("hello").await.unwrap();
        assert_eq!(outcome.output(), Some("\"HELLO\""));
    }

    #[tokio::test]
    async fn test_validation_short_circuits() {
        let manager = manager_with_builtins().await;
        let outcome = Pipeline::new(manager).run("hi").await.unwrap();

        assert_eq!(
            outcome,
            PipelineOutcome::Rejected {
                validator: StringLengthValidator::ID.to_string(),
                errors: vec!["String length must be between 3 and 50 characters".to_string()],
            }
        );
        assert!(!outcome.is_completed());
    }

    struct Append {
        id: &'static str,
        priority: i32,
    }

    #[async_trait]
    impl Transformer for Append {
        async fn transform(&self, data: Value) -> pluggable_foundation::Result<Value> {
            Ok(json!(format!("{}{}", data.as_str().unwrap_or_default(), self.id)))
        }
    }

    #[async_trait]
    impl Plugin for Append {
        fn manifest(&self) -> PluginManifest {
            PluginManifest::new(self.id, self.id).with_priority(self.priority)
        }

        fn capability(&self) -> Capability<'_> {
            Capability::Transform(self)
        }
    }

    #[tokio::test]
    async fn test_priority_ordering_is_opt_in() {
        let manager = PluginManager::new();
        manager.register(Arc::new(Append { id: "b", priority: 2 })).await.unwrap();
        manager.register(Arc::new(Append { id: "a", priority: 1 })).await.unwrap();

        let default = Pipeline::new(manager.clone()).run("").await.unwrap();
        assert_eq!(default.output(), Some("ba"));

        let ordered = Pipeline::new(manager).ordered_by_priority().run("").await.unwrap();
        assert_eq!(ordered.output(), Some("ab"));
    }

    #[tokio::test]
    async fn test_execute_operation() {
        let manager = manager_with_builtins().await;
        let pipeline = Pipeline::new(manager.clone());

        assert_eq!(pipeline.execute("multiplication", &[3.0, 4.0]).await.unwrap(), 12.0);

        manager.deactivate("division").await.unwrap();
        assert!(matches!(
            pipeline.execute("division", &[1.0, 2.0]).await,
            Err(PluginError::NotActive(_))
        ));
        assert!(matches!(
            pipeline.execute("uppercase-transformer", &[1.0]).await,
            Err(PluginError::CapabilityMismatch { .. })
        ));
        assert!(matches!(
            pipeline.execute("addition", &[]).await,
            Err(PluginError::Invocation { .. })
        ));
    }
}
