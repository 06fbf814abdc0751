//! Plugin Error - 플러그인 매니저 에러 분류

use super::lifecycle::{HookPhase, PluginStatus};
use super::capability::CapabilityKind;
use thiserror::Error;

/// Result type alias
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// 플러그인 매니저 에러
#[derive(Error, Debug)]
pub enum PluginError {
    /// 이미 같은 ID가 등록됨
    #[error("Plugin {0} is already registered")]
    DuplicateId(String),

    /// 알 수 없는 ID
    #[error("Plugin {0} not found")]
    NotFound(String),

    /// 의존성 중 active가 아닌 것이 있음
    #[error("Dependencies not satisfied for plugin {plugin_id}: {missing:?} not active")]
    DependenciesNotSatisfied {
        plugin_id: String,
        missing: Vec<String>,
    },

    /// active 상태의 다른 플러그인이 의존 중
    #[error("Cannot deactivate plugin {plugin_id}: {dependents:?} depend on it")]
    HasActiveDependents {
        plugin_id: String,
        dependents: Vec<String>,
    },

    /// 라이프사이클 훅 실패 (타임아웃, 취소 포함)
    #[error("Plugin {plugin_id} {phase} hook failed: {source}")]
    HookFailure {
        plugin_id: String,
        phase: HookPhase,
        #[source]
        source: pluggable_foundation::Error,
    },

    /// 상태 머신에 없는 전이
    #[error("Plugin {plugin_id} cannot move from {from} to {to}")]
    InvalidTransition {
        plugin_id: String,
        from: PluginStatus,
        to: PluginStatus,
    },

    /// active가 아닌 플러그인의 기능 호출
    #[error("Plugin {0} is not active")]
    NotActive(String),

    /// 요청한 기능을 제공하지 않음
    #[error("Plugin {plugin_id} provides {actual}, not {expected}")]
    CapabilityMismatch {
        plugin_id: String,
        expected: CapabilityKind,
        actual: CapabilityKind,
    },

    /// 기능 연산 실패 (라이프사이클 상태는 바뀌지 않음)
    #[error("Plugin {plugin_id} failed: {source}")]
    Invocation {
        plugin_id: String,
        #[source]
        source: pluggable_foundation::Error,
    },
}

impl PluginError {
    /// 훅 실패 에러 생성 헬퍼
    pub fn hook(
        plugin_id: impl Into<String>,
        phase: HookPhase,
        source: pluggable_foundation::Error,
    ) -> Self {
        PluginError::HookFailure {
            plugin_id: plugin_id.into(),
            phase,
            source,
        }
    }

    /// 기능 연산 실패 에러 생성 헬퍼
    pub fn invocation(plugin_id: impl Into<String>, source: pluggable_foundation::Error) -> Self {
        PluginError::Invocation {
            plugin_id: plugin_id.into(),
            source,
        }
    }

    /// 에러를 일으킨 플러그인 ID
    pub fn plugin_id(&self) -> &str {
        match self {
            Self::DuplicateId(id) | Self::NotFound(id) | Self::NotActive(id) => id,
            Self::DependenciesNotSatisfied { plugin_id, .. }
            | Self::HasActiveDependents { plugin_id, .. }
            | Self::HookFailure { plugin_id, .. }
            | Self::InvalidTransition { plugin_id, .. }
            | Self::CapabilityMismatch { plugin_id, .. }
            | Self::Invocation { plugin_id, .. } => plugin_id,
        }
    }

    /// 훅 실패 여부
    pub fn is_hook_failure(&self) -> bool {
        matches!(self, Self::HookFailure { .. })
    }
}

// 플러그인 안에서 다른 플러그인을 호출할 때 `?`로 전파하기 위한 변환
impl From<PluginError> for pluggable_foundation::Error {
    fn from(err: PluginError) -> Self {
        match err {
            PluginError::NotFound(id) => Self::NotFound(format!("plugin {}", id)),
            PluginError::Invocation { source, .. } => source,
            other => Self::Internal(other.to_string()),
        }
    }
}
