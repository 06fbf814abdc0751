//! Plugin Lifecycle - 상태 머신과 훅 실행기
//!
//! ```text
//! registered ──▶ initialized ──▶ active ⇄ inactive
//!      │              │            │         │
//!      └──────────────┴─────┬──────┴─────────┘
//!                           ▼
//!                         error
//! ```
//!
//! `error`에서 나가는 간선은 없습니다. 제거(unregister)는 상태가 아니라
//! 레지스트리에서의 삭제입니다.

use super::error::{PluginError, PluginResult};
use chrono::{DateTime, Utc};
use pluggable_foundation::{Error, Result};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

// ============================================================================
// PluginStatus
// ============================================================================

/// 플러그인 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginStatus {
    /// 레지스트리에 저장됨, on_init 실행 전
    Registered,
    /// on_init 성공
    Initialized,
    /// 활성화됨 (파이프라인에서 호출 가능)
    Active,
    /// 비활성화됨
    Inactive,
    /// 훅 실패
    Error,
}

impl PluginStatus {
    /// 모든 상태
    pub const ALL: [PluginStatus; 5] = [
        PluginStatus::Registered,
        PluginStatus::Initialized,
        PluginStatus::Active,
        PluginStatus::Inactive,
        PluginStatus::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Initialized => "initialized",
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Error => "error",
        }
    }

    /// 상태 머신에 정의된 간선인지
    pub fn can_transition_to(&self, to: PluginStatus) -> bool {
        use PluginStatus::*;

        match (self, to) {
            (_, Error) => true,
            (Registered, Initialized) => true,
            (Initialized | Inactive, Active) => true,
            (Active, Inactive) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for PluginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// HookPhase
// ============================================================================

/// 라이프사이클 훅 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HookPhase {
    Init,
    Activate,
    Deactivate,
    Destroy,
}

impl HookPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Destroy => "destroy",
        }
    }
}

impl std::fmt::Display for HookPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Transition / LastError
// ============================================================================

/// 훅 실행 중인 전이 (레지스트리 락 밖에서 훅이 도는 동안 표시)
///
/// - `Activate` 중인 플러그인은 의존성의 비활성화/제거를 막습니다.
/// - `Deactivate` 중인 플러그인은 의존성으로서 충족되지 않은 것으로 봅니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    #[serde(rename = "activating")]
    Activate,
    #[serde(rename = "deactivating")]
    Deactivate,
}

/// 마지막 실패 기록 (`status = error`인 동안만 존재)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastError {
    pub phase: HookPhase,
    pub message: String,
    pub occurred_at: DateTime<Utc>,
}

impl LastError {
    pub fn new(phase: HookPhase, message: impl Into<String>) -> Self {
        Self {
            phase,
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }
}

// ============================================================================
// TransitionOptions / HookRunner
// ============================================================================

/// 호출자가 지정하는 훅 실행 옵션
#[derive(Debug, Clone, Default)]
pub struct TransitionOptions {
    /// 훅 하나당 제한 시간 (없으면 매니저 기본값)
    pub timeout: Option<Duration>,

    /// 취소 토큰
    pub cancel: Option<CancellationToken>,
}

impl TransitionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// 훅 실행기 - 타임아웃과 취소를 HookFailure로 변환
pub(crate) struct HookRunner {
    plugin_id: String,
    timeout: Option<Duration>,
    cancel: Option<CancellationToken>,
}

impl HookRunner {
    pub(crate) fn new(
        plugin_id: impl Into<String>,
        options: &TransitionOptions,
        default_timeout: Option<Duration>,
    ) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            timeout: options.timeout.or(default_timeout),
            cancel: options.cancel.clone(),
        }
    }

    /// 훅 실행
    pub(crate) async fn run<F>(&self, phase: HookPhase, hook: F) -> PluginResult<()>
    where
        F: Future<Output = Result<()>> + Send,
    {
        let bounded = async {
            match self.timeout {
                Some(limit) => match tokio::time::timeout(limit, hook).await {
                    Ok(result) => result,
                    Err(_) => Err(Error::Timeout(format!(
                        "{} hook exceeded {}ms",
                        phase,
                        limit.as_millis()
                    ))),
                },
                None => hook.await,
            }
        };

        let result = match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(Error::Cancelled),
                    result = bounded => result,
                }
            }
            None => bounded.await,
        };

        result.map_err(|source| PluginError::hook(&self.plugin_id, phase, source))
    }
}
