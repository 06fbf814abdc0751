//! pluggable-core: Core Runtime for Pluggable
//!
//! Layer2 - 플러그인 라이프사이클 레이어
//!
//! # 주요 모듈
//!
//! - `plugin`: 디스크립터, 상태 머신, 의존성 가드, 레지스트리/매니저, 기능 뷰, 이벤트
//! - `plugin::builtin`: 기본 제공 플러그인 (대문자 변환, 길이 검증, JSON/HTML 포맷, 사칙연산)
//! - `pipeline`: 변환 → 검증 → 포맷 파이프라인
//!
//! # 사용 예시
//!
//! ```ignore
//! use pluggable_core::{builtin, Pipeline, PluginManager};
//!
//! let manager = PluginManager::new();
//! builtin::register_all(&manager).await;
//!
//! let outcome = Pipeline::new(manager.clone()).run("hello").await?;
//! println!("{:?}", outcome.output());
//!
//! // 의존자가 active면 비활성화 불가
//! assert!(manager.deactivate("json-formatter").await.is_err());
//! ```

pub mod pipeline;
pub mod plugin;

/// 크레이트 버전
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-exports: Plugin
pub use plugin::{
    builtin,
    // Capability
    Capability,
    CapabilityKind,
    // Events
    EventBus,
    EventType,
    Formatter,
    // Lifecycle
    HookPhase,
    LastError,
    // Manager
    ManagerHandle,
    Operation,
    // Traits
    Plugin,
    PluginConfig,
    PluginContext,
    // Descriptor / Views
    PluginDescriptor,
    // Errors
    PluginError,
    PluginEvent,
    PluginEventHandler,
    PluginHandle,
    PluginManager,
    PluginManagerConfig,
    // Manifest
    PluginManifest,
    PluginResult,
    PluginStatus,
    PluginSummary,
    PluginVersion,
    Transformer,
    Transition,
    TransitionOptions,
    ValidationReport,
    Validator,
};

// Re-exports: Pipeline
pub use pipeline::{Pipeline, PipelineOutcome};
