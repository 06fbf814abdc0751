//! # Plugin System
//!
//! 플러그인 라이프사이클 매니저
//!
//! ## 개요
//!
//! 이미 프로세스 안에 있는 플러그인 객체를 받아서:
//! - 상태 머신으로 라이프사이클을 추적하고 (`registered → initialized → active ⇄ inactive`, `error`)
//! - 활성화/비활성화/제거 전에 의존성 가드를 검사하고
//! - 기능(변환/검증/포맷/연산)별로 active 플러그인을 조회하게 합니다
//!
//! ## 아키텍처
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      PluginManager                           │
//! │  ┌────────────────────────────────────────────────────────┐ │
//! │  │         RwLock<PluginRegistry>  (ID -> PluginEntry)     │ │
//! │  │  ┌──────────────┬──────────────┬──────────────────┐    │ │
//! │  │  │ json (active)│ html (active)│ upper (inactive) │    │ │
//! │  │  │ gate: Mutex  │ gate: Mutex  │ gate: Mutex      │    │ │
//! │  │  └──────────────┴──────────────┴──────────────────┘    │ │
//! │  └────────────────────────────────────────────────────────┘ │
//! │        │ graph (가드)          │ HookRunner (timeout/cancel) │
//! │        ▼                       ▼                             │
//! │   EventBus  ◀── registered / activated / failed ...          │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 예시
//!
//! ```ignore
//! let manager = PluginManager::new();
//! manager.register(Arc::new(JsonFormatter::new())).await?;
//! manager.register(Arc::new(HtmlFormatter::new())).await?;
//!
//! for formatter in manager.formatters().await {
//!     println!("{}", formatter.format(&json!({"a": 1})).await?);
//! }
//! ```

pub mod builtin;
mod capability;
mod descriptor;
mod error;
mod events;
mod graph;
mod lifecycle;
mod manager;
mod manifest;
mod registry;
mod traits;
mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use capability::{
    Capability, CapabilityKind, Formatter, Operation, Transformer, ValidationReport, Validator,
};
pub use descriptor::PluginDescriptor;
pub use error::{PluginError, PluginResult};
pub use events::{EventBus, EventType, PluginEvent, PluginEventHandler};
pub use lifecycle::{HookPhase, LastError, PluginStatus, Transition, TransitionOptions};
pub use manager::{ManagerHandle, PluginManager, PluginManagerConfig, PluginSummary};
pub use manifest::{PluginConfig, PluginManifest, PluginVersion};
pub use traits::{Plugin, PluginContext};
pub use views::PluginHandle;
