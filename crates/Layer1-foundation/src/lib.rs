//! # pluggable-foundation
//!
//! Foundation layer for Pluggable:
//! - Error: 공통 에러 타입 (플러그인 훅, capability 연산, 설정)
//! - Config: 통합 설정 (PluggableConfig, 글로벌 + 프로젝트 병합)
//! - Storage: JsonStore (설정 파일 저장/로드)
//! - Environment: 실행 환경 태그 감지 (development / production)

pub mod config;
pub mod env_detect;
pub mod error;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{PluggableConfig, PLUGGABLE_CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::JsonStore;

// ============================================================================
// Environment Detection (환경 감지)
// ============================================================================
pub use env_detect::{RuntimeEnvironment, ENV_PLUGGABLE_ENV};
