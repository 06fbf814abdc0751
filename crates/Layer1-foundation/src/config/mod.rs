//! Config - 통합 설정 관리
//!
//! - `pluggable.rs` - PluggableConfig (환경 태그, 훅 타임아웃, 로그 레벨)

mod pluggable;

pub use pluggable::{PluggableConfig, PLUGGABLE_CONFIG_FILE};
