//! Plugin Descriptor - 한 플러그인의 읽기 전용 스냅샷

use super::capability::CapabilityKind;
use super::lifecycle::{LastError, PluginStatus, Transition};
use super::manifest::PluginManifest;
use serde::Serialize;

/// 플러그인 디스크립터
///
/// 조회 시점의 매니페스트와 상태를 복사한 값입니다. 이후 레지스트리가 바뀌어도
/// 이 값은 바뀌지 않습니다.
#[derive(Debug, Clone, Serialize)]
pub struct PluginDescriptor {
    #[serde(flatten)]
    pub manifest: PluginManifest,

    /// 기능 종류 (등록 시 고정)
    pub capability: CapabilityKind,

    /// 현재 상태
    pub status: PluginStatus,

    /// 마지막 실패 (`status = error`일 때만)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<LastError>,

    /// 진행 중인 전이
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<Transition>,

    /// 등록 순서
    pub load_order: u64,
}

impl PluginDescriptor {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn dependencies(&self) -> &[String] {
        &self.manifest.dependencies
    }

    pub fn priority(&self) -> i32 {
        self.manifest.config.priority
    }

    pub fn is_active(&self) -> bool {
        self.status == PluginStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_serializes_flat() {
        let descriptor = PluginDescriptor {
            manifest: PluginManifest::new("json-formatter", "JSON Formatter").with_priority(3),
            capability: CapabilityKind::Format,
            status: PluginStatus::Active,
            last_error: None,
            pending: None,
            load_order: 3,
        };

        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["id"], "json-formatter");
        assert_eq!(json["capability"], "format");
        assert_eq!(json["status"], "active");
        assert!(json.get("last_error").is_none());
        assert_eq!(descriptor.priority(), 3);
        assert!(descriptor.is_active());
    }
}
