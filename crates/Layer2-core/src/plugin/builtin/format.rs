//! 포맷터 플러그인 - JSON, HTML
//!
//! HTML 포맷터는 JSON 포맷터에 의존하며, `on_init`에서 받은 매니저 핸들로
//! 호출 시점마다 JSON 포맷터를 찾아 씁니다.

use crate::plugin::{
    Capability, Formatter, ManagerHandle, Plugin, PluginContext, PluginError, PluginManager,
    PluginManifest, PluginVersion,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use pluggable_foundation::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

// ============================================================================
// JsonFormatter
// ============================================================================

const DEFAULT_INDENT: u64 = 2;
const MAX_INDENT: u64 = 10;

/// JSON 문자열로 포맷 (`indent` 옵션, 0이면 한 줄, 최대 10칸)
pub struct JsonFormatter {
    manifest: PluginManifest,
}

impl JsonFormatter {
    pub const ID: &'static str = "json-formatter";

    pub fn new() -> Self {
        Self::with_indent(DEFAULT_INDENT)
    }

    pub fn with_indent(indent: u64) -> Self {
        Self {
            manifest: PluginManifest::new(Self::ID, "JSON Formatter")
                .with_version(PluginVersion::new(1, 0, 0))
                .with_description("Formats data as a JSON string")
                .with_priority(3)
                .with_option("indent", indent),
        }
    }

    fn indent(&self) -> usize {
        self.manifest
            .config
            .option_u64("indent")
            .unwrap_or(DEFAULT_INDENT)
            .min(MAX_INDENT) as usize
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Formatter for JsonFormatter {
    async fn format(&self, data: &Value) -> Result<String> {
        let indent = self.indent();
        if indent == 0 {
            return Ok(serde_json::to_string(data)?);
        }

        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        data.serialize(&mut serializer)?;

        String::from_utf8(buf).map_err(|e| Error::Internal(e.to_string()))
    }
}

#[async_trait]
impl Plugin for JsonFormatter {
    fn manifest(&self) -> PluginManifest {
        self.manifest.clone()
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Format(self)
    }
}

// ============================================================================
// HtmlFormatter
// ============================================================================

/// JSON 포맷 결과를 `<pre class="code">`로 감쌈
pub struct HtmlFormatter {
    manager: RwLock<Option<ManagerHandle>>,
}

impl HtmlFormatter {
    pub const ID: &'static str = "html-formatter";
    const NAME: &'static str = "HTML Formatter";

    pub fn new() -> Self {
        Self {
            manager: RwLock::new(None),
        }
    }

    fn manager(&self) -> Option<PluginManager> {
        self.manager.read().as_ref().and_then(ManagerHandle::upgrade)
    }
}

impl Default for HtmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Formatter for HtmlFormatter {
    async fn format(&self, data: &Value) -> Result<String> {
        let manager = self
            .manager()
            .ok_or_else(|| Error::Internal(format!("{} is not attached to a manager", Self::NAME)))?;

        let json = manager
            .active_plugin(JsonFormatter::ID)
            .await
            .map_err(|_| {
                Error::NotFound("JSON Formatter plugin is required but not available".to_string())
            })?;

        let text = json.format(data).await?;
        Ok(format!("<pre class=\"code\">{}</pre>", text))
    }
}

#[async_trait]
impl Plugin for HtmlFormatter {
    fn manifest(&self) -> PluginManifest {
        PluginManifest::new(Self::ID, Self::NAME)
            .with_version(PluginVersion::new(1, 0, 0))
            .with_description("Wraps JSON output in an HTML pre tag")
            .with_dependency(JsonFormatter::ID)
            .with_priority(4)
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Format(self)
    }

    async fn on_init(&self, ctx: &PluginContext) -> Result<()> {
        info!(plugin = Self::ID, "[{}] Initializing in {} environment", Self::NAME, ctx.environment);
        *self.manager.write() = Some(ctx.manager.clone());
        Ok(())
    }

    async fn on_activate(&self, _ctx: &PluginContext) -> Result<()> {
        info!(plugin = Self::ID, "[{}] Plugin activated", Self::NAME);
        Ok(())
    }

    async fn on_deactivate(&self, _ctx: &PluginContext) -> Result<()> {
        info!(plugin = Self::ID, "[{}] Plugin deactivated", Self::NAME);
        Ok(())
    }

    async fn on_error(&self, err: &PluginError) -> Result<()> {
        error!(plugin = Self::ID, "[{}] Error: {}", Self::NAME, err);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_json_indent() {
        let pretty = JsonFormatter::new().format(&json!({"a": 1})).await.unwrap();
        assert_eq!(pretty, "{\n  \"a\": 1\n}");

        let compact = JsonFormatter::with_indent(0)
            .format(&json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(compact, "{\"a\":1}");

        let string = JsonFormatter::new().format(&json!("HELLO")).await.unwrap();
        assert_eq!(string, "\"HELLO\"");
    }

    #[tokio::test]
    async fn test_json_indent_is_capped() {
        let expected = format!("{{\n{}\"a\": 1\n}}", " ".repeat(10));

        let wide = JsonFormatter::with_indent(20)
            .format(&json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(wide, expected);

        let huge = JsonFormatter::with_indent(u64::MAX)
            .format(&json!({"a": 1}))
            .await
            .unwrap();
        assert_eq!(huge, expected);
    }

    #[tokio::test]
    async fn test_html_requires_manager() {
        let err = HtmlFormatter::new().format(&json!(1)).await.unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[tokio::test]
    async fn test_html_wraps_json() {
        let manager = PluginManager::new();
        manager.register(Arc::new(JsonFormatter::new())).await.unwrap();
        manager.register(Arc::new(HtmlFormatter::new())).await.unwrap();

        let html = manager.active_plugin(HtmlFormatter::ID).await.unwrap();
        let output = html.format(&json!({"a": 1})).await.unwrap();
        assert_eq!(output, "<pre class=\"code\">{\n  \"a\": 1\n}</pre>");
    }

    #[tokio::test]
    async fn test_html_fails_once_json_is_gone() {
        let manager = PluginManager::new();
        let html = Arc::new(HtmlFormatter::new());
        manager.register(Arc::new(JsonFormatter::new())).await.unwrap();
        manager.register(html.clone()).await.unwrap();

        manager.deactivate(HtmlFormatter::ID).await.unwrap();
        manager.deactivate(JsonFormatter::ID).await.unwrap();

        let err = html.format(&json!(1)).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
