//! Plugin Events - 라이프사이클 이벤트 시스템
//!
//! 매니저는 레지스트리 락을 놓은 뒤에 이벤트를 발행합니다. 같은 ID의 전이
//! 게이트는 잡힌 상태일 수 있으므로, 핸들러 안에서 발행한 플러그인의 전이를
//! 동기적으로 기다리면 안 됩니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

// ============================================================================
// PluginEvent - 플러그인 이벤트 타입
// ============================================================================

/// 플러그인 이벤트
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginEvent {
    /// 이벤트 ID
    pub event_id: Uuid,

    /// 이벤트 타입
    pub event_type: EventType,

    /// 대상 플러그인
    pub plugin_id: String,

    /// 이벤트 데이터
    pub data: Value,

    /// 타임스탬프
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// 소스 (이벤트 발생 위치)
    pub source: String,
}

impl PluginEvent {
    /// 새 이벤트 생성
    pub fn new(event_type: EventType, plugin_id: impl Into<String>, data: Value) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            event_type,
            plugin_id: plugin_id.into(),
            data,
            timestamp: chrono::Utc::now(),
            source: "plugin_manager".to_string(),
        }
    }

    /// 데이터 없는 이벤트
    pub fn simple(event_type: EventType, plugin_id: impl Into<String>) -> Self {
        Self::new(event_type, plugin_id, Value::Null)
    }
}

/// 이벤트 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Registered,
    Initialized,
    Activated,
    Deactivated,
    Failed,
    Unregistered,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Registered,
        EventType::Initialized,
        EventType::Activated,
        EventType::Deactivated,
        EventType::Failed,
        EventType::Unregistered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Initialized => "initialized",
            Self::Activated => "activated",
            Self::Deactivated => "deactivated",
            Self::Failed => "failed",
            Self::Unregistered => "unregistered",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PluginEventHandler - 이벤트 핸들러 트레이트
// ============================================================================

/// 이벤트 핸들러 트레이트
#[async_trait]
pub trait PluginEventHandler: Send + Sync {
    /// 핸들러 이름
    fn name(&self) -> &str;

    /// 관심 있는 이벤트 타입들
    fn interested_events(&self) -> Vec<EventType> {
        EventType::ALL.to_vec()
    }

    /// 이벤트 처리
    async fn handle(&self, event: &PluginEvent);
}

// ============================================================================
// EventBus - 이벤트 버스 (발행/구독)
// ============================================================================

/// 이벤트 버스 - 이벤트 발행 및 구독 관리
pub struct EventBus {
    /// 브로드캐스트 채널 발신자
    sender: broadcast::Sender<PluginEvent>,

    /// 등록된 핸들러
    handlers: RwLock<HashMap<String, Arc<dyn PluginEventHandler>>>,

    /// 이벤트 히스토리 (최근 N개)
    history: RwLock<VecDeque<PluginEvent>>,

    /// 히스토리 최대 크기
    history_size: usize,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new() -> Self {
        Self::with_capacity(256, 100)
    }

    /// 용량 지정하여 생성
    pub fn with_capacity(channel_capacity: usize, history_size: usize) -> Self {
        let (sender, _) = broadcast::channel(channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::with_capacity(history_size)),
            history_size,
        }
    }

    /// 이벤트 핸들러 등록 (같은 이름이면 교체)
    pub async fn register_handler(&self, handler: Arc<dyn PluginEventHandler>) {
        let name = handler.name().to_string();
        let mut handlers = self.handlers.write().await;
        handlers.insert(name, handler);
    }

    /// 이벤트 핸들러 제거
    pub async fn unregister_handler(&self, name: &str) -> bool {
        let mut handlers = self.handlers.write().await;
        handlers.remove(name).is_some()
    }

    /// 이벤트 발행
    pub async fn publish(&self, event: PluginEvent) {
        debug!(plugin = %event.plugin_id, event = %event.event_type, "Publishing event");

        if self.history_size > 0 {
            let mut history = self.history.write().await;
            if history.len() >= self.history_size {
                history.pop_front();
            }
            history.push_back(event.clone());
        }

        // 구독자가 없어도 OK
        let _ = self.sender.send(event.clone());

        let handlers: Vec<_> = {
            let handlers = self.handlers.read().await;
            handlers.values().cloned().collect()
        };
        for handler in handlers {
            if handler.interested_events().contains(&event.event_type) {
                handler.handle(&event).await;
            }
        }
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<PluginEvent> {
        self.sender.subscribe()
    }

    /// 이벤트 히스토리 조회
    pub async fn history(&self) -> Vec<PluginEvent> {
        let history = self.history.read().await;
        history.iter().cloned().collect()
    }

    /// 특정 타입의 이벤트 히스토리 조회
    pub async fn history_by_type(&self, event_type: EventType) -> Vec<PluginEvent> {
        let history = self.history.read().await;
        history
            .iter()
            .filter(|e| e.event_type == event_type)
            .cloned()
            .collect()
    }

    /// 특정 플러그인의 이벤트 타입 순서
    pub async fn timeline(&self, plugin_id: &str) -> Vec<EventType> {
        let history = self.history.read().await;
        history
            .iter()
            .filter(|e| e.plugin_id == plugin_id)
            .map(|e| e.event_type)
            .collect()
    }

    /// 등록된 핸들러 수
    pub async fn handler_count(&self) -> usize {
        let handlers = self.handlers.read().await;
        handlers.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
