//! 단위 테스트용 플러그인

use super::capability::{Capability, Transformer};
use super::lifecycle::HookPhase;
use super::manifest::PluginManifest;
use super::traits::{Plugin, PluginContext};
use async_trait::async_trait;
use pluggable_foundation::{Error, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// 훅 호출 횟수를 세는 항등 변환 플러그인 (기본: enabled = false)
pub(crate) struct StubPlugin {
    manifest: PluginManifest,
    fail_on: Option<HookPhase>,
    activations: AtomicUsize,
    deactivations: AtomicUsize,
    destroys: AtomicUsize,
}

impl StubPlugin {
    pub fn new(id: &str) -> Self {
        Self {
            manifest: PluginManifest::new(id, id).with_enabled(false),
            fail_on: None,
            activations: AtomicUsize::new(0),
            deactivations: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
        }
    }

    pub fn depends_on(mut self, id: &str) -> Self {
        self.manifest = self.manifest.with_dependency(id);
        self
    }

    pub fn enabled(mut self) -> Self {
        self.manifest = self.manifest.with_enabled(true);
        self
    }

    pub fn failing(mut self, phase: HookPhase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    pub fn activations(&self) -> usize {
        self.activations.load(Ordering::SeqCst)
    }

    pub fn deactivations(&self) -> usize {
        self.deactivations.load(Ordering::SeqCst)
    }

    pub fn destroys(&self) -> usize {
        self.destroys.load(Ordering::SeqCst)
    }

    fn check(&self, phase: HookPhase) -> Result<()> {
        if self.fail_on == Some(phase) {
            return Err(Error::Internal(format!("{} failed", phase)));
        }
        Ok(())
    }
}

#[async_trait]
impl Transformer for StubPlugin {
    async fn transform(&self, data: Value) -> Result<Value> {
        Ok(data)
    }
}

#[async_trait]
impl Plugin for StubPlugin {
    fn manifest(&self) -> PluginManifest {
        self.manifest.clone()
    }

    fn capability(&self) -> Capability<'_> {
        Capability::Transform(self)
    }

    async fn on_init(&self, _ctx: &PluginContext) -> Result<()> {
        self.check(HookPhase::Init)
    }

    async fn on_activate(&self, _ctx: &PluginContext) -> Result<()> {
        self.activations.fetch_add(1, Ordering::SeqCst);
        self.check(HookPhase::Activate)
    }

    async fn on_deactivate(&self, _ctx: &PluginContext) -> Result<()> {
        self.deactivations.fetch_add(1, Ordering::SeqCst);
        self.check(HookPhase::Deactivate)
    }

    async fn on_destroy(&self, _ctx: &PluginContext) -> Result<()> {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        self.check(HookPhase::Destroy)
    }
}
