//! Hand-written port fakes shared by the cm-app integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cm_app::{App, AppDeps};
use cm_core::menu::MenuEntry;
use cm_core::ports::{
    MenuSurfacePort, SnippetSourcePort, TelemetryEvent, TelemetryPort, TextInsertionPort, UiPort,
};
use cm_core::{
    Credential, Endpoint, InstallId, Snippet, SnippetPage, SnippetScope, SyncError,
};
use cm_infra::store::InMemoryKeyValueStore;
use tokio::sync::Notify;

pub const DEFAULT_ENDPOINT: &str = "https://app.test";

pub fn valid_key() -> String {
    format!("sk_live_{}", "a".repeat(64))
}

pub fn snippet(id: &str, title: &str, content: &str) -> Snippet {
    Snippet {
        id: id.into(),
        title: title.to_string(),
        content: content.to_string(),
        is_shared: false,
        is_menu_eligible: true,
    }
}

pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}

// ---------------------------------------------------------------------------
// Snippet source
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Behavior {
    Snippets(Vec<Snippet>),
    Fail(u16),
}

pub struct FakeSnippetSource {
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
    scopes: Mutex<Vec<SnippetScope>>,
    menu_delay: Mutex<Option<Duration>>,
}

impl FakeSnippetSource {
    pub fn new() -> Self {
        Self {
            behavior: Mutex::new(Behavior::Snippets(Vec::new())),
            calls: AtomicUsize::new(0),
            scopes: Mutex::new(Vec::new()),
            menu_delay: Mutex::new(None),
        }
    }

    /// Make menu-eligible fetches take `delay` before answering.
    pub fn delay_menu_fetches(&self, delay: Duration) {
        *self.menu_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_snippets(&self, snippets: Vec<Snippet>) {
        *self.behavior.lock().unwrap() = Behavior::Snippets(snippets);
    }

    pub fn fail_with_status(&self, status: u16) {
        *self.behavior.lock().unwrap() = Behavior::Fail(status);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn scopes(&self) -> Vec<SnippetScope> {
        self.scopes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnippetSourcePort for FakeSnippetSource {
    async fn fetch_snippets(
        &self,
        _credential: &Credential,
        _endpoint: &Endpoint,
        scope: SnippetScope,
    ) -> Result<SnippetPage, SyncError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.scopes.lock().unwrap().push(scope);

        let delay = *self.menu_delay.lock().unwrap();
        if let (SnippetScope::MenuEligible, Some(delay)) = (scope, delay) {
            tokio::time::sleep(delay).await;
        }

        let behavior = self.behavior.lock().unwrap().clone();
        match behavior {
            Behavior::Snippets(all) => {
                let snippets: Vec<Snippet> = match scope {
                    SnippetScope::All => all,
                    SnippetScope::MenuEligible => {
                        all.into_iter().filter(|s| s.is_menu_eligible).collect()
                    }
                };
                Ok(SnippetPage {
                    total_count: Some(snippets.len() as u64),
                    snippets,
                })
            }
            Behavior::Fail(status) => Err(SyncError::Http {
                status,
                message: "Internal error".to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Menu surface
// ---------------------------------------------------------------------------

/// Records entries; `commit` publishes the pending list as the visible menu.
///
/// When built with [`gated`](Self::gated) the first `remove_all` signals
/// `entered` and then blocks until the gate is notified.
pub struct RecordingMenuSurface {
    pending: Mutex<Vec<MenuEntry>>,
    committed: Mutex<Vec<MenuEntry>>,
    remove_all_calls: AtomicUsize,
    commits: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
    pub entered: Arc<Notify>,
}

impl RecordingMenuSurface {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(Vec::new()),
            committed: Mutex::new(Vec::new()),
            remove_all_calls: AtomicUsize::new(0),
            commits: AtomicUsize::new(0),
            gate: Mutex::new(None),
            entered: Arc::new(Notify::new()),
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        let surface = Self::new();
        *surface.gate.lock().unwrap() = Some(gate);
        surface
    }

    pub fn committed(&self) -> Vec<MenuEntry> {
        self.committed.lock().unwrap().clone()
    }

    pub fn committed_ids(&self) -> Vec<String> {
        self.committed().into_iter().map(|e| e.id).collect()
    }

    pub fn remove_all_calls(&self) -> usize {
        self.remove_all_calls.load(Ordering::SeqCst)
    }

    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MenuSurfacePort for RecordingMenuSurface {
    async fn remove_all(&self) -> anyhow::Result<()> {
        self.remove_all_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            self.entered.notify_one();
            gate.notified().await;
        }
        self.pending.lock().unwrap().clear();
        Ok(())
    }

    async fn create(&self, entry: MenuEntry) -> anyhow::Result<()> {
        let mut pending = self.pending.lock().unwrap();
        if pending.iter().any(|e| e.id == entry.id) {
            anyhow::bail!("duplicate menu entry id {}", entry.id);
        }
        pending.push(entry);
        Ok(())
    }

    async fn commit(&self) -> anyhow::Result<()> {
        let pending = self.pending.lock().unwrap().clone();
        let ids: HashSet<&str> = pending.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), pending.len(), "committed menu has duplicate ids");
        *self.committed.lock().unwrap() = pending;
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Host capabilities
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingInserter {
    texts: Mutex<Vec<String>>,
}

impl RecordingInserter {
    pub fn texts(&self) -> Vec<String> {
        self.texts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextInsertionPort for RecordingInserter {
    async fn insert_text(&self, text: &str) -> anyhow::Result<()> {
        self.texts.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingUi {
    urls: Mutex<Vec<String>>,
}

impl RecordingUi {
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UiPort for RecordingUi {
    async fn open_configuration(&self, url: &str) -> anyhow::Result<()> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingTelemetry {
    events: Mutex<Vec<(String, TelemetryEvent)>>,
}

impl RecordingTelemetry {
    pub fn event_names(&self) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|(_, e)| e.name.clone())
            .collect()
    }
}

impl TelemetryPort for RecordingTelemetry {
    fn track(&self, _endpoint: &Endpoint, user_id: &InstallId, event: TelemetryEvent) {
        self.events
            .lock()
            .unwrap()
            .push((user_id.as_str().to_string(), event));
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub app: App,
    pub store: Arc<InMemoryKeyValueStore>,
    pub source: Arc<FakeSnippetSource>,
    pub surface: Arc<RecordingMenuSurface>,
    pub inserter: Arc<RecordingInserter>,
    pub ui: Arc<RecordingUi>,
    pub telemetry: Arc<RecordingTelemetry>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_surface(RecordingMenuSurface::new())
    }

    pub fn with_surface(surface: RecordingMenuSurface) -> Self {
        let store = Arc::new(InMemoryKeyValueStore::new());
        let source = Arc::new(FakeSnippetSource::new());
        let surface = Arc::new(surface);
        let inserter = Arc::new(RecordingInserter::default());
        let ui = Arc::new(RecordingUi::default());
        let telemetry = Arc::new(RecordingTelemetry::default());

        let app = App::new(AppDeps {
            store: store.clone(),
            snippet_source: source.clone(),
            telemetry: telemetry.clone(),
            menu_surface: surface.clone(),
            text_insertion: inserter.clone(),
            ui_port: ui.clone(),
            default_endpoint: Endpoint::new(DEFAULT_ENDPOINT),
            refresh_interval: Duration::from_secs(120),
            storage_change_debounce: Duration::from_millis(500),
        });

        Self {
            app,
            store,
            source,
            surface,
            inserter,
            ui,
            telemetry,
        }
    }

    pub async fn connect_credential(&self) {
        self.app
            .state
            .set_credential(&Credential::new(valid_key()))
            .await
            .unwrap();
    }
}
