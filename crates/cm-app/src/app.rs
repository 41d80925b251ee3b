//! The assembled application: shared state, use cases and triggers.

use std::sync::Arc;

use crate::deps::AppDeps;
use crate::state::ExtensionState;
use crate::telemetry::Tracker;
use crate::triggers::{PeriodicSync, StorageChangeDebouncer};
use crate::usecases::*;

/// Application runtime.
///
/// Every use case shares one [`ExtensionState`] and one [`MenuBuilder`], so
/// all rebuild paths go through the same guard.
pub struct App {
    pub state: Arc<ExtensionState>,
    pub menu_builder: Arc<MenuBuilder>,
    pub sync_snippets: Arc<SyncSnippets>,
    pub fetch_snippets: Arc<FetchSnippets>,
    pub list_popup_snippets: Arc<ListPopupSnippets>,
    pub handle_menu_selection: Arc<HandleMenuSelection>,
    pub connect: Arc<Connect>,
    pub clear_state: Arc<ClearState>,
    pub update_settings: Arc<UpdateSettings>,
    pub initialize_store: Arc<InitializeStore>,
    pub periodic_sync: Arc<PeriodicSync>,
    pub storage_change: Arc<StorageChangeDebouncer>,
}

impl App {
    /// This constructor signature is the dependency manifest.
    /// 这个构造函数签名就是依赖清单。
    pub fn new(deps: AppDeps) -> Self {
        let state = Arc::new(ExtensionState::new(deps.store, deps.default_endpoint));
        let tracker = Arc::new(Tracker::new(state.clone(), deps.telemetry));

        let menu_builder = Arc::new(MenuBuilder::new(state.clone(), deps.menu_surface));
        let sync_snippets = Arc::new(SyncSnippets::new(
            state.clone(),
            deps.snippet_source.clone(),
            tracker.clone(),
        ));

        Self {
            fetch_snippets: Arc::new(FetchSnippets::new(
                state.clone(),
                deps.snippet_source.clone(),
                sync_snippets.clone(),
                menu_builder.clone(),
            )),
            list_popup_snippets: Arc::new(ListPopupSnippets::new(state.clone())),
            handle_menu_selection: Arc::new(HandleMenuSelection::new(
                state.clone(),
                deps.text_insertion,
                deps.ui_port,
                tracker.clone(),
            )),
            connect: Arc::new(Connect::new(
                state.clone(),
                deps.snippet_source,
                sync_snippets.clone(),
                menu_builder.clone(),
                tracker,
            )),
            clear_state: Arc::new(ClearState::new(state.clone(), menu_builder.clone())),
            update_settings: Arc::new(UpdateSettings::new(state.clone())),
            initialize_store: Arc::new(InitializeStore::new(state.clone())),
            periodic_sync: Arc::new(PeriodicSync::new(
                sync_snippets.clone(),
                menu_builder.clone(),
                deps.refresh_interval,
            )),
            storage_change: Arc::new(StorageChangeDebouncer::new(
                menu_builder.clone(),
                deps.storage_change_debounce,
            )),
            state,
            menu_builder,
            sync_snippets,
        }
    }

    /// Startup sequence: defaults, periodic timer, storage listener, first rebuild.
    ///
    /// Returns the listener task handle.
    pub async fn start(&self) -> anyhow::Result<tokio::task::JoinHandle<()>> {
        self.initialize_store.execute().await?;
        self.periodic_sync.start().await;
        let listener = self
            .storage_change
            .clone()
            .spawn_listener(self.state.subscribe());
        self.menu_builder.rebuild_menu().await;
        Ok(listener)
    }

    pub async fn shutdown(&self) {
        self.periodic_sync.stop().await;
    }
}
