//! Menu Builder
//! 菜单构建器
//!
//! Derives the quick-insert menu from the cached snippet set. At most one
//! rebuild runs at a time; overlapping requests are dropped, not queued.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, error, info, info_span, Instrument};
use cm_core::menu::MenuEntry;
use cm_core::ports::MenuSurfacePort;
use cm_core::{MenuState, MenuTarget, SnippetSet};

use super::guard::RebuildGuard;
use crate::state::ExtensionState;

/// Result of a [`MenuBuilder::rebuild_menu`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildOutcome {
    /// The menu now shows this state. Failures surface as [`MenuState::Error`].
    Rebuilt(MenuState),
    /// Another rebuild held the guard; nothing was touched.
    Skipped,
}

impl RebuildOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, RebuildOutcome::Skipped)
    }
}

pub struct MenuBuilder {
    state: Arc<ExtensionState>,
    surface: Arc<dyn MenuSurfacePort>,
    guard: RebuildGuard,
}

impl MenuBuilder {
    pub fn new(state: Arc<ExtensionState>, surface: Arc<dyn MenuSurfacePort>) -> Self {
        Self {
            state,
            surface,
            guard: RebuildGuard::new(),
        }
    }

    /// Whether a rebuild currently holds the guard.
    pub fn is_building(&self) -> bool {
        self.guard.is_building()
    }

    /// Rebuild the menu from the cache.
    ///
    /// ## Behavior / 行为
    /// - Guard held: returns `Skipped` immediately, no side effects
    /// - Clears every entry, then reads credential presence and the cache
    /// - Renders setup / no-snippets / parent + children
    /// - Persists the rendered snippets as the selection snapshot (empty for
    ///   setup / no-snippets / error)
    /// - Any failure: menu reset to a single error entry
    ///
    /// Never returns an error. The guard is released on every path.
    pub async fn rebuild_menu(&self) -> RebuildOutcome {
        // Acquired before the first await; dropped at the end of this fn.
        let Some(_permit) = self.guard.try_acquire() else {
            debug!("Menu rebuild already in progress, skipping");
            return RebuildOutcome::Skipped;
        };

        let span = info_span!("usecase.rebuild_menu.execute");
        async {
            match self.build().await {
                Ok(menu) => {
                    info!(state = menu.kind(), "Menu rebuilt");
                    RebuildOutcome::Rebuilt(menu)
                }
                Err(e) => {
                    error!(error = %format!("{e:#}"), "Menu rebuild failed, showing error entry");
                    self.show_error().await;
                    RebuildOutcome::Rebuilt(MenuState::Error)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn build(&self) -> Result<MenuState> {
        self.surface
            .remove_all()
            .await
            .context("failed to clear menu entries")?;

        let credential_present = self
            .state
            .has_credential()
            .await
            .context("failed to read credential")?;
        let snippets = self
            .state
            .cached_snippets()
            .await
            .context("failed to read cached snippets")?;

        let menu = MenuState::derive(credential_present, &snippets);
        for entry in menu.entries() {
            let id = entry.id.clone();
            self.surface
                .create(entry)
                .await
                .with_context(|| format!("failed to create menu entry {id}"))?;
        }

        // Selections resolve against this snapshot; informational menus hold none.
        let rendered = match menu {
            MenuState::Snippets(_) => snippets,
            _ => SnippetSet::empty(),
        };
        self.state
            .replace_menu_snippets(&rendered)
            .await
            .context("failed to persist menu snapshot")?;

        self.surface
            .commit()
            .await
            .context("failed to publish menu")?;
        Ok(menu)
    }

    /// Best effort. A failure here is logged and swallowed. The snapshot is
    /// emptied first so nothing stale stays selectable.
    async fn show_error(&self) {
        if let Err(e) = self.state.replace_menu_snippets(&SnippetSet::empty()).await {
            error!(error = %e, "Failed to clear menu snapshot");
        }

        let result: Result<()> = async {
            self.surface.remove_all().await?;
            for entry in MenuState::Error.entries() {
                self.surface.create(entry).await?;
            }
            self.surface.commit().await
        }
        .await;

        if let Err(e) = result {
            error!(
                error = %format!("{e:#}"),
                entry = %MenuTarget::Error.entry_id(),
                "Failed to show error menu entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cm_core::ports::KeyValueStorePort;
    use cm_core::{Credential, Endpoint, Snippet};
    use cm_infra::store::InMemoryKeyValueStore;
    use mockall::mock;

    mock! {
        pub Surface {}

        #[async_trait]
        impl MenuSurfacePort for Surface {
            async fn remove_all(&self) -> anyhow::Result<()>;
            async fn create(&self, entry: MenuEntry) -> anyhow::Result<()>;
            async fn commit(&self) -> anyhow::Result<()>;
        }
    }

    async fn seeded_state() -> Arc<ExtensionState> {
        let store: Arc<dyn KeyValueStorePort> = Arc::new(InMemoryKeyValueStore::new());
        let state = Arc::new(ExtensionState::new(store, Endpoint::new("https://app.test")));
        state
            .set_credential(&Credential::new("sk_live_test"))
            .await
            .unwrap();
        state
            .replace_cached_snippets(&SnippetSet::new(vec![Snippet {
                id: "a".into(),
                title: "Hello".to_string(),
                content: "Hello, world".to_string(),
                is_shared: false,
                is_menu_eligible: true,
            }]))
            .await
            .unwrap();
        state
    }

    #[tokio::test]
    async fn test_entry_failure_falls_back_to_error_entry() {
        let state = seeded_state().await;

        let mut surface = MockSurface::new();
        surface.expect_remove_all().times(2).returning(|| Ok(()));
        surface.expect_create().returning(|entry| match entry.target {
            Some(MenuTarget::Snippet(_)) => Err(anyhow::anyhow!("duplicate id")),
            _ => Ok(()),
        });
        surface.expect_commit().times(1).returning(|| Ok(()));

        let builder = MenuBuilder::new(state.clone(), Arc::new(surface));
        let outcome = builder.rebuild_menu().await;

        assert_eq!(outcome, RebuildOutcome::Rebuilt(MenuState::Error));
        assert!(!builder.is_building());
        assert!(state.menu_snippets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failing_error_entry_is_swallowed_and_guard_released() {
        let state = seeded_state().await;

        let mut surface = MockSurface::new();
        surface
            .expect_remove_all()
            .times(2)
            .returning(|| Err(anyhow::anyhow!("host gone")));
        surface.expect_create().never();
        surface.expect_commit().never();

        let builder = MenuBuilder::new(state, Arc::new(surface));

        assert_eq!(
            builder.rebuild_menu().await,
            RebuildOutcome::Rebuilt(MenuState::Error)
        );
        assert!(!builder.is_building());
    }

    #[tokio::test]
    async fn test_error_fallback_empties_previous_snapshot() {
        let state = seeded_state().await;
        let previous = state.cached_snippets().await.unwrap();
        state.replace_menu_snippets(&previous).await.unwrap();

        let mut surface = MockSurface::new();
        surface.expect_remove_all().returning(|| Ok(()));
        surface.expect_create().returning(|entry| match entry.target {
            Some(MenuTarget::Snippet(_)) => Err(anyhow::anyhow!("host rejected entry")),
            _ => Ok(()),
        });
        surface.expect_commit().returning(|| Ok(()));

        let builder = MenuBuilder::new(state.clone(), Arc::new(surface));

        assert_eq!(
            builder.rebuild_menu().await,
            RebuildOutcome::Rebuilt(MenuState::Error)
        );
        assert!(state.menu_snippets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_snippets_rebuild_empties_previous_snapshot() {
        let state = seeded_state().await;
        let previous = state.cached_snippets().await.unwrap();
        state.replace_menu_snippets(&previous).await.unwrap();
        state.replace_cached_snippets(&SnippetSet::empty()).await.unwrap();

        let mut surface = MockSurface::new();
        surface.expect_remove_all().times(1).returning(|| Ok(()));
        surface.expect_create().times(1).returning(|_| Ok(()));
        surface.expect_commit().times(1).returning(|| Ok(()));

        let builder = MenuBuilder::new(state.clone(), Arc::new(surface));

        assert_eq!(
            builder.rebuild_menu().await,
            RebuildOutcome::Rebuilt(MenuState::NoSnippets)
        );
        assert!(state.menu_snippets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_rebuild_persists_snapshot() {
        let state = seeded_state().await;

        let mut surface = MockSurface::new();
        surface.expect_remove_all().times(1).returning(|| Ok(()));
        surface.expect_create().times(2).returning(|_| Ok(()));
        surface.expect_commit().times(1).returning(|| Ok(()));

        let builder = MenuBuilder::new(state.clone(), Arc::new(surface));
        let outcome = builder.rebuild_menu().await;

        assert!(matches!(outcome, RebuildOutcome::Rebuilt(MenuState::Snippets(ref items)) if items.len() == 1));
        assert_eq!(
            state.menu_snippets().await.unwrap(),
            state.cached_snippets().await.unwrap()
        );
    }
}
