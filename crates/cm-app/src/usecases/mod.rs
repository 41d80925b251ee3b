pub mod clear_state;
pub mod connect;
pub mod fetch_snippets;
pub mod handle_menu_selection;
pub mod initialize_store;
pub mod list_popup_snippets;
pub mod menu;
pub mod sync_snippets;
pub mod update_settings;

pub use clear_state::ClearState;
pub use connect::{Connect, ConnectError};
pub use fetch_snippets::{FetchOutcome, FetchSnippets, FetchedSnippets};
pub use handle_menu_selection::{HandleMenuSelection, SelectionOutcome};
pub use initialize_store::InitializeStore;
pub use list_popup_snippets::{ListPopupSnippets, PopupQuery, SnippetPreview};
pub use menu::{MenuBuilder, RebuildGuard, RebuildOutcome};
pub use sync_snippets::{SyncOutcome, SyncSnippets};
pub use update_settings::UpdateSettings;
