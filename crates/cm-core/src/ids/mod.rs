//! ID type wrappers for type safety.

mod id_macro;
pub mod install_id;
pub mod snippet_id;

pub use install_id::InstallId;
pub use snippet_id::SnippetId;
