// HostEvent 只描述宿主需要执行的动作，不暴露内部实现。
// 一旦定义，就是对外协议。

use serde::Serialize;
use cm_core::MenuEntry;

/// Outbound instructions for the host shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostEvent {
    /// Replace the rendered menu with these entries (parent first).
    MenuUpdated { entries: Vec<MenuEntry> },

    /// Insert text at the focused editable element.
    InsertText { text: String },

    /// Open a configuration page.
    OpenUrl { url: String },
}
