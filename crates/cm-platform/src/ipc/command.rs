use tokio::sync::oneshot;
use cm_app::usecases::PopupQuery;
use cm_core::{MenuTarget, SnippetScope, UserSettings};

use crate::runtime::ControlResponse;

/// Inbound requests from the host shell, already decoded from the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    /// 重建右键菜单
    RebuildMenu,
    /// 拉取片段（菜单范围会刷新缓存）
    FetchSnippets {
        scope: SnippetScope,
        query: PopupQuery,
    },
    /// 断开连接并清空本地状态
    ClearState,
    /// 验证并保存 API key
    Connect { api_key: String },
    /// 保存服务地址与用户设置
    UpdateSettings {
        endpoint: Option<String>,
        settings: UserSettings,
    },
    /// 用户点击了菜单项
    SelectMenuEntry(MenuTarget),
    /// 关闭
    Shutdown,
}

impl ControlMessage {
    pub fn name(&self) -> &'static str {
        match self {
            ControlMessage::RebuildMenu => "rebuild_menu",
            ControlMessage::FetchSnippets { .. } => "fetch_snippets",
            ControlMessage::ClearState => "clear_state",
            ControlMessage::Connect { .. } => "connect",
            ControlMessage::UpdateSettings { .. } => "update_settings",
            ControlMessage::SelectMenuEntry(_) => "select_menu_entry",
            ControlMessage::Shutdown => "shutdown",
        }
    }
}

/// A message plus the channel its response goes back on.
#[derive(Debug)]
pub struct ControlRequest {
    pub message: ControlMessage,
    pub reply: oneshot::Sender<ControlResponse>,
}
