use serde::{Deserialize, Serialize};
use serde_json::Value;
use cm_app::usecases::PopupQuery;
use cm_core::{SnippetScope, UserSettings};
use cm_platform::ipc::{ControlMessage, HostEvent};
use cm_platform::runtime::{ControlError, ControlResponse};

/// `scope` field of `fetchSnippets`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WireScope {
    #[default]
    Menu,
    All,
}

impl From<WireScope> for SnippetScope {
    fn from(scope: WireScope) -> Self {
        match scope {
            WireScope::Menu => SnippetScope::MenuEligible,
            WireScope::All => SnippetScope::All,
        }
    }
}

/// A request line, minus its `requestId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action")]
pub enum InboundMessage {
    #[serde(rename = "updateContextMenu", alias = "refreshContextMenu")]
    UpdateContextMenu,

    #[serde(rename = "fetchSnippets", alias = "getSnippets", alias = "listSnippets")]
    FetchSnippets {
        #[serde(default)]
        scope: WireScope,
        #[serde(default)]
        query: Option<String>,
    },

    #[serde(rename = "clearState")]
    ClearState,

    #[serde(rename = "connect")]
    Connect {
        #[serde(rename = "apiKey")]
        api_key: String,
    },

    #[serde(rename = "updateSettings")]
    UpdateSettings {
        #[serde(rename = "webAppUrl", default)]
        web_app_url: Option<String>,
        #[serde(default)]
        settings: UserSettings,
    },

    #[serde(rename = "menuClicked")]
    MenuClicked {
        #[serde(rename = "menuItemId")]
        menu_item_id: String,
    },
}

impl InboundMessage {
    /// Everything except `MenuClicked`, whose entry id has to be resolved
    /// against the published menu first.
    pub fn into_control(self) -> Result<ControlMessage, String> {
        Ok(match self {
            InboundMessage::UpdateContextMenu => ControlMessage::RebuildMenu,
            InboundMessage::FetchSnippets { scope, query } => ControlMessage::FetchSnippets {
                scope: scope.into(),
                query: PopupQuery { search: query },
            },
            InboundMessage::ClearState => ControlMessage::ClearState,
            InboundMessage::Connect { api_key } => ControlMessage::Connect { api_key },
            InboundMessage::UpdateSettings {
                web_app_url,
                settings,
            } => ControlMessage::UpdateSettings {
                endpoint: web_app_url,
                settings,
            },
            InboundMessage::MenuClicked { menu_item_id } => return Err(menu_item_id),
        })
    }
}

/// Split a raw line into its `requestId` and decoded message.
///
/// The id is recovered even when the message itself is malformed, so the
/// failure response can still be correlated.
pub fn parse_request(line: &str) -> (Option<Value>, Result<InboundMessage, ControlError>) {
    let mut value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => return (None, Err(ControlError::Failed(format!("Invalid JSON: {e}")))),
    };

    let request_id = value
        .as_object_mut()
        .and_then(|obj| obj.remove("requestId"))
        .filter(|id| !id.is_null());

    let message = serde_json::from_value(value)
        .map_err(|e| ControlError::Failed(format!("Invalid request: {e}")));
    (request_id, message)
}

/// Response line: `{"type":"response","requestId":..,"success":..,"status":..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseLine {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Value>,
    #[serde(flatten)]
    pub response: ControlResponse,
}

impl ResponseLine {
    pub fn new(request_id: Option<Value>, response: ControlResponse) -> Self {
        Self {
            kind: "response",
            request_id,
            response,
        }
    }
}

/// Anything written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeOutput {
    Response(ResponseLine),
    Event(HostEvent),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_aliases_default_to_menu_scope() {
        for action in ["fetchSnippets", "getSnippets", "listSnippets"] {
            let (id, message) = parse_request(&format!(r#"{{"action":"{action}"}}"#));
            assert!(id.is_none());
            assert_eq!(
                message.unwrap(),
                InboundMessage::FetchSnippets {
                    scope: WireScope::Menu,
                    query: None
                }
            );
        }
    }

    #[test]
    fn test_request_id_is_split_off() {
        let (id, message) =
            parse_request(r#"{"action":"fetchSnippets","scope":"all","query":"sig","requestId":7}"#);
        assert_eq!(id, Some(json!(7)));

        let control = message.unwrap().into_control().unwrap();
        assert_eq!(
            control,
            ControlMessage::FetchSnippets {
                scope: SnippetScope::All,
                query: PopupQuery {
                    search: Some("sig".to_string())
                },
            }
        );
    }

    #[test]
    fn test_unknown_action_keeps_request_id() {
        let (id, message) = parse_request(r#"{"action":"selfDestruct","requestId":"r1"}"#);
        assert_eq!(id, Some(json!("r1")));
        assert!(matches!(message, Err(ControlError::Failed(_))));
    }

    #[test]
    fn test_invalid_json_is_a_failure() {
        let (id, message) = parse_request("{not json");
        assert!(id.is_none());
        assert!(message.is_err());
    }

    #[test]
    fn test_update_settings_fields() {
        let (_, message) = parse_request(
            r#"{"action":"updateSettings","webAppUrl":"http://localhost:3000","settings":{"showSharedSnippets":false}}"#,
        );
        match message.unwrap().into_control().unwrap() {
            ControlMessage::UpdateSettings { endpoint, settings } => {
                assert_eq!(endpoint.as_deref(), Some("http://localhost:3000"));
                assert!(!settings.show_shared_snippets);
                assert!(settings.show_snippet_preview);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_menu_clicked_needs_resolution() {
        let (_, message) =
            parse_request(r#"{"action":"menuClicked","menuItemId":"clickmemory-setup"}"#);
        assert_eq!(
            message.unwrap().into_control(),
            Err("clickmemory-setup".to_string())
        );
    }

    #[test]
    fn test_response_line_shape() {
        let line = BridgeOutput::Response(ResponseLine::new(
            Some(json!("r1")),
            ControlResponse::failure(ControlError::RebuildInProgress),
        ));
        assert_eq!(
            serde_json::to_value(&line).unwrap(),
            json!({
                "type": "response",
                "requestId": "r1",
                "success": false,
                "status": "rebuild_in_progress",
                "error": "Context menu creation already in progress"
            })
        );
    }
}
