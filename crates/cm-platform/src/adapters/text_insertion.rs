use anyhow::Result;
use async_trait::async_trait;
use cm_core::ports::TextInsertionPort;

use crate::ipc::HostEvent;
use crate::runtime::HostEventSender;

/// Asks the host to insert text into the focused element.
pub struct ChannelTextInsertion {
    events: HostEventSender,
}

impl ChannelTextInsertion {
    pub fn new(events: HostEventSender) -> Self {
        Self { events }
    }
}

#[async_trait]
impl TextInsertionPort for ChannelTextInsertion {
    async fn insert_text(&self, text: &str) -> Result<()> {
        self.events
            .send(HostEvent::InsertText {
                text: text.to_string(),
            })
            .await
            .map_err(|_| anyhow::anyhow!("host event channel closed"))
    }
}
