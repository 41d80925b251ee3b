//! Configuration surface backed by the host shell
//! 由宿主提供的配置页面

use anyhow::Result;
use cm_core::ports::UiPort;

use crate::ipc::HostEvent;
use crate::runtime::HostEventSender;

#[derive(Debug, Clone)]
pub struct ChannelUiPort {
    events: HostEventSender,
}

impl ChannelUiPort {
    pub fn new(events: HostEventSender) -> Self {
        Self { events }
    }
}

#[async_trait::async_trait]
impl UiPort for ChannelUiPort {
    async fn open_configuration(&self, url: &str) -> Result<()> {
        self.events
            .send(HostEvent::OpenUrl {
                url: url.to_string(),
            })
            .await
            .map_err(|_| anyhow::anyhow!("host event channel closed"))
    }
}
