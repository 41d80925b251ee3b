use tokio::sync::mpsc;

use crate::ipc::{ControlRequest, HostEvent};

const CHANNEL_CAPACITY: usize = 64;

pub type HostEventSender = mpsc::Sender<HostEvent>;
pub type HostEventReceiver = mpsc::Receiver<HostEvent>;

pub type ControlSender = mpsc::Sender<ControlRequest>;
pub type ControlReceiver = mpsc::Receiver<ControlRequest>;

pub fn host_event_channel() -> (HostEventSender, HostEventReceiver) {
    mpsc::channel(CHANNEL_CAPACITY)
}

pub fn control_channel() -> (ControlSender, ControlReceiver) {
    mpsc::channel(CHANNEL_CAPACITY)
}
