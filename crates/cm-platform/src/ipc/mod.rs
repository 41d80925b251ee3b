mod command;
mod event;

pub use command::{ControlMessage, ControlRequest};
pub use event::HostEvent;
