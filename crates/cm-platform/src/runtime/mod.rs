mod event_bus;
mod response;
#[allow(clippy::module_inception)]
mod runtime;

pub use event_bus::{
    control_channel, host_event_channel, ControlReceiver, ControlSender, HostEventReceiver,
    HostEventSender,
};
pub use response::{ControlError, ControlResponse, ControlStatus};
pub use runtime::{ExtensionRuntime, RuntimeHandle};
