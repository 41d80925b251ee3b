//! JSON-lines bridge to the host shell
//! 与宿主外壳之间的 JSON 行协议
//!
//! One JSON object per line on stdin (requests) and stdout (responses and
//! host events). Nothing else may be written to stdout.

mod protocol;
mod stdio;

pub use protocol::{parse_request, BridgeOutput, InboundMessage, ResponseLine, WireScope};
pub use stdio::run_bridge;
