//! TCP protocol.

mod segment;
pub use segment::{TcpSegment, TCP_HEADER_LEN, TCP_HEADER_LEN_MAX};
