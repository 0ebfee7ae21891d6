//! UDP protocol.

mod datagram;
pub use datagram::{UdpDatagram, UDP_HEADER_LEN};
