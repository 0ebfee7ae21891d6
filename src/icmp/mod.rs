//! ICMP protocol, RFC 792 echo-family subset.

enum_sim! {
    /// ICMP message types recognized by this codec; any other raw value
    /// simply carries through.
    pub struct IcmpType (u8) {
        ECHO_REPLY = 0,
        DEST_UNREACHABLE = 3,
        ECHO_REQUEST = 8,
        TIME_EXCEEDED = 11,
    }
}

/// Decoded code byte of a destination-unreachable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestUnreachableReason {
    NetworkUnreachable,
    HostUnreachable,
    ProtocolUnreachable,
    PortUnreachable,
    FragmentNeededAndDontFragmentWasSet,
    SourceRouteFailed,
    /// Not a destination-unreachable message, or an unrecognized code.
    None,
}

impl DestUnreachableReason {
    pub(crate) fn from_code(code: u8) -> DestUnreachableReason {
        match code {
            0 => DestUnreachableReason::NetworkUnreachable,
            1 => DestUnreachableReason::HostUnreachable,
            2 => DestUnreachableReason::ProtocolUnreachable,
            3 => DestUnreachableReason::PortUnreachable,
            4 => DestUnreachableReason::FragmentNeededAndDontFragmentWasSet,
            5 => DestUnreachableReason::SourceRouteFailed,
            _ => DestUnreachableReason::None,
        }
    }

    pub(crate) fn code(&self) -> Option<u8> {
        match self {
            DestUnreachableReason::NetworkUnreachable => Some(0),
            DestUnreachableReason::HostUnreachable => Some(1),
            DestUnreachableReason::ProtocolUnreachable => Some(2),
            DestUnreachableReason::PortUnreachable => Some(3),
            DestUnreachableReason::FragmentNeededAndDontFragmentWasSet => Some(4),
            DestUnreachableReason::SourceRouteFailed => Some(5),
            DestUnreachableReason::None => None,
        }
    }
}

/// Decoded code byte of a time-exceeded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeExceededReason {
    TimeToLiveExceededInTransit,
    FragmentReassemblyTimeExceeded,
    /// Not a time-exceeded message, or an unrecognized code.
    None,
}

impl TimeExceededReason {
    pub(crate) fn from_code(code: u8) -> TimeExceededReason {
        match code {
            0 => TimeExceededReason::TimeToLiveExceededInTransit,
            1 => TimeExceededReason::FragmentReassemblyTimeExceeded,
            _ => TimeExceededReason::None,
        }
    }

    pub(crate) fn code(&self) -> Option<u8> {
        match self {
            TimeExceededReason::TimeToLiveExceededInTransit => Some(0),
            TimeExceededReason::FragmentReassemblyTimeExceeded => Some(1),
            TimeExceededReason::None => None,
        }
    }
}

mod message;
pub use message::{IcmpMessage, ICMP_HEADER_LEN};
