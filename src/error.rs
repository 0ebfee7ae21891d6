use thiserror::Error;

/// Structural violations surfaced by view constructors and sized-field
/// setters.
///
/// Checksum mismatch is never an error; it is the `bool` result of the
/// verify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PacketError {
    /// The buffer cannot hold the requested header from the given offset.
    #[error("bad header: buffer too short from offset {offset}")]
    BadHeader {
        /// Base offset the view was requested at.
        offset: usize,
    },

    /// The version nibble names neither IPv4 nor IPv6 and no creation
    /// fallback was requested.
    #[error("illegal ip header type {version}")]
    IllegalHeaderType {
        /// Raw value of the version nibble.
        version: u8,
    },

    /// The declared header length is below the protocol's fixed minimum.
    #[error("invalid header length {len}")]
    InvalidHeaderLength {
        /// Declared length in bytes.
        len: usize,
    },

    /// Caller-supplied bytes exceed the space implied by the header's
    /// length fields.
    #[error("{size} bytes do not fit the available {limit}")]
    OversizedField {
        /// Size of the caller-supplied bytes.
        size: usize,
        /// Capacity of the target extent.
        limit: usize,
    },
}
