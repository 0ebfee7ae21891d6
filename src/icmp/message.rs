use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum::{Checksum, PseudoHeader};
use crate::error::PacketError;
use crate::traits::TransportHeader;

use super::{DestUnreachableReason, IcmpType, TimeExceededReason};

header_field_val_accessors! {
    (type_, type_mut, 0),
    (code, code_mut, 1),
}

header_field_range_accessors! {
    (cksum, cksum_mut, 2..4),
    (ident, ident_mut, 4..6),
    (seq_num, seq_num_mut, 6..8),
}

// Offset of the checksum field inside the header.
const CHECKSUM_FIELD: usize = 2;

// The fixed fields end here; the reported header length is larger.
const ICMP_FIXED_FIELDS_END: usize = 8;

/// Reported header length; the identifier/sequence words count toward the
/// header for checksum purposes.
pub const ICMP_HEADER_LEN: usize = 16;

/// A view of an RFC 792 echo-family message over the leading `chunk_end`
/// bytes of a buffer.
///
/// ICMP carries no ports; the port accessors read 0 and their setters do
/// nothing. ICMPv4 sums no pseudo-header, so callers normally pass `None`.
#[derive(Debug)]
pub struct IcmpMessage<T> {
    buf: T,
    chunk_end: usize,
    pseudo_header: Option<PseudoHeader>,
}

impl<T: AsRef<[u8]>> IcmpMessage<T> {
    pub fn new(
        buf: T,
        pseudo_header: Option<PseudoHeader>,
        chunk_end: usize,
    ) -> Result<Self, PacketError> {
        if chunk_end < ICMP_FIXED_FIELDS_END || chunk_end > buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        Ok(IcmpMessage {
            buf,
            chunk_end,
            pseudo_header,
        })
    }

    #[inline]
    pub fn icmp_type(&self) -> IcmpType {
        IcmpType::from(*type_(self.buf.as_ref()))
    }

    #[inline]
    pub fn code(&self) -> u8 {
        *code(self.buf.as_ref())
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(cksum(self.buf.as_ref()))
    }

    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(ident(self.buf.as_ref()))
    }

    #[inline]
    pub fn seq_num(&self) -> u16 {
        NetworkEndian::read_u16(seq_num(self.buf.as_ref()))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        ICMP_HEADER_LEN
    }

    /// None unless the message is destination-unreachable.
    pub fn dest_unreachable_reason(&self) -> DestUnreachableReason {
        if self.icmp_type() != IcmpType::DEST_UNREACHABLE {
            return DestUnreachableReason::None;
        }
        DestUnreachableReason::from_code(self.code())
    }

    /// None unless the message is time-exceeded.
    pub fn time_exceeded_reason(&self) -> TimeExceededReason {
        if self.icmp_type() != IcmpType::TIME_EXCEEDED {
            return TimeExceededReason::None;
        }
        TimeExceededReason::from_code(self.code())
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> IcmpMessage<T> {
    #[inline]
    pub fn set_icmp_type(&mut self, value: IcmpType) {
        *type_mut(self.buf.as_mut()) = value.into();
    }

    #[inline]
    pub fn set_code(&mut self, value: u8) {
        *code_mut(self.buf.as_mut()) = value;
    }

    /// ICMP carries no ports; the write is discarded.
    #[inline]
    pub fn set_source_port(&mut self, _value: u16) {}

    /// ICMP carries no ports; the write is discarded.
    #[inline]
    pub fn set_dest_port(&mut self, _value: u16) {}

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(cksum_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(ident_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_seq_num(&mut self, value: u16) {
        NetworkEndian::write_u16(seq_num_mut(self.buf.as_mut()), value)
    }

    /// Write the code byte; does nothing unless the message is already
    /// destination-unreachable.
    pub fn set_dest_unreachable_reason(&mut self, value: DestUnreachableReason) {
        if self.icmp_type() != IcmpType::DEST_UNREACHABLE {
            return;
        }
        if let Some(code) = value.code() {
            self.set_code(code);
        }
    }

    /// Write the code byte; does nothing unless the message is already
    /// time-exceeded.
    pub fn set_time_exceeded_reason(&mut self, value: TimeExceededReason) {
        if self.icmp_type() != IcmpType::TIME_EXCEEDED {
            return;
        }
        if let Some(code) = value.code() {
            self.set_code(code);
        }
    }

    /// The checksum engine over `[0, chunk_end)` with the field at
    /// offset 2.
    pub fn checksum_engine(&mut self) -> Checksum<'_> {
        let end = self.chunk_end;
        let pseudo_header = self.pseudo_header;
        Checksum::new(self.buf.as_mut(), end, CHECKSUM_FIELD, pseudo_header)
    }

    #[inline]
    pub fn verify_checksum(&mut self) -> bool {
        self.checksum_engine().verify()
    }

    #[inline]
    pub fn adjust_checksum(&mut self) {
        self.checksum_engine().apply()
    }

    #[inline]
    pub fn clear_checksum(&mut self) {
        self.checksum_engine().clear()
    }
}

impl<T: AsRef<[u8]>> TransportHeader for IcmpMessage<T> {
    /// ICMP carries no ports.
    fn source_port(&self) -> u16 {
        0
    }

    fn dest_port(&self) -> u16 {
        0
    }

    fn checksum(&self) -> u16 {
        IcmpMessage::checksum(self)
    }

    fn header_len(&self) -> usize {
        IcmpMessage::header_len(self)
    }
}
