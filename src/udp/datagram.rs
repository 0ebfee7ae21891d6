use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum::{Checksum, PseudoHeader};
use crate::error::PacketError;
use crate::traits::TransportHeader;

header_field_range_accessors! {
    (source_port, source_port_mut, 0..2),
    (dest_port, dest_port_mut, 2..4),
    (length, length_mut, 4..6),
    (cksum, cksum_mut, 6..8),
}

// Offset of the checksum field inside the header.
const CHECKSUM_FIELD: usize = 6;

pub const UDP_HEADER_LEN: usize = 8;

/// A view of an RFC 768 datagram over the leading `chunk_end` bytes of a
/// buffer.
///
/// `chunk_end` is the transport chunk's byte length inside the buffer:
/// the capture-relative bound the owner derives from its IP header, never
/// the raw buffer length. The pseudo-header, when given, feeds the
/// checksum engine.
#[derive(Debug)]
pub struct UdpDatagram<T> {
    buf: T,
    chunk_end: usize,
    pseudo_header: Option<PseudoHeader>,
}

impl<T: AsRef<[u8]>> UdpDatagram<T> {
    pub fn new(
        buf: T,
        pseudo_header: Option<PseudoHeader>,
        chunk_end: usize,
    ) -> Result<Self, PacketError> {
        if chunk_end < UDP_HEADER_LEN || chunk_end > buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        let dgram = UdpDatagram {
            buf,
            chunk_end,
            pseudo_header,
        };
        if usize::from(dgram.length()) < UDP_HEADER_LEN {
            return Err(PacketError::InvalidHeaderLength {
                len: dgram.length().into(),
            });
        }
        Ok(dgram)
    }

    #[inline]
    pub fn source_port(&self) -> u16 {
        NetworkEndian::read_u16(source_port(self.buf.as_ref()))
    }

    #[inline]
    pub fn dest_port(&self) -> u16 {
        NetworkEndian::read_u16(dest_port(self.buf.as_ref()))
    }

    /// The length field: header plus payload bytes, minimum 8.
    #[inline]
    pub fn length(&self) -> u16 {
        NetworkEndian::read_u16(length(self.buf.as_ref()))
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(cksum(self.buf.as_ref()))
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        UDP_HEADER_LEN
    }

    /// End of header up to the chunk bound.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf.as_ref()[UDP_HEADER_LEN..self.chunk_end]
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> UdpDatagram<T> {
    #[inline]
    pub fn set_source_port(&mut self, value: u16) {
        NetworkEndian::write_u16(source_port_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_dest_port(&mut self, value: u16) {
        NetworkEndian::write_u16(dest_port_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_length(&mut self, value: u16) {
        NetworkEndian::write_u16(length_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(cksum_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let chunk_end = self.chunk_end;
        &mut self.buf.as_mut()[UDP_HEADER_LEN..chunk_end]
    }

    /// Write the data extent, zero-filling the remainder; fails with
    /// [`PacketError::OversizedField`] past the chunk bound.
    pub fn set_data(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        let extent = self.data_mut();
        if bytes.len() > extent.len() {
            return Err(PacketError::OversizedField {
                size: bytes.len(),
                limit: extent.len(),
            });
        }
        extent[..bytes.len()].copy_from_slice(bytes);
        for byte in extent[bytes.len()..].iter_mut() {
            *byte = 0;
        }
        Ok(())
    }

    /// The checksum engine over `[0, chunk_end)` with the field at
    /// offset 6, fed by the owning IP header's pseudo-header.
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

impl<T: AsRef<[u8]>> TransportHeader for UdpDatagram<T> {
    fn source_port(&self) -> u16 {
        UdpDatagram::source_port(self)
    }

    fn dest_port(&self) -> u16 {
        UdpDatagram::dest_port(self)
    }

    fn checksum(&self) -> u16 {
        UdpDatagram::checksum(self)
    }

    fn header_len(&self) -> usize {
        UdpDatagram::header_len(self)
    }
}
