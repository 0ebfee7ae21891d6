use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum::{Checksum, PseudoHeader};
use crate::error::PacketError;
use crate::options::write_options;
use crate::traits::TransportHeader;

header_field_val_accessors! {
    (data_off, data_off_mut, 12),
    (flags, flags_mut, 13),
}

header_field_range_accessors! {
    (source_port, source_port_mut, 0..2),
    (dest_port, dest_port_mut, 2..4),
    (seq_num, seq_num_mut, 4..8),
    (ack_num, ack_num_mut, 8..12),
    (win_size, win_size_mut, 14..16),
    (cksum, cksum_mut, 16..18),
    (urgent, urgent_mut, 18..20),
}

const FLG_FIN: u8 = 0x01;
const FLG_SYN: u8 = 0x01 << 1;
const FLG_RST: u8 = 0x01 << 2;
const FLG_PSH: u8 = 0x01 << 3;
const FLG_ACK: u8 = 0x01 << 4;
const FLG_URG: u8 = 0x01 << 5;
const FLG_ECE: u8 = 0x01 << 6;
const FLG_CWR: u8 = 0x01 << 7;

// Offset of the checksum field inside the header.
const CHECKSUM_FIELD: usize = 16;

pub const TCP_HEADER_LEN: usize = 20;

pub const TCP_HEADER_LEN_MAX: usize = 60;

/// A view of an RFC 793 segment over the leading `chunk_end` bytes of a
/// buffer.
///
/// `chunk_end` is the transport chunk's byte length, derived by the owner
/// from its IP header; the data extent and the checksum range both stop
/// there, never at the raw buffer end.
#[derive(Debug)]
pub struct TcpSegment<T> {
    buf: T,
    chunk_end: usize,
    pseudo_header: Option<PseudoHeader>,
}

impl<T: AsRef<[u8]>> TcpSegment<T> {
    pub fn new(
        buf: T,
        pseudo_header: Option<PseudoHeader>,
        chunk_end: usize,
    ) -> Result<Self, PacketError> {
        if chunk_end < TCP_HEADER_LEN || chunk_end > buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        let segment = TcpSegment {
            buf,
            chunk_end,
            pseudo_header,
        };
        if segment.header_len() < TCP_HEADER_LEN {
            return Err(PacketError::InvalidHeaderLength {
                len: segment.header_len(),
            });
        }
        if segment.header_len() > chunk_end {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        Ok(segment)
    }

    #[inline]
    pub fn source_port(&self) -> u16 {
        NetworkEndian::read_u16(source_port(self.buf.as_ref()))
    }

    #[inline]
    pub fn dest_port(&self) -> u16 {
        NetworkEndian::read_u16(dest_port(self.buf.as_ref()))
    }

    #[inline]
    pub fn seq_number(&self) -> u32 {
        NetworkEndian::read_u32(seq_num(self.buf.as_ref()))
    }

    #[inline]
    pub fn ack_number(&self) -> u32 {
        NetworkEndian::read_u32(ack_num(self.buf.as_ref()))
    }

    /// Header length in bytes, decoded from the data-offset nibble.
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(*data_off(self.buf.as_ref()) >> 4) * 4
    }

    #[inline]
    pub fn fin(&self) -> bool {
        self.flag(FLG_FIN)
    }

    #[inline]
    pub fn syn(&self) -> bool {
        self.flag(FLG_SYN)
    }

    #[inline]
    pub fn rst(&self) -> bool {
        self.flag(FLG_RST)
    }

    #[inline]
    pub fn psh(&self) -> bool {
        self.flag(FLG_PSH)
    }

    #[inline]
    pub fn ack(&self) -> bool {
        self.flag(FLG_ACK)
    }

    #[inline]
    pub fn urg(&self) -> bool {
        self.flag(FLG_URG)
    }

    #[inline]
    pub fn ece(&self) -> bool {
        self.flag(FLG_ECE)
    }

    #[inline]
    pub fn cwr(&self) -> bool {
        self.flag(FLG_CWR)
    }

    #[inline]
    pub fn window_size(&self) -> u16 {
        NetworkEndian::read_u16(win_size(self.buf.as_ref()))
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(cksum(self.buf.as_ref()))
    }

    #[inline]
    pub fn urgent_ptr(&self) -> u16 {
        NetworkEndian::read_u16(urgent(self.buf.as_ref()))
    }

    /// The options+padding tail, empty for a 20-byte header.
    #[inline]
    pub fn options(&self) -> &[u8] {
        &self.buf.as_ref()[TCP_HEADER_LEN..self.header_len()]
    }

    /// Computed header end up to the chunk bound.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf.as_ref()[self.header_len()..self.chunk_end]
    }

    #[inline]
    fn flag(&self, mask: u8) -> bool {
        *flags(self.buf.as_ref()) & mask != 0
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> TcpSegment<T> {
    #[inline]
    pub fn set_source_port(&mut self, value: u16) {
        NetworkEndian::write_u16(source_port_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_dest_port(&mut self, value: u16) {
        NetworkEndian::write_u16(dest_port_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_seq_number(&mut self, value: u32) {
        NetworkEndian::write_u32(seq_num_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_ack_number(&mut self, value: u32) {
        NetworkEndian::write_u32(ack_num_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_header_len(&mut self, value: usize) {
        assert!(value >= TCP_HEADER_LEN && value <= TCP_HEADER_LEN_MAX && value % 4 == 0);
        let data = data_off_mut(self.buf.as_mut());
        *data = (*data & 0x0f) | (((value / 4) as u8) << 4);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        *flags_mut(self.buf.as_mut()) = 0;
    }

    #[inline]
    pub fn set_fin(&mut self, value: bool) {
        self.set_flag(FLG_FIN, value)
    }

    #[inline]
    pub fn set_syn(&mut self, value: bool) {
        self.set_flag(FLG_SYN, value)
    }

    #[inline]
    pub fn set_rst(&mut self, value: bool) {
        self.set_flag(FLG_RST, value)
    }

    #[inline]
    pub fn set_psh(&mut self, value: bool) {
        self.set_flag(FLG_PSH, value)
    }

    #[inline]
    pub fn set_ack(&mut self, value: bool) {
        self.set_flag(FLG_ACK, value)
    }

    #[inline]
    pub fn set_urg(&mut self, value: bool) {
        self.set_flag(FLG_URG, value)
    }

    #[inline]
    pub fn set_ece(&mut self, value: bool) {
        self.set_flag(FLG_ECE, value)
    }

    #[inline]
    pub fn set_cwr(&mut self, value: bool) {
        self.set_flag(FLG_CWR, value)
    }

    #[inline]
    pub fn set_window_size(&mut self, value: u16) {
        NetworkEndian::write_u16(win_size_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(cksum_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_urgent_ptr(&mut self, value: u16) {
        NetworkEndian::write_u16(urgent_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut [u8] {
        let header_len = self.header_len();
        &mut self.buf.as_mut()[TCP_HEADER_LEN..header_len]
    }

    /// Write the options tail, zero-padding to the next 4-byte boundary;
    /// fails with [`PacketError::OversizedField`] past the capacity.
    pub fn set_options(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        write_options(self.options_mut(), bytes)
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        let header_len = self.header_len();
        let chunk_end = self.chunk_end;
        &mut self.buf.as_mut()[header_len..chunk_end]
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
    /// offset 16, fed by the owning IP header's pseudo-header.
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

    #[inline]
    fn set_flag(&mut self, mask: u8, value: bool) {
        let data = flags_mut(self.buf.as_mut());
        if value {
            *data |= mask;
        } else {
            *data &= !mask;
        }
    }
}

impl<T: AsRef<[u8]>> TransportHeader for TcpSegment<T> {
    fn source_port(&self) -> u16 {
        TcpSegment::source_port(self)
    }

    fn dest_port(&self) -> u16 {
        TcpSegment::dest_port(self)
    }

    fn checksum(&self) -> u16 {
        TcpSegment::checksum(self)
    }

    fn header_len(&self) -> usize {
        TcpSegment::header_len(self)
    }
}
