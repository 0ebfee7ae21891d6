use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum::{Checksum, PseudoHeader};
use crate::error::PacketError;
use crate::options::write_options;

use super::{IpProtocol, Ipv4Addr, Precedence};

header_field_val_accessors! {
    (ver_ihl, ver_ihl_mut, 0),
    (tos, tos_mut, 1),
    (time_to_live, time_to_live_mut, 8),
    (protocol, protocol_mut, 9),
}

header_field_range_accessors! {
    (total_len, total_len_mut, 2..4),
    (ident, ident_mut, 4..6),
    (flags_frag, flags_frag_mut, 6..8),
    (cksum, cksum_mut, 10..12),
    (src_ip, src_ip_mut, 12..16),
    (dst_ip, dst_ip_mut, 16..20),
}

const TOS_LOW_DELAY: u8 = 0b0001_0000;
const TOS_HIGH_THROUGHPUT: u8 = 0b0000_1000;
const TOS_HIGH_RELIABILITY: u8 = 0b0000_0100;
const TOS_MIN_MONETARY_COST: u8 = 0b0000_0010;

const FLG_DONT_FRAG: u8 = 0x40;
const FLG_MORE_FRAGS: u8 = 0x20;

// Offset of the header checksum field inside the header.
const CHECKSUM_FIELD: usize = 10;

pub const IPV4_HEADER_LEN: usize = 20;

pub const IPV4_HEADER_LEN_MAX: usize = 60;

pub const IPV4_HEADER_TEMPLATE: Ipv4Header<[u8; IPV4_HEADER_LEN]> = Ipv4Header {
    buf: [
        0x45, 0x00, 0x00, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00,
    ],
};

/// A view of an RFC 791 header over the leading bytes of a buffer.
#[derive(Clone, Copy, Debug)]
pub struct Ipv4Header<T> {
    pub(crate) buf: T,
}

impl<T: AsRef<[u8]>> Ipv4Header<T> {
    /// Build a view, validating that the buffer covers the declared
    /// header length and that the declared length is structurally sound.
    #[inline]
    pub fn new(buf: T) -> Result<Self, PacketError> {
        if buf.as_ref().len() < IPV4_HEADER_LEN {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        let header = Ipv4Header { buf };
        if header.header_len() < IPV4_HEADER_LEN {
            return Err(PacketError::InvalidHeaderLength {
                len: header.header_len(),
            });
        }
        if header.header_len() > header.buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        Ok(header)
    }

    #[inline]
    pub fn new_unchecked(buf: T) -> Self {
        Ipv4Header { buf }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[0..IPV4_HEADER_LEN]
    }

    #[inline]
    pub fn to_owned(&self) -> Ipv4Header<[u8; IPV4_HEADER_LEN]> {
        let mut buf = [0; IPV4_HEADER_LEN];
        buf.copy_from_slice(self.as_bytes());
        Ipv4Header { buf }
    }

    #[inline]
    pub fn check_version(&self) -> bool {
        (self.buf.as_ref()[0] >> 4) == 4
    }

    /// Header length in bytes, decoded from the IHL nibble.
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(*ver_ihl(self.buf.as_ref()) & 0x0f) * 4
    }

    #[inline]
    pub fn total_len(&self) -> u16 {
        NetworkEndian::read_u16(total_len(self.buf.as_ref()))
    }

    #[inline]
    pub fn precedence(&self) -> Precedence {
        Precedence::from(*tos(self.buf.as_ref()) >> 5)
    }

    #[inline]
    pub fn low_delay(&self) -> bool {
        self.tos_flag(TOS_LOW_DELAY)
    }

    #[inline]
    pub fn high_throughput(&self) -> bool {
        self.tos_flag(TOS_HIGH_THROUGHPUT)
    }

    #[inline]
    pub fn high_reliability(&self) -> bool {
        self.tos_flag(TOS_HIGH_RELIABILITY)
    }

    #[inline]
    pub fn min_monetary_cost(&self) -> bool {
        self.tos_flag(TOS_MIN_MONETARY_COST)
    }

    #[inline]
    pub fn ident(&self) -> u16 {
        NetworkEndian::read_u16(ident(self.buf.as_ref()))
    }

    #[inline]
    pub fn dont_frag(&self) -> bool {
        flags_frag(self.buf.as_ref())[0] & FLG_DONT_FRAG != 0
    }

    /// More-fragments flag; reads false whenever don't-fragment is set.
    #[inline]
    pub fn more_frags(&self) -> bool {
        !self.dont_frag() && flags_frag(self.buf.as_ref())[0] & FLG_MORE_FRAGS != 0
    }

    /// 13-bit fragment offset; reads 0 whenever don't-fragment is set.
    #[inline]
    pub fn frag_offset(&self) -> u16 {
        if self.dont_frag() {
            return 0;
        }
        NetworkEndian::read_u16(flags_frag(self.buf.as_ref())) & 0x1fff
    }

    #[inline]
    pub fn time_to_live(&self) -> u8 {
        *time_to_live(self.buf.as_ref())
    }

    #[inline]
    pub fn protocol(&self) -> IpProtocol {
        IpProtocol::from(*protocol(self.buf.as_ref()))
    }

    #[inline]
    pub fn checksum(&self) -> u16 {
        NetworkEndian::read_u16(cksum(self.buf.as_ref()))
    }

    #[inline]
    pub fn source_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from_bytes(src_ip(self.buf.as_ref()))
    }

    #[inline]
    pub fn dest_ip(&self) -> Ipv4Addr {
        Ipv4Addr::from_bytes(dst_ip(self.buf.as_ref()))
    }

    /// The options+padding tail, empty for a 20-byte header.
    #[inline]
    pub fn options(&self) -> &[u8] {
        &self.buf.as_ref()[IPV4_HEADER_LEN..self.header_len()]
    }

    /// The 12-byte pseudo-header covering the transport chunk this header
    /// carries.
    pub fn pseudo_header(&self) -> PseudoHeader {
        let mut bytes = [0u8; 12];
        bytes[0..4].copy_from_slice(src_ip(self.buf.as_ref()));
        bytes[4..8].copy_from_slice(dst_ip(self.buf.as_ref()));
        bytes[9] = *protocol(self.buf.as_ref());
        let chunk_len = self.total_len().saturating_sub(self.header_len() as u16);
        NetworkEndian::write_u16(&mut bytes[10..12], chunk_len);
        PseudoHeader::V4(bytes)
    }

    #[inline]
    fn tos_flag(&self, mask: u8) -> bool {
        *tos(self.buf.as_ref()) & mask != 0
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv4Header<T> {
    #[inline]
    pub fn adjust_version(&mut self) {
        let data = ver_ihl_mut(self.buf.as_mut());
        *data = (*data & 0x0f) | (4 << 4);
    }

    #[inline]
    pub fn set_header_len(&mut self, value: usize) {
        assert!(value >= IPV4_HEADER_LEN && value <= IPV4_HEADER_LEN_MAX && value % 4 == 0);
        let data = ver_ihl_mut(self.buf.as_mut());
        *data = (*data & 0xf0) | (value / 4) as u8;
    }

    #[inline]
    pub fn set_total_len(&mut self, value: u16) {
        NetworkEndian::write_u16(total_len_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_precedence(&mut self, value: Precedence) {
        let data = tos_mut(self.buf.as_mut());
        *data = (*data & 0x1f) | (u8::from(value) << 5);
    }

    #[inline]
    fn set_tos_flag(&mut self, mask: u8, value: bool) {
        let data = tos_mut(self.buf.as_mut());
        if value {
            *data |= mask;
        } else {
            *data &= !mask;
        }
    }

    #[inline]
    pub fn set_low_delay(&mut self, value: bool) {
        self.set_tos_flag(TOS_LOW_DELAY, value)
    }

    #[inline]
    pub fn set_high_throughput(&mut self, value: bool) {
        self.set_tos_flag(TOS_HIGH_THROUGHPUT, value)
    }

    #[inline]
    pub fn set_high_reliability(&mut self, value: bool) {
        self.set_tos_flag(TOS_HIGH_RELIABILITY, value)
    }

    #[inline]
    pub fn set_min_monetary_cost(&mut self, value: bool) {
        self.set_tos_flag(TOS_MIN_MONETARY_COST, value)
    }

    #[inline]
    pub fn set_ident(&mut self, value: u16) {
        NetworkEndian::write_u16(ident_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_dont_frag(&mut self, value: bool) {
        let data = flags_frag_mut(self.buf.as_mut());
        if value {
            data[0] |= FLG_DONT_FRAG;
        } else {
            data[0] &= !FLG_DONT_FRAG;
        }
    }

    /// No-op while don't-fragment is set.
    #[inline]
    pub fn set_more_frags(&mut self, value: bool) {
        if self.dont_frag() {
            return;
        }
        let data = flags_frag_mut(self.buf.as_mut());
        if value {
            data[0] |= FLG_MORE_FRAGS;
        } else {
            data[0] &= !FLG_MORE_FRAGS;
        }
    }

    /// No-op while don't-fragment is set.
    #[inline]
    pub fn set_frag_offset(&mut self, value: u16) {
        assert!(value <= 0x1fff);
        if self.dont_frag() {
            return;
        }
        let data = flags_frag_mut(self.buf.as_mut());
        let write_value = value | (u16::from(data[0] & 0xe0) << 8);
        NetworkEndian::write_u16(data, write_value);
    }

    #[inline]
    pub fn clear_flags(&mut self) {
        let data = flags_frag_mut(self.buf.as_mut());
        data[0] &= 0x1f;
    }

    #[inline]
    pub fn set_time_to_live(&mut self, value: u8) {
        *time_to_live_mut(self.buf.as_mut()) = value;
    }

    #[inline]
    pub fn set_protocol(&mut self, value: IpProtocol) {
        *protocol_mut(self.buf.as_mut()) = value.into();
    }

    #[inline]
    pub fn set_checksum(&mut self, value: u16) {
        NetworkEndian::write_u16(cksum_mut(self.buf.as_mut()), value)
    }

    #[inline]
    pub fn set_source_ip(&mut self, value: Ipv4Addr) {
        src_ip_mut(self.buf.as_mut()).copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn set_dest_ip(&mut self, value: Ipv4Addr) {
        dst_ip_mut(self.buf.as_mut()).copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn options_mut(&mut self) -> &mut [u8] {
        let header_len = self.header_len();
        &mut self.buf.as_mut()[IPV4_HEADER_LEN..header_len]
    }

    /// Write the options tail, zero-padding to the next 4-byte boundary;
    /// fails with [`PacketError::OversizedField`] past the capacity.
    pub fn set_options(&mut self, bytes: &[u8]) -> Result<(), PacketError> {
        write_options(self.options_mut(), bytes)
    }

    /// The checksum engine over `[0, header_len)` with the field at
    /// offset 10; no pseudo-header.
    pub fn checksum_engine(&mut self) -> Checksum<'_> {
        let end = self.header_len();
        Checksum::new(self.buf.as_mut(), end, CHECKSUM_FIELD, None)
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
