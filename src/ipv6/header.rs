use byteorder::{ByteOrder, NetworkEndian};

use crate::checksum::PseudoHeader;
use crate::error::PacketError;
use crate::ipv4::IpProtocol;

use super::{AssuredForwarding, Dscp, Ecn, Ipv6Addr};

header_field_val_accessors! {
    (next_header, next_header_mut, 6),
    (hop_limit, hop_limit_mut, 7),
}

header_field_range_accessors! {
    (f_label, f_label_mut, 1..4),
    (payload_len, payload_len_mut, 4..6),
    (src_ip, src_ip_mut, 8..24),
    (dst_ip, dst_ip_mut, 24..40),
}

pub const IPV6_HEADER_LEN: usize = 40;

/// A view of the fixed RFC 8200 header over the leading bytes of a buffer.
#[derive(Clone, Copy, Debug)]
pub struct Ipv6Header<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> Ipv6Header<T> {
    #[inline]
    pub fn new(buf: T) -> Result<Self, PacketError> {
        if buf.as_ref().len() < IPV6_HEADER_LEN {
            return Err(PacketError::BadHeader { offset: 0 });
        }
        Ok(Ipv6Header { buf })
    }

    #[inline]
    pub fn new_unchecked(buf: T) -> Self {
        Ipv6Header { buf }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf.as_ref()[0..IPV6_HEADER_LEN]
    }

    #[inline]
    pub fn to_owned(&self) -> Ipv6Header<[u8; IPV6_HEADER_LEN]> {
        let mut buf = [0; IPV6_HEADER_LEN];
        buf.copy_from_slice(self.as_bytes());
        Ipv6Header { buf }
    }

    #[inline]
    pub fn check_version(&self) -> bool {
        (self.buf.as_ref()[0] >> 4) == 6
    }

    /// Always 40; the fixed header has no length field of its own.
    #[inline]
    pub fn header_len(&self) -> usize {
        IPV6_HEADER_LEN
    }

    /// The 8-bit traffic class, split across the first two bytes on the
    /// wire.
    #[inline]
    pub fn traffic_class(&self) -> u8 {
        (self.buf.as_ref()[0] << 4) | (self.buf.as_ref()[1] >> 4)
    }

    #[inline]
    pub fn dscp(&self) -> Dscp {
        Dscp::classify(self.traffic_class())
    }

    #[inline]
    pub fn assured_forwarding(&self) -> AssuredForwarding {
        AssuredForwarding::classify(self.traffic_class())
    }

    #[inline]
    pub fn ecn(&self) -> Ecn {
        Ecn::classify(self.traffic_class())
    }

    /// The 20-bit flow label.
    #[inline]
    pub fn flow_label(&self) -> u32 {
        NetworkEndian::read_u24(f_label(self.buf.as_ref())) & 0x0fffff
    }

    #[inline]
    pub fn payload_len(&self) -> u16 {
        NetworkEndian::read_u16(payload_len(self.buf.as_ref()))
    }

    /// Fixed header plus payload.
    #[inline]
    pub fn total_len(&self) -> usize {
        IPV6_HEADER_LEN + usize::from(self.payload_len())
    }

    #[inline]
    pub fn next_header(&self) -> IpProtocol {
        IpProtocol::from(*next_header(self.buf.as_ref()))
    }

    #[inline]
    pub fn hop_limit(&self) -> u8 {
        *hop_limit(self.buf.as_ref())
    }

    #[inline]
    pub fn source_ip(&self) -> Ipv6Addr {
        Ipv6Addr::from_bytes(src_ip(self.buf.as_ref()))
    }

    #[inline]
    pub fn dest_ip(&self) -> Ipv6Addr {
        Ipv6Addr::from_bytes(dst_ip(self.buf.as_ref()))
    }

    /// The 36-byte pseudo-header covering the payload this header carries.
    pub fn pseudo_header(&self) -> PseudoHeader {
        let mut bytes = [0u8; 36];
        bytes[0..16].copy_from_slice(src_ip(self.buf.as_ref()));
        bytes[16..32].copy_from_slice(dst_ip(self.buf.as_ref()));
        bytes[33] = *next_header(self.buf.as_ref());
        NetworkEndian::write_u16(&mut bytes[34..36], self.payload_len());
        PseudoHeader::V6(bytes)
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> Ipv6Header<T> {
    #[inline]
    pub fn adjust_version(&mut self) {
        self.buf.as_mut()[0] = (self.buf.as_mut()[0] & 0x0f) | (6 << 4);
    }

    #[inline]
    pub fn set_traffic_class(&mut self, value: u8) {
        self.buf.as_mut()[0] = (self.buf.as_mut()[0] & 0xf0) | (value >> 4);
        self.buf.as_mut()[1] = (self.buf.as_mut()[1] & 0x0f) | (value << 4);
    }

    /// Write the DSCP bits, leaving the ECN bits untouched.
    #[inline]
    pub fn set_dscp(&mut self, value: Dscp) {
        let merged = (self.traffic_class() & 0x03) | (u8::from(value) << 2);
        self.set_traffic_class(merged);
    }

    /// Write the assured-forwarding bits, leaving the ECN bits untouched.
    #[inline]
    pub fn set_assured_forwarding(&mut self, value: AssuredForwarding) {
        let merged = (self.traffic_class() & 0x03) | (u8::from(value) << 2);
        self.set_traffic_class(merged);
    }

    /// Write the ECN bits, leaving the DSCP bits untouched.
    #[inline]
    pub fn set_ecn(&mut self, value: Ecn) {
        let merged = (self.traffic_class() & 0xfc) | u8::from(value);
        self.set_traffic_class(merged);
    }

    #[inline]
    pub fn set_flow_label(&mut self, value: u32) {
        assert!(value <= 0x0fffff);
        let data = NetworkEndian::read_u24(f_label_mut(self.buf.as_mut()));
        NetworkEndian::write_u24(f_label_mut(self.buf.as_mut()), (data & 0xf00000) | value);
    }

    #[inline]
    pub fn set_payload_len(&mut self, value: u16) {
        NetworkEndian::write_u16(payload_len_mut(self.buf.as_mut()), value)
    }

    /// Write the payload length as `value - 40`.
    #[inline]
    pub fn set_total_len(&mut self, value: usize) {
        assert!(value >= IPV6_HEADER_LEN && value - IPV6_HEADER_LEN <= usize::from(u16::MAX));
        self.set_payload_len((value - IPV6_HEADER_LEN) as u16);
    }

    #[inline]
    pub fn set_next_header(&mut self, value: IpProtocol) {
        *next_header_mut(self.buf.as_mut()) = value.into();
    }

    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        *hop_limit_mut(self.buf.as_mut()) = value;
    }

    #[inline]
    pub fn set_source_ip(&mut self, value: &Ipv6Addr) {
        src_ip_mut(self.buf.as_mut()).copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn set_dest_ip(&mut self, value: &Ipv6Addr) {
        dst_ip_mut(self.buf.as_mut()).copy_from_slice(value.as_bytes());
    }
}
