//! Header resolution: version-nibble dispatch to an IP header view and
//! protocol-id dispatch to a transport view, plus the convenience wrapper
//! pairing both over one buffer.

use crate::checksum::PseudoHeader;
use crate::error::PacketError;
use crate::ipv4::{IpProtocol, Ipv4Header};
use crate::ipv6::Ipv6Header;
use crate::tcp::TcpSegment;
use crate::udp::UdpDatagram;

/// The IP version requested when creating a fresh header in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

/// A resolved IP header view, one case per concrete header kind.
#[derive(Debug)]
pub enum IpHeader<T> {
    V4(Ipv4Header<T>),
    V6(Ipv6Header<T>),
}

impl<T: AsRef<[u8]>> IpHeader<T> {
    /// Dispatch on the version nibble of the first byte: 4 and 6 resolve
    /// to the matching view, anything else fails with
    /// [`PacketError::IllegalHeaderType`].
    pub fn parse(buf: T) -> Result<Self, PacketError> {
        let version = match buf.as_ref().first() {
            Some(byte) => byte >> 4,
            None => return Err(PacketError::BadHeader { offset: 0 }),
        };
        match version {
            4 => Ipv4Header::new(buf).map(IpHeader::V4),
            6 => Ipv6Header::new(buf).map(IpHeader::V6),
            _ => Err(PacketError::IllegalHeaderType { version }),
        }
    }

    #[inline]
    pub fn version(&self) -> IpVersion {
        match self {
            IpHeader::V4(_) => IpVersion::V4,
            IpHeader::V6(_) => IpVersion::V6,
        }
    }

    #[inline]
    pub fn header_len(&self) -> usize {
        match self {
            IpHeader::V4(header) => header.header_len(),
            IpHeader::V6(header) => header.header_len(),
        }
    }

    #[inline]
    pub fn total_len(&self) -> usize {
        match self {
            IpHeader::V4(header) => header.total_len().into(),
            IpHeader::V6(header) => header.total_len(),
        }
    }

    /// The carried protocol: the protocol field for v4, the next-header
    /// field for v6.
    #[inline]
    pub fn protocol(&self) -> IpProtocol {
        match self {
            IpHeader::V4(header) => header.protocol(),
            IpHeader::V6(header) => header.next_header(),
        }
    }

    #[inline]
    pub fn pseudo_header(&self) -> PseudoHeader {
        match self {
            IpHeader::V4(header) => header.pseudo_header(),
            IpHeader::V6(header) => header.pseudo_header(),
        }
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> IpHeader<T> {
    /// Like [`IpHeader::parse`], but an illegal version nibble writes the
    /// requested version's fresh first byte (version plus minimum header
    /// length) and resolves to the freshly-typed view.
    pub fn parse_or_new(mut buf: T, fallback: IpVersion) -> Result<Self, PacketError> {
        let version = match buf.as_ref().first() {
            Some(byte) => byte >> 4,
            None => return Err(PacketError::BadHeader { offset: 0 }),
        };
        match version {
            4 | 6 => Self::parse(buf),
            _ => match fallback {
                IpVersion::V4 => {
                    buf.as_mut()[0] = 0x45;
                    Ipv4Header::new(buf).map(IpHeader::V4)
                }
                IpVersion::V6 => {
                    buf.as_mut()[0] = 0x60;
                    Ipv6Header::new(buf).map(IpHeader::V6)
                }
            },
        }
    }

    #[inline]
    pub fn set_protocol(&mut self, value: IpProtocol) {
        match self {
            IpHeader::V4(header) => header.set_protocol(value),
            IpHeader::V6(header) => header.set_next_header(value),
        }
    }
}

/// A resolved transport view, one case per dispatched protocol.
#[derive(Debug)]
pub enum Transport<T> {
    Udp(UdpDatagram<T>),
    Tcp(TcpSegment<T>),
}

/// A caller-owned buffer with its IP header resolved at a base offset.
///
/// Views are projected on demand and borrow the buffer; the wrapper never
/// copies it. Callers wanting an independent packet clone the buffer
/// before parsing.
#[derive(Debug)]
pub struct DataPacket<T> {
    buf: T,
    offset: usize,
    version: IpVersion,
}

impl<T: AsRef<[u8]>> DataPacket<T> {
    /// Resolve the IP header at `offset` and keep the buffer.
    pub fn parse(buf: T, offset: usize) -> Result<Self, PacketError> {
        if offset >= buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset });
        }
        let version = IpHeader::parse(&buf.as_ref()[offset..])?.version();
        Ok(DataPacket {
            buf,
            offset,
            version,
        })
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Project the resolved IP header view.
    pub fn ip_header(&self) -> IpHeader<&[u8]> {
        let slice = &self.buf.as_ref()[self.offset..];
        match self.version {
            IpVersion::V4 => IpHeader::V4(Ipv4Header::new_unchecked(slice)),
            IpVersion::V6 => IpHeader::V6(Ipv6Header::new_unchecked(slice)),
        }
    }

    #[inline]
    pub fn buf(&self) -> &T {
        &self.buf
    }

    #[inline]
    pub fn release(self) -> T {
        self.buf
    }
}

impl<T: AsRef<[u8]> + AsMut<[u8]>> DataPacket<T> {
    /// Like [`DataPacket::parse`], but with the creation fallback of
    /// [`IpHeader::parse_or_new`].
    pub fn parse_or_new(mut buf: T, offset: usize, fallback: IpVersion) -> Result<Self, PacketError> {
        if offset >= buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset });
        }
        let version = IpHeader::parse_or_new(&mut buf.as_mut()[offset..], fallback)?.version();
        Ok(DataPacket {
            buf,
            offset,
            version,
        })
    }

    /// Project the resolved IP header as a mutable view.
    pub fn ip_header_mut(&mut self) -> IpHeader<&mut [u8]> {
        let offset = self.offset;
        let slice = &mut self.buf.as_mut()[offset..];
        match self.version {
            IpVersion::V4 => IpHeader::V4(Ipv4Header::new_unchecked(slice)),
            IpVersion::V6 => IpHeader::V6(Ipv6Header::new_unchecked(slice)),
        }
    }

    /// Dispatch on the IP header's protocol id and project the transport
    /// view over the carried chunk, handing it the pseudo-header and the
    /// chunk bound derived from the IP header.
    ///
    /// Protocols other than TCP and UDP resolve to no transport view.
    pub fn transport_mut(&mut self) -> Result<Option<Transport<&mut [u8]>>, PacketError> {
        let header = self.ip_header();
        let protocol = header.protocol();
        let header_len = header.header_len();
        let chunk_end = header.total_len().saturating_sub(header_len);
        let pseudo_header = header.pseudo_header();

        let start = self.offset + header_len;
        if start > self.buf.as_ref().len() {
            return Err(PacketError::BadHeader { offset: start });
        }
        let chunk = &mut self.buf.as_mut()[start..];

        match protocol {
            IpProtocol::UDP => {
                UdpDatagram::new(chunk, Some(pseudo_header), chunk_end).map(|dgram| Some(Transport::Udp(dgram)))
            }
            IpProtocol::TCP => {
                TcpSegment::new(chunk, Some(pseudo_header), chunk_end).map(|segment| Some(Transport::Tcp(segment)))
            }
            _ => Ok(None),
        }
    }
}
