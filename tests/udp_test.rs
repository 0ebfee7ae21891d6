use dgram::ipv4::{IpProtocol, Ipv4Addr, IPV4_HEADER_TEMPLATE};
use dgram::udp::*;
use dgram::{PacketError, TransportHeader};

// Ports 60376 -> 161, length 12, checksum over the v4 pseudo-header for
// 192.168.29.58 -> 192.168.29.160.
static CHUNK_BYTES: [u8; 12] = [
    0xeb, 0xd8, 0x00, 0xa1, 0x00, 0x0c, 0xb9, 0x93, 0xde, 0xad, 0xbe, 0xef,
];

fn pseudo_header() -> dgram::checksum::PseudoHeader {
    let mut header = IPV4_HEADER_TEMPLATE;
    header.set_source_ip(Ipv4Addr([192, 168, 29, 58]));
    header.set_dest_ip(Ipv4Addr([192, 168, 29, 160]));
    header.set_protocol(IpProtocol::UDP);
    header.set_total_len(32);
    header.pseudo_header()
}

#[test]
fn datagram_parse() {
    let dgram = UdpDatagram::new(&CHUNK_BYTES[..], Some(pseudo_header()), 12).unwrap();

    assert_eq!(dgram.source_port(), 60376);
    assert_eq!(dgram.dest_port(), 161);
    assert_eq!(dgram.length(), 12);
    assert_eq!(dgram.checksum(), 0xb993);
    assert_eq!(dgram.header_len(), 8);
    assert_eq!(dgram.data(), &[0xde, 0xad, 0xbe, 0xef]);
}

#[test]
fn checksum_over_pseudo_header() {
    let mut bytes = CHUNK_BYTES;
    let mut dgram = UdpDatagram::new(&mut bytes[..], Some(pseudo_header()), 12).unwrap();

    assert!(dgram.verify_checksum());

    dgram.clear_checksum();
    assert_eq!(dgram.checksum(), 0);

    dgram.adjust_checksum();
    assert_eq!(dgram.checksum(), 0xb993);
    assert!(dgram.verify_checksum());

    dgram.set_source_port(60377);
    assert!(!dgram.verify_checksum());
}

#[test]
fn checksum_matches_pnet() {
    let expected = pnet::packet::util::ipv4_checksum(
        &CHUNK_BYTES[..],
        3,
        &[],
        &std::net::Ipv4Addr::new(192, 168, 29, 58),
        &std::net::Ipv4Addr::new(192, 168, 29, 160),
        pnet::packet::ip::IpNextHeaderProtocols::Udp,
    );

    let mut bytes = CHUNK_BYTES;
    let mut dgram = UdpDatagram::new(&mut bytes[..], Some(pseudo_header()), 12).unwrap();
    dgram.adjust_checksum();
    assert_eq!(dgram.checksum(), expected);
}

#[test]
fn data_extent_is_bounded_by_chunk_end() {
    let mut bytes = [0u8; 16];
    bytes[5] = 12; // length field

    // The buffer runs past the capture bound; the extent must not.
    let dgram = UdpDatagram::new(&bytes[..], None, 12).unwrap();
    assert_eq!(dgram.data().len(), 4);

    let mut dgram = UdpDatagram::new(&mut bytes[..], None, 12).unwrap();
    dgram.set_data(&[1, 2]).unwrap();
    assert_eq!(dgram.data(), &[1, 2, 0, 0]);

    let err = dgram.set_data(&[0; 5]).unwrap_err();
    assert_eq!(err, PacketError::OversizedField { size: 5, limit: 4 });
}

#[test]
fn construction_errors() {
    let bytes = [0u8; 6];
    assert_eq!(
        UdpDatagram::new(&bytes[..], None, 6).unwrap_err(),
        PacketError::BadHeader { offset: 0 }
    );

    let bytes = [0u8; 12];
    // chunk_end past the buffer
    assert_eq!(
        UdpDatagram::new(&bytes[..], None, 16).unwrap_err(),
        PacketError::BadHeader { offset: 0 }
    );
    // a zero length field declares less than the 8-byte header
    assert_eq!(
        UdpDatagram::new(&bytes[..], None, 12).unwrap_err(),
        PacketError::InvalidHeaderLength { len: 0 }
    );
}

#[test]
fn transport_capabilities() {
    let dgram = UdpDatagram::new(&CHUNK_BYTES[..], None, 12).unwrap();
    let view: &dyn TransportHeader = &dgram;

    assert_eq!(view.source_port(), 60376);
    assert_eq!(view.dest_port(), 161);
    assert_eq!(view.checksum(), 0xb993);
    assert_eq!(view.header_len(), 8);
}
