use dgram::checksum::PseudoHeader;
use dgram::ipv6::*;
use dgram::PacketError;

static HEADER_BYTES: [u8; 40] = [
    0x60, 0x00, 0x00, 0x00, 0x00, 0x14, 0x06, 0x40, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
];

#[test]
fn header_parse() {
    let header = Ipv6Header::new(&HEADER_BYTES[..]).unwrap();

    assert_eq!(header.check_version(), true);
    assert_eq!(header.header_len(), 40);
    assert_eq!(header.traffic_class(), 0);
    assert_eq!(header.flow_label(), 0);
    assert_eq!(header.payload_len(), 20);
    assert_eq!(header.total_len(), 60);
    assert_eq!(header.next_header(), dgram::ipv4::IpProtocol::TCP);
    assert_eq!(header.hop_limit(), 64);

    let mut src = [0u8; 16];
    src[0] = 0xfe;
    src[1] = 0x80;
    src[15] = 0x01;
    assert_eq!(header.source_ip(), Ipv6Addr(src));

    let mut dst = src;
    dst[15] = 0x02;
    assert_eq!(header.dest_ip(), Ipv6Addr(dst));
}

#[test]
fn too_short_buffer_is_rejected() {
    let bytes = [0x60u8; 39];
    assert_eq!(
        Ipv6Header::new(&bytes[..]).unwrap_err(),
        PacketError::BadHeader { offset: 0 }
    );
}

#[test]
fn traffic_class_round_trip() {
    let mut bytes = HEADER_BYTES;
    let mut header = Ipv6Header::new(&mut bytes[..]).unwrap();

    header.set_traffic_class(0xab);
    assert_eq!(header.traffic_class(), 0xab);
    // The version nibble shares a byte with the traffic class.
    assert!(header.check_version());

    header.set_flow_label(0x12345);
    assert_eq!(header.flow_label(), 0x12345);
    assert_eq!(header.traffic_class(), 0xab);

    header.set_traffic_class(0x5c);
    assert_eq!(header.flow_label(), 0x12345);
}

#[test]
fn qos_lookups() {
    let mut bytes = HEADER_BYTES;
    let mut header = Ipv6Header::new(&mut bytes[..]).unwrap();

    assert_eq!(header.dscp(), Dscp::DEFAULT);
    assert_eq!(header.ecn(), Ecn::NOT_ECT);
    assert_eq!(header.assured_forwarding(), AssuredForwarding::DEFAULT);

    header.set_dscp(Dscp::EF);
    assert_eq!(header.dscp(), Dscp::EF);
    assert_eq!(header.ecn(), Ecn::NOT_ECT);

    header.set_ecn(Ecn::CE);
    assert_eq!(header.ecn(), Ecn::CE);
    // The DSCP bits survive an ECN rewrite and vice versa.
    assert_eq!(header.dscp(), Dscp::EF);

    header.set_assured_forwarding(AssuredForwarding::AF23);
    assert_eq!(header.assured_forwarding(), AssuredForwarding::AF23);
    assert_eq!(header.ecn(), Ecn::CE);

    // A codepoint outside the tables decodes as the DEFAULT sentinel.
    header.set_traffic_class(0b1111_1100);
    assert_eq!(header.dscp(), Dscp::DEFAULT);
    assert_eq!(header.assured_forwarding(), AssuredForwarding::DEFAULT);
}

#[test]
fn total_len_writes_the_payload_field() {
    let mut bytes = HEADER_BYTES;
    let mut header = Ipv6Header::new(&mut bytes[..]).unwrap();

    header.set_total_len(100);
    assert_eq!(header.payload_len(), 60);
    assert_eq!(header.total_len(), 100);
}

#[test]
fn pseudo_header_layout() {
    let header = Ipv6Header::new(&HEADER_BYTES[..]).unwrap();

    match header.pseudo_header() {
        PseudoHeader::V6(bytes) => {
            assert_eq!(&bytes[0..16], header.source_ip().as_bytes());
            assert_eq!(&bytes[16..32], header.dest_ip().as_bytes());
            assert_eq!(bytes[32], 0);
            assert_eq!(bytes[33], 6);
            assert_eq!(&bytes[34..36], &[0x00, 0x14]);
        }
        PseudoHeader::V4(_) => panic!("expected a v6 pseudo-header"),
    }
}
