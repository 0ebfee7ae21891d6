use dgram::ipv4::*;
use dgram::PacketError;

static HEADER_BYTES: [u8; 20] = [
    0x45, 0x00, 0x00, 0x3c, 0x1c, 0x46, 0x40, 0x00, 0x40, 0x06, 0x9c, 0xbc, 0xc0, 0xa8, 0x00,
    0x68, 0xc0, 0xa8, 0x00, 0x01,
];

#[test]
fn header_parse() {
    let header = Ipv4Header::new(&HEADER_BYTES[..]).unwrap();

    assert_eq!(header.check_version(), true);
    assert_eq!(header.header_len(), 20);
    assert_eq!(header.total_len(), 60);
    assert_eq!(header.ident(), 0x1c46);
    assert_eq!(header.dont_frag(), true);
    assert_eq!(header.more_frags(), false);
    assert_eq!(header.frag_offset(), 0);
    assert_eq!(header.time_to_live(), 64);
    assert_eq!(header.protocol(), IpProtocol::TCP);
    assert_eq!(header.checksum(), 0x9cbc);
    assert_eq!(header.source_ip(), Ipv4Addr([192, 168, 0, 104]));
    assert_eq!(header.dest_ip(), Ipv4Addr([192, 168, 0, 1]));
    assert_eq!(u32::from(header.source_ip()), 0xc0a80068);
    assert_eq!(u32::from(header.dest_ip()), 0xc0a80001);
    assert!(header.options().is_empty());
}

#[test]
fn header_build() {
    let mut header = IPV4_HEADER_TEMPLATE;
    header.adjust_version();
    header.set_total_len(60);
    header.set_ident(0x1c46);
    header.clear_flags();
    header.set_dont_frag(true);
    header.set_time_to_live(64);
    header.set_protocol(IpProtocol::TCP);
    header.set_source_ip(Ipv4Addr([192, 168, 0, 104]));
    header.set_dest_ip(Ipv4Addr([192, 168, 0, 1]));
    header.adjust_checksum();

    assert_eq!(header.as_bytes(), &HEADER_BYTES[..]);
}

#[test]
fn checksum_soundness() {
    let mut bytes = HEADER_BYTES;
    let mut header = Ipv4Header::new(&mut bytes[..]).unwrap();

    assert!(header.verify_checksum());

    header.set_checksum(0);
    assert!(!header.verify_checksum());

    header.adjust_checksum();
    assert_eq!(header.checksum(), 0x9cbc);
    assert!(header.verify_checksum());

    // Applying twice stores the same value both times.
    header.adjust_checksum();
    assert_eq!(header.checksum(), 0x9cbc);

    // Flipping any non-checksum bit breaks verification.
    header.set_time_to_live(63);
    assert!(!header.verify_checksum());
}

#[test]
fn checksum_matches_pnet() {
    let mut bytes = HEADER_BYTES;
    let mut header = Ipv4Header::new(&mut bytes[..]).unwrap();
    header.adjust_checksum();
    let stored = header.checksum();

    assert_eq!(stored, pnet::packet::util::checksum(&HEADER_BYTES[..], 5));
}

#[test]
fn verify_leaves_the_buffer_untouched() {
    let mut bytes = HEADER_BYTES;
    let snapshot = bytes;

    let mut header = Ipv4Header::new(&mut bytes[..]).unwrap();
    assert!(header.verify_checksum());
    header.clear_checksum();
    assert!(!header.verify_checksum());

    assert_eq!(&bytes[..10], &snapshot[..10]);
    assert_eq!(&bytes[12..], &snapshot[12..]);
}

#[test]
fn type_of_service_round_trip() {
    let mut header = IPV4_HEADER_TEMPLATE;

    header.set_precedence(Precedence::FLASH_OVERRIDE);
    header.set_low_delay(true);
    header.set_min_monetary_cost(true);

    assert_eq!(header.precedence(), Precedence::FLASH_OVERRIDE);
    assert!(header.low_delay());
    assert!(!header.high_throughput());
    assert!(!header.high_reliability());
    assert!(header.min_monetary_cost());

    header.set_precedence(Precedence::ROUTINE);
    assert_eq!(header.precedence(), Precedence::ROUTINE);
    // Service flags survive a precedence rewrite.
    assert!(header.low_delay());
    assert!(header.min_monetary_cost());

    header.set_low_delay(false);
    assert!(!header.low_delay());
    assert!(header.min_monetary_cost());
}

#[test]
fn fragment_gating() {
    let mut header = IPV4_HEADER_TEMPLATE;

    header.set_dont_frag(true);
    header.set_more_frags(true);
    header.set_frag_offset(0x1234);
    assert_eq!(header.more_frags(), false);
    assert_eq!(header.frag_offset(), 0);

    header.set_dont_frag(false);
    header.set_more_frags(true);
    header.set_frag_offset(0x1234);
    assert_eq!(header.more_frags(), true);
    assert_eq!(header.frag_offset(), 0x1234);

    // The flag bits live next to the offset bits and must survive it.
    assert_eq!(header.dont_frag(), false);
    header.set_frag_offset(0);
    assert_eq!(header.more_frags(), true);
}

#[test]
fn options_pad_and_reject() {
    let mut bytes = [0u8; 28];
    bytes[0] = 0x47; // IHL 7, header length 28, options capacity 8

    let mut header = Ipv4Header::new(&mut bytes[..]).unwrap();
    assert_eq!(header.header_len(), 28);
    assert_eq!(header.options().len(), 8);

    header.set_options(&[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(header.options(), &[1, 2, 3, 4, 5, 6, 0, 0]);

    let err = header.set_options(&[0xff; 10]).unwrap_err();
    assert_eq!(err, PacketError::OversizedField { size: 10, limit: 8 });
    // The failed write changed nothing.
    assert_eq!(header.options(), &[1, 2, 3, 4, 5, 6, 0, 0]);
}

#[test]
fn construction_errors() {
    let short = [0x45u8; 12];
    assert_eq!(
        Ipv4Header::new(&short[..]).unwrap_err(),
        PacketError::BadHeader { offset: 0 }
    );

    let mut bytes = HEADER_BYTES;
    bytes[0] = 0x42; // IHL 2, declares 8 bytes
    assert_eq!(
        Ipv4Header::new(&bytes[..]).unwrap_err(),
        PacketError::InvalidHeaderLength { len: 8 }
    );

    let mut bytes = HEADER_BYTES;
    bytes[0] = 0x46; // declares 24 bytes over a 20-byte buffer
    assert_eq!(
        Ipv4Header::new(&bytes[..]).unwrap_err(),
        PacketError::BadHeader { offset: 0 }
    );
}
