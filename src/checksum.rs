//! RFC 1071 Internet checksum support.

use byteorder::{ByteOrder, NetworkEndian};

/// Compute an RFC 1071 compliant checksum (without the final complement)
/// over `data`.
///
/// An odd trailing byte is folded in as the high byte of a zero-padded
/// final word.
pub fn from_slice(mut data: &[u8]) -> u16 {
    let mut accum = 0u32;

    while data.len() >= 2 {
        accum += NetworkEndian::read_u16(data) as u32;
        data = &data[2..];
    }

    if let Some(&value) = data.first() {
        accum += (value as u32) << 8;
    }

    propagate_carries(accum)
}

/// Combine several RFC 1071 compliant checksums.
///
/// Valid whenever each partial range starts on an even byte boundary of
/// the overall range.
pub fn combine(checksums: &[u16]) -> u16 {
    let mut accum: u32 = 0;
    for &word in checksums {
        accum += word as u32;
    }
    propagate_carries(accum)
}

// Fold overflow above 16 bits back into the low 16 bits until it fits.
fn propagate_carries(word: u32) -> u16 {
    let sum = (word >> 16) + (word & 0xffff);
    ((sum >> 16) as u16) + (sum as u16)
}

/// Synthetic bytes logically prepended to a transport chunk for checksum
/// computation; never transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoHeader {
    /// 12 bytes: src(4) dst(4) zero protocol length(2).
    V4([u8; 12]),
    /// 36 bytes: src(16) dst(16) zero next-header length(2).
    V6([u8; 36]),
}

impl PseudoHeader {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            PseudoHeader::V4(bytes) => &bytes[..],
            PseudoHeader::V6(bytes) => &bytes[..],
        }
    }

    #[inline]
    pub fn calc_checksum(&self) -> u16 {
        from_slice(self.as_bytes())
    }
}

/// One checksum computation site: a scan range, the position of the 16-bit
/// checksum field inside it, and an optional pseudo-header summed first.
///
/// The stored checksum is zeroed only for the duration of a scan and
/// restored before control returns, so [`Checksum::verify`] leaves the
/// buffer byte-identical; only [`Checksum::apply`] overwrites the field.
#[derive(Debug)]
pub struct Checksum<'a> {
    data: &'a mut [u8],
    calculate_end: usize,
    checksum_field: usize,
    pseudo_header: Option<PseudoHeader>,
}

impl<'a> Checksum<'a> {
    /// Build an engine over `data[..calculate_end]` with the checksum
    /// field at `checksum_field`.
    ///
    /// Both positions must lie inside `data`; the views of this crate
    /// guarantee that before handing out an engine.
    pub fn new(
        data: &'a mut [u8],
        calculate_end: usize,
        checksum_field: usize,
        pseudo_header: Option<PseudoHeader>,
    ) -> Self {
        debug_assert!(calculate_end <= data.len());
        debug_assert!(checksum_field + 2 <= calculate_end);
        Checksum {
            data,
            calculate_end,
            checksum_field,
            pseudo_header,
        }
    }

    /// Freshly computed checksum of the range, with the stored field
    /// treated as zero.
    pub fn compute(&mut self) -> u16 {
        let field = &mut self.data[self.checksum_field..self.checksum_field + 2];
        let saved = NetworkEndian::read_u16(field);
        NetworkEndian::write_u16(field, 0);

        let range = from_slice(&self.data[..self.calculate_end]);
        let folded = match self.pseudo_header {
            Some(ref pseudo) => combine(&[pseudo.calc_checksum(), range]),
            None => range,
        };

        let field = &mut self.data[self.checksum_field..self.checksum_field + 2];
        NetworkEndian::write_u16(field, saved);

        !folded
    }

    /// Whether the stored checksum matches a fresh computation.
    pub fn verify(&mut self) -> bool {
        let stored = NetworkEndian::read_u16(&self.data[self.checksum_field..]);
        stored == self.compute()
    }

    /// Overwrite the stored checksum with a fresh computation.
    pub fn apply(&mut self) {
        let value = self.compute();
        NetworkEndian::write_u16(&mut self.data[self.checksum_field..], value);
    }

    /// Zero the stored checksum.
    pub fn clear(&mut self) {
        NetworkEndian::write_u16(&mut self.data[self.checksum_field..], 0);
    }
}
