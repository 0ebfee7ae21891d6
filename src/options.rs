//! Write side of the variable options+padding tail shared by the IPv4 and
//! TCP views.

use crate::error::PacketError;

/// Copy `src` into the options extent `dst`, zero-padding up to the next
/// 4-byte boundary. `dst` is 4-byte aligned by construction (it is bounded
/// by a header-length field counted in 32-bit words).
pub(crate) fn write_options(dst: &mut [u8], src: &[u8]) -> Result<(), PacketError> {
    if src.len() > dst.len() {
        return Err(PacketError::OversizedField {
            size: src.len(),
            limit: dst.len(),
        });
    }

    dst[..src.len()].copy_from_slice(src);
    let padded = (src.len() + 3) & !3;
    for byte in dst[src.len()..padded].iter_mut() {
        *byte = 0;
    }

    Ok(())
}
