//! Hex dumps for bytes and addresses, handy when poking at an export table.

use std::fmt::Write;

/// Lowercase hex of `data` with no separators: `b"\x01\xab"` becomes `01ab`.
pub fn hexlify(data: impl AsRef<[u8]>) -> String {
    let data = data.as_ref();
    let mut out = String::with_capacity(data.len() * 2);
    for b in data {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// An address padded to 16 uppercase hex digits, e.g. `0x00007F0012345678`.
pub fn hexlify_address(address: usize) -> String {
    format!("0x{:016X}", address)
}
