//! Fixed-capacity label helpers

use heapless::String;

/// Copy `src` into a fixed-capacity string, dropping whatever does not fit
///
/// Truncation happens at a char boundary so the result is always valid
/// UTF-8. Overflow is silent. The text ends at the first NUL, matching the
/// NUL-padded fields it is stored in.
pub fn truncated<const N: usize>(src: &str) -> String<N> {
    let mut out = String::new();
    for ch in src.chars().take_while(|&ch| ch != '\0') {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Longest prefix of `bytes` no longer than `max` that ends on a char boundary
///
/// Invalid UTF-8 is cut at the first invalid sequence.
pub fn utf8_prefix(bytes: &[u8], max: usize) -> &str {
    let bytes = &bytes[..bytes.len().min(max)];
    match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => {
            // valid_up_to() is always a char boundary
            let valid = e.valid_up_to();
            core::str::from_utf8(&bytes[..valid]).unwrap_or_default()
        }
    }
}
