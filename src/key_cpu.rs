use crate::color::{ChromaKey, Rgb};
use crate::error::{KeyraError, KeyraResult};

/// Zero the alpha byte of every pixel whose color matches the key target.
///
/// Only the alpha byte is ever written; RGB channels are left untouched,
/// and non-matching pixels are not modified at all. Returns the number of
/// matching pixels. Re-running the pass on the same buffer changes nothing
/// further.
pub fn key_alpha_in_place(data: &mut [u8], key: &ChromaKey) -> KeyraResult<u64> {
    if !data.len().is_multiple_of(4) {
        return Err(KeyraError::validation(
            "key_alpha_in_place expects an rgba8 buffer (length multiple of 4)",
        ));
    }

    let mut keyed = 0u64;
    for px in data.chunks_exact_mut(4) {
        if key.matches(Rgb::new(px[0], px[1], px[2])) {
            px[3] = 0;
            keyed += 1;
        }
    }
    Ok(keyed)
}
