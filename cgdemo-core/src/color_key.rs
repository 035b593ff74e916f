//! Colour-key transparency for sprite images without an alpha channel.

/// The colour treated as transparent when none is configured.
pub const MAGENTA: [u8; 3] = [255, 0, 255];

/// Clears the alpha of every RGBA8 pixel whose colour equals `key`.
///
/// Returns the number of pixels that were made transparent. A trailing partial pixel is
/// left untouched.
pub fn apply_color_key(rgba: &mut [u8], key: [u8; 3]) -> usize {
    let mut keyed = 0;
    for pixel in rgba.chunks_exact_mut(4) {
        if pixel[..3] == key {
            pixel[3] = 0;
            keyed += 1;
        }
    }
    keyed
}
